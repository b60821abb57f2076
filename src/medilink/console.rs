// SPDX-License-Identifier: MIT

//! Interactive console driver for a wizard run.
//!
//! This is the rendering collaborator: it prompts the current step's label,
//! feeds the entered value to `advance()` and prints the resulting notice.
//! The wizard itself never touches the terminal.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::flow::ports::Navigator;
use crate::flow::step::InputKind;
use crate::flow::wizard::{Advance, Notice, NoticeLevel, Wizard};

/// Navigation target sink for the CLI: prints where the app would route.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn go(&self, route: &str) {
        println!("-> continuing at {}", route);
    }
}

/// Drive `wizard` to completion over stdin/stdout.
pub async fn run(wizard: &Wizard) -> anyhow::Result<()> {
    let total = wizard.flow().len();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(step) = wizard.current_step().await {
        let index = wizard.state().await.current_step;
        println!();
        println!("[{}/{}] {}", index + 1, total, step.label);
        print_hint(step.input);
        if wizard.flow().allows_back && index > 0 {
            println!("(type 'back' to return to the previous step)");
        }

        let Some(line) = lines.next_line().await? else {
            // stdin closed - the user abandoned the flow.
            log::info!("{}: input closed, abandoning", wizard.flow().name);
            return Ok(());
        };
        let value = line.trim();

        if value == "back" && wizard.flow().allows_back {
            if wizard.retreat().await.is_none() {
                println!("Already at the first step.");
            }
            continue;
        }

        match wizard.advance(value).await {
            Advance::Stayed(notice) => print_notice(&notice),
            Advance::Moved { notice, .. } => {
                if let Some(notice) = notice {
                    print_notice(&notice);
                }
            }
            Advance::Completed(notice) => {
                print_notice(&notice);
                break;
            }
            Advance::Busy => {
                // Cannot happen with a single sequential driver.
                log::warn!("submission already in flight");
            }
        }
    }

    Ok(())
}

fn print_hint(input: InputKind) {
    match input {
        InputKind::Code => println!("Enter the 6-digit code from your email:"),
        InputKind::Password => println!("(input is not masked in this console)"),
        InputKind::Text => {}
    }
}

fn print_notice(notice: &Notice) {
    let prefix = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warn",
        NoticeLevel::Error => "error",
    };
    println!("[{}] {}", prefix, notice.text);
}
