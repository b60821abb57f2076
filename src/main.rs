use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::sync::Arc;

use medilink_rs::flow::ports::TokenStore;
use medilink_rs::flow::wizard::Wizard;
use medilink_rs::medilink::api::auth::{login, PasswordResetApi, SignupApi};
use medilink_rs::medilink::api::records::{NewVitals, RecordsApi};
use medilink_rs::medilink::api::ApiClient;
use medilink_rs::medilink::console::{self, ConsoleNavigator};
use medilink_rs::medilink::flows;
use medilink_rs::medilink::session::FileTokenStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account (guided email + OTP verification)
    Signup,
    /// Reset a forgotten password (guided email + OTP verification)
    ResetPassword,
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Show the reports and vitals summary
    Dashboard,
    /// Show one report's details
    Report {
        /// The report id
        id: String,
    },
    /// Add a manual vitals entry
    AddVitals {
        /// Measurement date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,

        /// Blood pressure, e.g. 120/80
        #[arg(long, default_value = "")]
        bp: String,

        /// Blood sugar, mg/dL
        #[arg(long, default_value = "")]
        sugar: String,

        /// Weight, kg
        #[arg(long, default_value = "")]
        weight: String,

        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let tokens = Arc::new(FileTokenStore::from_env());

    match args.command {
        Commands::Signup => {
            let client = ApiClient::from_env()?;
            let wizard = Wizard::new(
                flows::signup(),
                Arc::new(SignupApi::new(client)),
                tokens,
                Arc::new(ConsoleNavigator),
            );
            console::run(&wizard).await?;
        }
        Commands::ResetPassword => {
            let client = ApiClient::from_env()?;
            let wizard = Wizard::new(
                flows::password_reset(),
                Arc::new(PasswordResetApi::new(client)),
                tokens,
                Arc::new(ConsoleNavigator),
            );
            console::run(&wizard).await?;
        }
        Commands::Login { email, password } => {
            let client = ApiClient::from_env()?;
            match login(&client, &email, &password).await {
                Ok(token) => {
                    tokens.store(&token).await?;
                    println!("Signed in as {}", email);
                }
                Err(e) => {
                    log::error!("login failed: {}", e);
                    bail!("{}", e.server_message().unwrap_or("Invalid Credentials"));
                }
            }
        }
        Commands::Dashboard => {
            let api = records_api(&tokens).await?;
            let reply = api.dashboard().await?;
            if !reply.ok {
                println!("Failed to load dashboard data!");
                return Ok(());
            }

            println!("Reports ({})", reply.reports.len());
            for report in &reply.reports {
                println!("  {}  {}  {}", report.id, report.date, report.kind);
            }
            println!("Vitals ({})", reply.vitals.len());
            for vitals in &reply.vitals {
                println!(
                    "  {}  bp {}  sugar {} mg/dL  weight {} kg",
                    vitals.date,
                    vitals.bp.as_deref().unwrap_or("--"),
                    vitals.sugar.as_deref().unwrap_or("--"),
                    vitals.weight.as_deref().unwrap_or("--"),
                );
            }
        }
        Commands::Report { id } => {
            let api = records_api(&tokens).await?;
            match api.report(&id).await? {
                Some(report) => {
                    println!("{} ({})", report.kind, report.date);
                    if !report.notes.is_empty() {
                        println!("Notes: {}", report.notes);
                    }
                    if let Some(url) = &report.file_url {
                        println!("File: {}", url);
                    }
                }
                None => println!("Report not found!"),
            }
        }
        Commands::AddVitals {
            date,
            bp,
            sugar,
            weight,
            notes,
        } => {
            let api = records_api(&tokens).await?;
            let vitals = NewVitals {
                date,
                bp,
                sugar,
                weight,
                notes,
            };
            if api.add_vitals(&vitals).await? {
                println!("Vitals added successfully!");
            } else {
                println!("Failed to add vitals. Try again!");
            }
        }
    }

    Ok(())
}

async fn records_api(tokens: &Arc<FileTokenStore>) -> anyhow::Result<RecordsApi> {
    let token = tokens
        .load()
        .await
        .context("no session - run `medilink-rs login` first")?;
    let client = ApiClient::from_env()?.with_token(token);
    Ok(RecordsApi::new(client))
}
