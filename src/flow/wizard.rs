// SPDX-License-Identifier: MIT

//! The verification wizard state machine
//!
//! Drives a user through a flow's ordered steps, gating the OTP step on a
//! completed dispatch and the terminal step on a verified code. Every failure
//! is folded into a [`Notice`]; nothing escapes the `advance()` boundary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::ports::{Navigator, TerminalPayload, TokenStore, VerificationApi};
use super::rules::validate;
use super::step::{FlowDefinition, StepDefinition, StepRole};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A message surfaced next to the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Session-scoped mutable state of one in-progress flow.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub current_step: usize,
    /// Step name -> entered value; accumulates until terminal success.
    pub collected: HashMap<String, String>,
    pub otp_sent: bool,
    pub otp_verified: bool,
    pub finished: bool,
}

/// Result of one `advance()` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The step did not change; the notice says why.
    Stayed(Notice),
    /// Moved forward to `step`.
    Moved { step: usize, notice: Option<Notice> },
    /// Terminal action succeeded; the flow is over.
    Completed(Notice),
    /// A submission is already in flight; this call was collapsed.
    Busy,
}

/// The wizard engine. One instance per flow run; state is discarded with it.
pub struct Wizard {
    flow: FlowDefinition,
    api: Arc<dyn VerificationApi>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<WizardState>,
    /// Re-entrancy latch: at most one outstanding submission per step.
    submitting: AtomicBool,
}

impl Wizard {
    pub fn new(
        flow: FlowDefinition,
        api: Arc<dyn VerificationApi>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            flow,
            api,
            tokens,
            navigator,
            state: Mutex::new(WizardState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn flow(&self) -> &FlowDefinition {
        &self.flow
    }

    /// Snapshot of the current state, for rendering and assertions.
    pub async fn state(&self) -> WizardState {
        self.state.lock().await.clone()
    }

    /// The step the wizard is currently waiting on, or `None` once finished.
    pub async fn current_step(&self) -> Option<StepDefinition> {
        let state = self.state.lock().await;
        if state.finished {
            return None;
        }
        self.flow.step(state.current_step).cloned()
    }

    /// Submit a value for the current step.
    pub async fn advance(&self, value: &str) -> Advance {
        if self.submitting.swap(true, Ordering::SeqCst) {
            log::warn!("advance() called while a submission is in flight, ignoring");
            return Advance::Busy;
        }
        let outcome = self.advance_inner(value).await;
        self.submitting.store(false, Ordering::SeqCst);
        outcome
    }

    /// Go back one step. No network call, no flag reset, never below 0.
    /// Returns the new index, or `None` when the flow disallows it or the
    /// wizard is already at the first step.
    pub async fn retreat(&self) -> Option<usize> {
        if !self.flow.allows_back {
            return None;
        }
        let mut state = self.state.lock().await;
        if state.finished || state.current_step == 0 {
            return None;
        }
        state.current_step -= 1;
        log::info!("{}: back to step {}", self.flow.name, state.current_step);
        Some(state.current_step)
    }

    async fn advance_inner(&self, value: &str) -> Advance {
        let mut state = self.state.lock().await;

        if state.finished {
            return Advance::Stayed(Notice::warning("This flow is already complete"));
        }

        let Some(step) = self.flow.step(state.current_step) else {
            // Unreachable while the index invariant holds.
            return Advance::Stayed(Notice::error("No step to submit"));
        };

        if let Err(msg) = validate(step.label, value, &step.rules, &state.collected) {
            return Advance::Stayed(Notice::error(msg));
        }

        state
            .collected
            .insert(step.name.to_string(), value.to_string());

        match step.role {
            StepRole::Email => self.submit_email(&mut state, value).await,
            StepRole::Otp => self.submit_otp(&mut state, value).await,
            StepRole::Field => {
                // No network call; just move on.
                state.current_step = (state.current_step + 1).min(self.flow.len() - 1);
                Advance::Moved {
                    step: state.current_step,
                    notice: None,
                }
            }
            StepRole::Terminal => self.submit_terminal(&mut state).await,
        }
    }

    async fn submit_email(&self, state: &mut WizardState, email: &str) -> Advance {
        log::info!("{}: dispatching OTP", self.flow.name);
        match self.api.send_otp(email).await {
            Ok(()) => {
                state.otp_sent = true;
                state.current_step = (state.current_step + 1).min(self.flow.len() - 1);
                Advance::Moved {
                    step: state.current_step,
                    notice: Some(Notice::success(self.flow.otp_sent_notice)),
                }
            }
            Err(e) => {
                log::error!("{}: OTP dispatch failed: {}", self.flow.name, e);
                let text = e.server_message().unwrap_or("Failed to send OTP");
                Advance::Stayed(Notice::error(text))
            }
        }
    }

    async fn submit_otp(&self, state: &mut WizardState, code: &str) -> Advance {
        if !state.otp_sent {
            return Advance::Stayed(Notice::warning("Please send OTP first!"));
        }

        let email = self
            .email_step_name()
            .and_then(|name| state.collected.get(name).cloned())
            .unwrap_or_default();

        match self.api.verify_otp(&email, code).await {
            // The backend signals success through free-text wording; anything
            // without the phrase counts as a failed verification.
            Ok(reply) if reply.msg.to_lowercase().contains("verified") => {
                state.otp_verified = true;
                state.current_step = (state.current_step + 1).min(self.flow.len() - 1);
                Advance::Moved {
                    step: state.current_step,
                    notice: Some(Notice::success("OTP verified successfully!")),
                }
            }
            Ok(reply) => {
                log::warn!(
                    "{}: verify reply without expected wording: {}",
                    self.flow.name,
                    reply.msg
                );
                state.otp_verified = false;
                Advance::Stayed(Notice::error("Invalid OTP. Please try again!"))
            }
            Err(e) => {
                log::error!("{}: OTP verification failed: {}", self.flow.name, e);
                state.otp_verified = false;
                let text = e.server_message().unwrap_or("Invalid or expired OTP");
                Advance::Stayed(Notice::error(text))
            }
        }
    }

    async fn submit_terminal(&self, state: &mut WizardState) -> Advance {
        if !state.otp_verified {
            return Advance::Stayed(Notice::warning("Please verify OTP first!"));
        }

        let payload = self.terminal_payload(state);
        log::info!("{}: performing terminal action", self.flow.name);

        match self.api.finish(&payload).await {
            Ok(reply) => {
                if let Some(token) = &reply.token {
                    if let Err(e) = self.tokens.store(token).await {
                        // The account exists remotely but the session cannot
                        // be persisted; stay re-triggerable.
                        log::error!("{}: token store failed: {}", self.flow.name, e);
                        return Advance::Stayed(Notice::error("Failed to save your session"));
                    }
                }
                state.collected.clear();
                state.finished = true;
                self.navigator.go(self.flow.success_route);
                let text = reply
                    .msg
                    .unwrap_or_else(|| self.flow.completed_notice.to_string());
                Advance::Completed(Notice::success(text))
            }
            Err(e) => {
                log::error!("{}: terminal action failed: {}", self.flow.name, e);
                let text = e
                    .server_message()
                    .unwrap_or(self.flow.terminal_failure_fallback);
                Advance::Stayed(Notice::error(text))
            }
        }
    }

    /// Collected values minus the OTP code itself.
    fn terminal_payload(&self, state: &WizardState) -> TerminalPayload {
        let otp_names: Vec<&str> = self
            .flow
            .steps
            .iter()
            .filter(|s| s.role == StepRole::Otp)
            .map(|s| s.name)
            .collect();

        TerminalPayload {
            values: state
                .collected
                .iter()
                .filter(|(name, _)| !otp_names.contains(&name.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    fn email_step_name(&self) -> Option<&'static str> {
        self.flow
            .steps
            .iter()
            .find(|s| s.role == StepRole::Email)
            .map(|s| s.name)
    }
}
