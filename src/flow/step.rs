// SPDX-License-Identifier: MIT

//! Step and flow definitions
//!
//! A flow is declarative data: an ordered list of steps, each carrying its
//! form-field name, prompt label, validation rules and input widget kind.
//! The wizard interprets the list; nothing here performs I/O.

use serde::{Deserialize, Serialize};

use super::rules::Rule;

/// Which input capability the rendering collaborator should use for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum InputKind {
    Text,
    Password,
    Code,
}

/// How the wizard treats a step when it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum StepRole {
    /// Dispatches the OTP to the entered address before advancing.
    Email,
    /// Verifies the entered code; gated on a prior successful dispatch.
    Otp,
    /// Collected locally, no network call.
    Field,
    /// Performs the flow's terminal action; gated on OTP verification.
    Terminal,
}

/// One entry in a flow's ordered step list.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    /// Unique form-field key, also the branch selector.
    pub name: &'static str,
    /// Human-readable prompt.
    pub label: &'static str,
    pub rules: Vec<Rule>,
    pub input: InputKind,
    pub role: StepRole,
}

impl StepDefinition {
    pub fn new(
        name: &'static str,
        label: &'static str,
        rules: Vec<Rule>,
        input: InputKind,
        role: StepRole,
    ) -> Self {
        Self {
            name,
            label,
            rules,
            input,
            role,
        }
    }
}

/// A complete flow: step order is fixed for the lifetime of one wizard run.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    pub name: &'static str,
    pub steps: Vec<StepDefinition>,
    /// Whether the flow exposes backward navigation (signup does, reset does not).
    pub allows_back: bool,
    /// Named target view handed to the navigator on terminal success.
    pub success_route: &'static str,
    /// Success notice after a completed OTP dispatch.
    pub otp_sent_notice: &'static str,
    /// Fallback error when the terminal action fails without a server message.
    pub terminal_failure_fallback: &'static str,
    /// Fallback success notice when the terminal reply carries no message.
    pub completed_notice: &'static str,
}

impl FlowDefinition {
    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
