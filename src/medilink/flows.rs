// SPDX-License-Identifier: MIT

//! The two concrete flow definitions.
//!
//! Step order, rules and notice wording mirror the production client. The
//! password-reset flow marks both password steps as terminal: submitting the
//! first password step already attempts the reset, exactly as the original
//! form did - the backend rejects the half-filled request and the user stays.

use crate::flow::rules::Rule;
use crate::flow::step::{FlowDefinition, InputKind, StepDefinition, StepRole};

/// Account creation: email, otp, name, phone, password. Back navigation is
/// allowed from any step after the first.
pub fn signup() -> FlowDefinition {
    FlowDefinition {
        name: "signup",
        steps: vec![
            StepDefinition::new(
                "email",
                "Email",
                vec![Rule::Required, Rule::Email],
                InputKind::Text,
                StepRole::Email,
            ),
            StepDefinition::new(
                "otp",
                "OTP",
                vec![Rule::Required, Rule::Digits(6)],
                InputKind::Code,
                StepRole::Otp,
            ),
            StepDefinition::new(
                "name",
                "Full Name",
                vec![Rule::Required, Rule::MinLen(3)],
                InputKind::Text,
                StepRole::Field,
            ),
            StepDefinition::new(
                "phone",
                "Phone Number",
                vec![Rule::Required, Rule::Phone],
                InputKind::Text,
                StepRole::Field,
            ),
            StepDefinition::new(
                "password",
                "Password",
                vec![Rule::Required, Rule::MinLen(8)],
                InputKind::Password,
                StepRole::Terminal,
            ),
        ],
        allows_back: true,
        success_route: "/dashboard",
        otp_sent_notice: "OTP Sent",
        terminal_failure_fallback: "Signup failed",
        completed_notice: "Account created successfully!",
    }
}

/// Password reset: email, otp, password, confirmPassword. No back navigation.
pub fn password_reset() -> FlowDefinition {
    FlowDefinition {
        name: "password-reset",
        steps: vec![
            StepDefinition::new(
                "email",
                "Email",
                vec![Rule::Required, Rule::Email],
                InputKind::Text,
                StepRole::Email,
            ),
            StepDefinition::new(
                "otp",
                "OTP",
                vec![Rule::Required, Rule::Digits(6)],
                InputKind::Code,
                StepRole::Otp,
            ),
            StepDefinition::new(
                "password",
                "New Password",
                vec![Rule::Required, Rule::MinLen(8)],
                InputKind::Password,
                StepRole::Terminal,
            ),
            StepDefinition::new(
                "confirmPassword",
                "Confirm Password",
                vec![Rule::Required, Rule::Matches("password")],
                InputKind::Password,
                StepRole::Terminal,
            ),
        ],
        allows_back: false,
        success_route: "/login",
        otp_sent_notice: "OTP sent successfully!",
        terminal_failure_fallback: "Failed to reset password",
        completed_notice: "Password reset successfully!",
    }
}
