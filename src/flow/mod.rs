// SPDX-License-Identifier: MIT

//! Generic verification-flow toolkit: step definitions, validation rules,
//! the wizard state machine and the collaborator seams it drives.

pub mod error;
pub mod ports;
pub mod rules;
pub mod step;
pub mod wizard;
