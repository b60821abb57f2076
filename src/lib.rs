// SPDX-License-Identifier: MIT

//! medilink-rs: a client for the MediLink health-records backend.
//!
//! The crate is split the same way the binary uses it: [`flow`] holds the
//! reusable verification-wizard machinery, [`medilink`] the concrete API
//! bindings, flow definitions and console front end.

pub mod flow;
pub mod medilink;
