// SPDX-License-Identifier: MIT

//! Application layer: the health-records backend client, the concrete
//! signup/password-reset flows, session persistence and the console driver.

pub mod api;
pub mod console;
pub mod flows;
pub mod session;
