//! Shared test harness modules for the carmatch CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod command_steps;
mod helpers;
mod rate_unit;
mod session_unit;
