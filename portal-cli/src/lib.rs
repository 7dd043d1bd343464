//! Terminal front end for the portal: the same gateway client and chaos
//! orchestration as the browser app, over reqwest.

pub mod commands;
pub mod http;
pub mod report;
pub mod telemetry;

pub use commands::{run, ChaosCommand, Cli, Command, FaultState};
