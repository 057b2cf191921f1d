//! Crate implementing the CLI commands.

mod cli;
mod config;
mod run;

pub use self::cli::{CliAction, CliOpts, CliTunnel, InvalidOption};
pub use self::config::{TunnelConfig, TunnelOption};
pub use self::run::{evaluate_args, evaluate_run};
