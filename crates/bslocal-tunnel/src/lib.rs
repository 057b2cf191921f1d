//! This crate allows to configure, launch and supervise a BrowserStack Local
//! tunnel.
//!
//! The tunnel itself is established by an external binary (`BrowserStackLocal`),
//! which this crate drives:
//! - User options are [translated](self::args::translate) into arguments for
//!   the binary.
//! - The binary is launched, and its output is watched until it reports an
//!   established connection (see [Tunnel](self::tunnel::Tunnel)).
//! - If the binary fails to run, another copy of it is tried from the next
//!   [candidate location](self::locator::BinaryLocator).
//!
//! # Managing a tunnel
//!
//! This is the main use case of this crate.
//!
//! ```no_run
//! use bslocal_tunnel::local::Local;
//! # use bslocal_tunnel::launcher::Launcher;
//!
//! # async fn example(launcher: impl Launcher) -> bslocal_tunnel::Result<()> {
//! let mut local = Local::new(launcher);
//!
//! // the access key is read from `BROWSERSTACK_ACCESS_KEY` if not given
//! local
//!     .start([("localIdentifier", "ci-42"), ("forcelocal", "true")])
//!     .await?;
//!
//! //
//! // run some tests through the tunnel
//! //
//!
//! local.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Implementing a custom launcher
//!
//! The [Launcher](self::launcher::Launcher) trait abstracts how the tunnel
//! binary is spawned. Most of the time, you won't need to implement it: the
//! default launcher spawning the binary on the host machine is provided by
//! `bslocal-process`.

/// Module translating user options into tunnel binary arguments.
pub mod args;

mod command;
mod error;

/// Module containing traits for implementing a custom launcher.
pub mod launcher;

/// Module implementing the tunnel manager.
pub mod local;

/// Module locating the tunnel binary.
pub mod locator;

/// Module implementing the tunnel process supervisor.
pub mod tunnel;

pub use self::command::Command;
pub use self::error::{Error, Result};
