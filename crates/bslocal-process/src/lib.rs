//! This crate provides the default implementation of a tunnel launcher (to be
//! used with `bslocal-tunnel`).
//!
//! The launcher spawns the tunnel binary on the **same host machine**, as a
//! child process whose standard output and standard error are watched for
//! status lines.
//!
//! ```no_run
//! use bslocal_process::SystemLauncher;
//! use bslocal_tunnel::local::Local;
//!
//! # async fn example() -> bslocal_tunnel::Result<()> {
//! let mut local = Local::new(SystemLauncher::new());
//!
//! local.start([("key", "ACCESS_KEY")]).await?;
//! local.stop().await;
//! # Ok(())
//! # }
//! ```

mod launcher;
mod process;
mod sys;

pub use self::launcher::SystemLauncher;
pub use self::process::{SystemOutput, SystemProcess};
