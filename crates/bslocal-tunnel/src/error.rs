use std::path::PathBuf;
use std::time::Duration;

use crate::local::ACCESS_KEY_ENV;

/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No access key was given, neither as an option nor in the environment.
    #[error(
        "{ACCESS_KEY_ENV} cannot be empty. Specify one by adding key to options \
         or adding to the environment variable {ACCESS_KEY_ENV}."
    )]
    MissingCredential,

    /// Every candidate location of the tunnel binary failed to run.
    #[error("no working tunnel binary found ({tried} location(s) tried)")]
    ExhaustedCandidates {
        /// Number of candidate locations that were tried.
        tried: usize,
    },

    /// The tunnel binary could not be spawned.
    #[error("failed to spawn {0}: {1}")]
    Spawn(PathBuf, std::io::Error),

    /// The tunnel binary closed its output before reporting a connection.
    #[error("tunnel binary exited before connecting")]
    ExitedBeforeReady,

    /// The tunnel binary didn't report a connection in time.
    #[error("tunnel binary did not connect within {0:?}")]
    ReadyTimeout(Duration),

    /// The tunnel binary reported a state other than connected.
    #[error("tunnel binary reported an error: {0}")]
    Rejected(String),

    /// The stop command exited without acknowledging the stop.
    #[error("tunnel binary did not acknowledge the stop command")]
    StopNotAcknowledged,

    /// I/O error while talking to the tunnel binary.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a start attempt failing with this error may be retried with
    /// another binary location.
    pub const fn is_transient(&self) -> bool {
        !matches!(
            self,
            Self::MissingCredential | Self::ExhaustedCandidates { .. }
        )
    }
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
