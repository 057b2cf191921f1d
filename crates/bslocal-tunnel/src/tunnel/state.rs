use std::fmt;

/// Lifecycle state of the supervised tunnel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TunnelState {
    /// No start attempt is in progress (initially, or after a fallback).
    #[default]
    NotStarted,

    /// The tunnel binary was launched, and its connection is awaited.
    Starting,

    /// The tunnel binary reported an established connection.
    Connected,

    /// The tunnel was killed.
    Stopped,

    /// The last start attempt failed.
    Failed,
}

impl TunnelState {
    /// Returns a short label of the state.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Starting => "starting",
            Self::Connected => "connected",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TunnelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
