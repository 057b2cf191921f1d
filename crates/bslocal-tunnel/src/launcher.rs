use std::future::Future;

use crate::Command;

/// Trait implementing the spawning logic of the tunnel binary.
///
/// The default implementation (spawning the binary on the host machine) is
/// provided by `bslocal-process`.
pub trait Launcher {
    /// Handle over a spawned process.
    type Process: TunnelProcess;

    /// Output stream of a spawned process.
    type Output: ProcessOutput;

    /// Spawns a process with the given command line.
    ///
    /// Both the standard output and the standard error of the process are
    /// expected to be forwarded to the returned output stream.
    fn launch(
        &mut self,
        command: &Command,
    ) -> impl Future<Output = std::io::Result<(Self::Process, Self::Output)>>;

    /// Forcibly terminates the process with the given ID, which is not a
    /// process spawned by [launch](Self::launch) (e.g., the daemon forked by
    /// the tunnel binary).
    ///
    /// Terminating a process which already exited is not an error. A zero
    /// ID is rejected with [InvalidInput](std::io::ErrorKind::InvalidInput).
    fn terminate(&mut self, pid: u32) -> impl Future<Output = std::io::Result<()>>;
}

/// Trait implemented by a handle over a spawned process.
pub trait TunnelProcess {
    /// Returns the OS-assigned process ID, if the process is still known to
    /// be running.
    fn id(&self) -> Option<u32>;

    /// Forcibly terminates the process.
    ///
    /// Killing a process which already exited is not an error.
    fn kill(&mut self) -> impl Future<Output = std::io::Result<()>>;
}

/// Trait implemented by the output stream of a spawned process.
///
/// The stream is consumed by a background task, hence the `Send + 'static`
/// requirements.
pub trait ProcessOutput: Send + 'static {
    /// Returns the next line written by the process, or `None` once the
    /// process closed its output.
    fn next_line(&mut self) -> impl Future<Output = std::io::Result<Option<String>>> + Send;
}
