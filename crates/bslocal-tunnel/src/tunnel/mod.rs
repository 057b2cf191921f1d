mod state;
mod status;

use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::oneshot;

pub use self::state::TunnelState;
use self::status::Status;
use crate::args::Arguments;
use crate::launcher::{Launcher, ProcessOutput, TunnelProcess};
use crate::locator::BinaryLocator;
use crate::{Command, Error, Result};

/// Default bound on the wait for the tunnel binary to connect.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(60);

/// Default bound on the wait for the tunnel binary to acknowledge a stop.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(15);

/// Command passed to the tunnel binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Establish the tunnel.
    Start,

    /// Tear down a previously established tunnel.
    Stop,
}

impl RunMode {
    /// Returns the command name understood by the tunnel binary.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supervisor of the tunnel binary.
///
/// It owns the process spawned for the tunnel, detects when the connection
/// is established, and selects which copy of the binary to run.
pub struct Tunnel<L: Launcher> {
    /// Spawning logic of the tunnel binary.
    launcher: L,

    /// Candidate locations of the tunnel binary.
    locator: BinaryLocator,

    /// Candidate locations given at creation, restored by
    /// [reset_binary_path](Self::reset_binary_path).
    default_locator: BinaryLocator,

    /// Translated user options, forwarded on every launch.
    arguments: Arguments,

    state: TunnelState,

    /// Process spawned by the last successful start.
    process: Option<L::Process>,

    /// Daemon process reported by the tunnel binary once connected.
    daemon_pid: Option<NonZeroU32>,

    ready_timeout: Duration,
    stop_timeout: Duration,
}

impl<L: Launcher> Tunnel<L> {
    /// Creates a supervisor looking for the tunnel binary in the
    /// [platform default](BinaryLocator::platform_default) locations.
    pub fn new(launcher: L) -> Self {
        Self::with_locator(launcher, BinaryLocator::platform_default())
    }

    /// Creates a supervisor looking for the tunnel binary with the given
    /// locator.
    pub fn with_locator(launcher: L, locator: BinaryLocator) -> Self {
        Self {
            launcher,
            default_locator: locator.clone(),
            locator,
            arguments: Arguments::default(),
            state: TunnelState::NotStarted,
            process: None,
            daemon_pid: None,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }

    /// Sets the bound on the wait for the tunnel binary to connect.
    pub const fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Sets the bound on the wait for the tunnel binary to acknowledge a stop.
    pub const fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Uses the given tunnel binary.
    ///
    /// An explicit binary is trusted as-is: no other location is tried if it
    /// fails to run.
    pub fn set_binary_path(&mut self, path: impl Into<PathBuf>) {
        self.locator = BinaryLocator::explicit(path);
    }

    /// Goes back to the candidate locations the supervisor was created with,
    /// selecting the first one.
    pub fn reset_binary_path(&mut self) {
        self.locator = self.default_locator.clone();
    }

    /// Sets the arguments forwarded to the tunnel binary on every launch.
    pub fn set_binary_arguments(&mut self, arguments: Arguments) {
        self.arguments = arguments;
    }

    /// Returns the candidate locations of the tunnel binary.
    pub const fn locator(&self) -> &BinaryLocator {
        &self.locator
    }

    /// Returns the current state of the tunnel.
    pub const fn state(&self) -> TunnelState {
        self.state
    }

    /// Whether the tunnel binary reported an established connection.
    pub fn is_connected(&self) -> bool {
        self.state == TunnelState::Connected
    }

    /// Builds the command line of the selected tunnel binary:
    ///
    /// ```text
    /// <binary> [-f] <access_key> [<folder>] <arguments...> [-logFile <log_file>] -d <mode>
    /// ```
    ///
    /// The log file is only passed when starting. The folder, if any, comes
    /// right after the access key.
    pub fn command(
        &self,
        access_key: &str,
        folder: Option<&str>,
        log_file: &Path,
        mode: RunMode,
    ) -> Command {
        let mut cmd = Command::new(self.locator.current_binary());

        cmd = match folder.filter(|folder| !folder.trim().is_empty()) {
            Some(folder) => cmd.args(["-f", access_key, folder]),
            None => cmd.arg(access_key),
        };

        cmd = cmd.args(&self.arguments);

        if mode == RunMode::Start {
            cmd = cmd
                .arg("-logFile")
                .arg(log_file.to_string_lossy().into_owned());
        }

        cmd.args(["-d", mode.as_str()])
    }

    /// Runs the selected tunnel binary with the given command.
    ///
    /// When starting, this waits until the tunnel binary reports an
    /// established connection. On failure, the spawned process is killed and
    /// the error is returned: trying another binary location is up to the
    /// caller (see [fallback_paths](Self::fallback_paths)).
    ///
    /// When stopping, this waits until the tunnel binary acknowledges the
    /// stop. The process of the running tunnel is left untouched (see
    /// [kill](Self::kill)).
    #[tracing::instrument(
        name = "Run",
        skip_all,
        fields(mode = %mode, binary = %self.locator.current_binary().display())
    )]
    pub async fn run(
        &mut self,
        access_key: &str,
        folder: Option<&str>,
        log_file: &Path,
        mode: RunMode,
    ) -> Result<()> {
        let command = self.command(access_key, folder, log_file, mode);

        tracing::debug!(command = %command.redacted(access_key), "launching");

        match mode {
            RunMode::Start => self.start(command, log_file).await,
            RunMode::Stop => self.stop(command).await,
        }
    }

    async fn start(&mut self, command: Command, log_file: &Path) -> Result<()> {
        if self.process.is_some() || self.daemon_pid.is_some() {
            tracing::warn!("killing leftover tunnel process");
            self.kill().await;
        }

        self.state = TunnelState::Starting;

        match self.launch_and_wait(&command, RunMode::Start).await {
            Ok((process, daemon_pid)) => {
                tracing::info!(
                    pid = process.id(),
                    daemon_pid = daemon_pid.map(NonZeroU32::get),
                    log_file = %log_file.display(),
                    "tunnel connected"
                );

                self.process = Some(process);
                self.daemon_pid = daemon_pid;
                self.state = TunnelState::Connected;

                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    log_file = %log_file.display(),
                    "tunnel failed to start"
                );

                self.state = TunnelState::Failed;

                Err(e)
            }
        }
    }

    async fn stop(&mut self, command: Command) -> Result<()> {
        let (_process, _) = self.launch_and_wait(&command, RunMode::Stop).await?;

        tracing::info!("tunnel stop acknowledged");

        Ok(())
    }

    /// Launches the given command, and waits for the outcome of the given
    /// mode to be reported on the process output.
    ///
    /// The process is killed if the outcome is a failure.
    async fn launch_and_wait(
        &mut self,
        command: &Command,
        mode: RunMode,
    ) -> Result<(L::Process, Option<NonZeroU32>)> {
        let (mut process, output) = self
            .launcher
            .launch(command)
            .await
            .map_err(|e| Error::Spawn(command.program.clone(), e))?;

        tracing::debug!(pid = process.id(), "spawned");

        let (timeout, timeout_err) = match mode {
            RunMode::Start => (self.ready_timeout, Error::ReadyTimeout(self.ready_timeout)),
            RunMode::Stop => (self.stop_timeout, Error::StopNotAcknowledged),
        };

        let outcome = match tokio::time::timeout(timeout, watch(output, mode)).await {
            Ok(Ok(outcome)) => outcome,
            // watcher task is gone without reporting
            Ok(Err(_)) => Err(unreported(mode)),
            Err(_) => Err(timeout_err),
        };

        match outcome {
            Ok(daemon_pid) => Ok((process, daemon_pid)),
            Err(e) => {
                if let Err(kill_err) = process.kill().await {
                    tracing::warn!(error = %kill_err, "failed to kill tunnel process");
                }
                Err(e)
            }
        }
    }

    /// Forcibly terminates the tunnel, if any is running.
    ///
    /// Both the process spawned for the tunnel and the daemon it reported are
    /// killed. This never fails: errors are logged, and the tunnel is
    /// considered stopped.
    pub async fn kill(&mut self) {
        if let Some(mut process) = self.process.take() {
            let pid = process.id();
            match process.kill().await {
                Ok(()) => tracing::debug!(pid, "tunnel process killed"),
                Err(e) => tracing::warn!(error = %e, pid, "failed to kill tunnel process"),
            }
        }

        if let Some(pid) = self.daemon_pid.take().map(NonZeroU32::get) {
            match self.launcher.terminate(pid).await {
                Ok(()) => tracing::debug!(pid, "tunnel daemon killed"),
                Err(e) => tracing::warn!(error = %e, pid, "failed to kill tunnel daemon"),
            }
        }

        self.state = TunnelState::Stopped;
    }

    /// Selects the next candidate location of the tunnel binary, for the
    /// next [run](Self::run).
    ///
    /// # Errors
    ///
    /// Fails with [Error::ExhaustedCandidates] if every location was tried.
    pub fn fallback_paths(&mut self) -> Result<()> {
        let binary = self.locator.advance()?;

        tracing::info!(binary = %binary.display(), "falling back to next binary location");

        self.state = TunnelState::NotStarted;

        Ok(())
    }
}

const fn unreported(mode: RunMode) -> Error {
    match mode {
        RunMode::Start => Error::ExitedBeforeReady,
        RunMode::Stop => Error::StopNotAcknowledged,
    }
}

/// Spawns a task consuming the process output, returning a receiver for the
/// outcome of the given mode.
///
/// The task keeps logging the process output once the outcome is reported,
/// until the process closes it.
fn watch<O: ProcessOutput>(
    mut output: O,
    mode: RunMode,
) -> oneshot::Receiver<Result<Option<NonZeroU32>>> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut tx = Some(tx);

        loop {
            let line = match output.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read tunnel output");
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(Err(e.into()));
                    }
                    return;
                }
            };

            tracing::debug!(%line, "tunnel output");

            let outcome = Status::parse(&line).and_then(|status| status.outcome(mode));

            if let Some(outcome) = outcome {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(outcome);
                }
            }
        }

        if let Some(tx) = tx.take() {
            let _ = tx.send(Err(unreported(mode)));
        }
    });

    rx
}
