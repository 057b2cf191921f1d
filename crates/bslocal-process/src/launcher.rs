use std::process::Stdio;

use bslocal_tunnel::Command;
use bslocal_tunnel::launcher::Launcher;

use crate::process::{SystemOutput, SystemProcess};
use crate::sys;

/// Default launcher, spawning the tunnel binary on the host machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    /// Creates a new launcher.
    pub const fn new() -> Self {
        Self
    }
}

impl Launcher for SystemLauncher {
    type Process = SystemProcess;
    type Output = SystemOutput;

    async fn launch(
        &mut self,
        command: &Command,
    ) -> std::io::Result<(Self::Process, Self::Output)> {
        let mut child = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        tracing::debug!(pid = child.id(), program = %command.program.display(), "spawned");

        let output = SystemOutput::capture(&mut child)?;

        Ok((SystemProcess::new(child), output))
    }

    async fn terminate(&mut self, pid: u32) -> std::io::Result<()> {
        if pid == 0 {
            return Err(std::io::ErrorKind::InvalidInput.into());
        }

        sys::terminate(pid).await
    }
}
