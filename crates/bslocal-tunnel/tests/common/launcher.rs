use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bslocal_tunnel::Command;
use bslocal_tunnel::launcher::{Launcher, ProcessOutput, TunnelProcess};

/// Scripted behavior of a single launch.
pub enum Script {
    /// The binary doesn't exist.
    Missing,

    /// The binary prints the given lines, then exits.
    Exit(Vec<&'static str>),

    /// The binary prints the given lines, then hangs.
    Hang(Vec<&'static str>),
}

#[derive(Default)]
struct Inner {
    scripts: VecDeque<Script>,
    launched: Vec<Command>,
    killed: Vec<u32>,
    terminated: Vec<u32>,
}

/// Launcher replaying scripted launches, and recording what it was asked to
/// do.
///
/// A launch without any script left behaves like [Script::Missing].
#[derive(Clone, Default)]
pub struct FakeLauncher {
    inner: Arc<Mutex<Inner>>,
}

impl FakeLauncher {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        let launcher = Self::default();
        launcher.inner.lock().unwrap().scripts.extend(scripts);
        launcher
    }

    pub fn push(&self, script: Script) {
        self.inner.lock().unwrap().scripts.push_back(script);
    }

    pub fn launched(&self) -> Vec<Command> {
        self.inner.lock().unwrap().launched.clone()
    }

    pub fn killed(&self) -> Vec<u32> {
        self.inner.lock().unwrap().killed.clone()
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.inner.lock().unwrap().terminated.clone()
    }
}

impl Launcher for FakeLauncher {
    type Process = FakeProcess;
    type Output = FakeOutput;

    async fn launch(&mut self, command: &Command) -> std::io::Result<(FakeProcess, FakeOutput)> {
        let mut inner = self.inner.lock().unwrap();

        inner.launched.push(command.clone());
        let id = inner.launched.len() as u32;

        let (lines, hang) = match inner.scripts.pop_front().unwrap_or(Script::Missing) {
            Script::Missing => return Err(std::io::ErrorKind::NotFound.into()),
            Script::Exit(lines) => (lines, false),
            Script::Hang(lines) => (lines, true),
        };

        let process = FakeProcess {
            id,
            inner: Arc::clone(&self.inner),
        };

        let output = FakeOutput {
            lines: lines.into_iter().map(str::to_owned).collect(),
            hang,
        };

        Ok((process, output))
    }

    async fn terminate(&mut self, pid: u32) -> std::io::Result<()> {
        if pid == 0 {
            return Err(std::io::ErrorKind::InvalidInput.into());
        }
        self.inner.lock().unwrap().terminated.push(pid);
        Ok(())
    }
}

pub struct FakeProcess {
    id: u32,
    inner: Arc<Mutex<Inner>>,
}

impl TunnelProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.id)
    }

    async fn kill(&mut self) -> std::io::Result<()> {
        self.inner.lock().unwrap().killed.push(self.id);
        Ok(())
    }
}

pub struct FakeOutput {
    lines: VecDeque<String>,
    hang: bool,
}

impl ProcessOutput for FakeOutput {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.hang => std::future::pending().await,
            None => Ok(None),
        }
    }
}
