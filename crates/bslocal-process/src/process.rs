use bslocal_tunnel::launcher::{ProcessOutput, TunnelProcess};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;

/// Handle over a spawned tunnel binary.
///
/// # Note
///
/// Dropping the handle does **not** kill the process.
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
}

impl SystemProcess {
    pub(crate) const fn new(child: Child) -> Self {
        Self { child }
    }
}

impl TunnelProcess for SystemProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn kill(&mut self) -> std::io::Result<()> {
        if let Some(status) = self.child.try_wait()? {
            tracing::debug!(%status, "process already exited");
            return Ok(());
        }

        match self.child.kill().await {
            Ok(()) => Ok(()),
            // reaped in between
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Lines written by a spawned tunnel binary, on both its standard output and
/// its standard error.
#[derive(Debug)]
pub struct SystemOutput {
    lines: mpsc::Receiver<std::io::Result<String>>,
}

impl SystemOutput {
    /// Takes the output pipes of the given child, and forwards their lines.
    pub(crate) fn capture(child: &mut Child) -> std::io::Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("stdout not captured"))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("stderr not captured"))?;

        let (tx, lines) = mpsc::channel(64);

        forward_lines(stdout, tx.clone());
        forward_lines(stderr, tx);

        Ok(Self { lines })
    }
}

impl ProcessOutput for SystemOutput {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.recv().await.transpose()
    }
}

/// Spawns a task sending every line read from `pipe`, until it is closed.
fn forward_lines<R>(pipe: R, tx: mpsc::Sender<std::io::Result<String>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(pipe).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => Ok(line),
                Ok(None) => break,
                Err(e) => Err(e),
            };

            let is_err = line.is_err();

            if tx.send(line).await.is_err() || is_err {
                break;
            }
        }
    });
}
