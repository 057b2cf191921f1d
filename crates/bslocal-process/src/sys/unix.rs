use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

/// Sends `SIGKILL` to the process with the given ID.
///
/// Non-positive IDs are rejected, as they would signal a whole process group.
pub async fn terminate(pid: u32) -> std::io::Result<()> {
    let pid = i32::try_from(pid)
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or(std::io::ErrorKind::InvalidInput)?;

    match nix::sys::signal::kill(Pid::from_raw(pid), Signal::SIGKILL) {
        Ok(()) => {
            tracing::debug!(pid, "process killed");
            Ok(())
        }
        Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
