/// Forcibly terminates the process with the given ID, with `taskkill`.
pub async fn terminate(pid: u32) -> std::io::Result<()> {
    let output = tokio::process::Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .output()
        .await?;

    // not found is reported with a failure exit code
    if !output.status.success() {
        tracing::debug!(pid, stderr = %String::from_utf8_lossy(&output.stderr), "taskkill");
    }

    Ok(())
}
