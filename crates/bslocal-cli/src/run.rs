use std::io::Write;
use std::time::Duration;

use bslocal_process::SystemLauncher;
use bslocal_tunnel::args::translate;
use bslocal_tunnel::local::Local;
use bslocal_tunnel::tunnel::Tunnel;
use miette::IntoDiagnostic;

use crate::{CliTunnel, TunnelConfig};

/// Runs the subcommand for starting a tunnel.
///
/// The tunnel is stopped on Ctrl-C.
pub fn evaluate_run(tunnel: CliTunnel) -> miette::Result<()> {
    let (settings, options) = load_options(tunnel)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    runtime.block_on(async move {
        let tunnel = Tunnel::new(SystemLauncher::new())
            .ready_timeout(Duration::from_secs(settings.ready_timeout));

        let mut local = Local::with_tunnel(tunnel);

        local.start(options).await.into_diagnostic()?;

        tracing::info!(
            binary = %local.tunnel().locator().current_binary().display(),
            "tunnel connected, press Ctrl-C to stop it"
        );

        let res = tokio::signal::ctrl_c().await.into_diagnostic();

        local.stop().await;

        res
    })
}

/// Runs the subcommand for printing the tunnel binary arguments.
pub fn evaluate_args(tunnel: CliTunnel, mut output: impl Write) -> miette::Result<()> {
    let (_, options) = load_options(tunnel)?;

    writeln!(output, "{}", translate(options).arguments).into_diagnostic()
}

struct Settings {
    ready_timeout: u64,
}

fn load_options(tunnel: CliTunnel) -> miette::Result<(Settings, Vec<(String, String)>)> {
    let config = tunnel
        .config
        .as_deref()
        .map(TunnelConfig::parse)
        .transpose()?
        .unwrap_or_default();

    let settings = Settings {
        ready_timeout: config.ready_timeout,
    };

    Ok((settings, config.into_options(tunnel.key, tunnel.options)))
}
