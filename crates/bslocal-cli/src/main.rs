#![allow(missing_docs)]
#![allow(clippy::print_stderr)]

use bslocal_cli::{CliAction, CliOpts};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    let cli = CliOpts::parse_from_cmdline();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("BSLOCAL_LOG")
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let res = match cli.action {
        CliAction::Run { tunnel } => bslocal_cli::evaluate_run(tunnel),
        CliAction::Args { tunnel } => bslocal_cli::evaluate_args(tunnel, std::io::stdout()),
    };

    if let Err(e) = res {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
