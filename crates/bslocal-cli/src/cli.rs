/// BrowserStack Local tunnel manager.
#[derive(clap::Parser)]
pub struct CliOpts {
    /// The command to run.
    #[clap(subcommand)]
    pub action: CliAction,
}

/// The command to run.
#[derive(clap::Subcommand)]
pub enum CliAction {
    /// Command to start the tunnel, and stop it on Ctrl-C.
    Run {
        /// Configuration of the tunnel.
        #[clap(flatten)]
        tunnel: CliTunnel,
    },

    /// Command to print the arguments the tunnel binary would be given,
    /// without launching anything.
    Args {
        /// Configuration of the tunnel.
        #[clap(flatten)]
        tunnel: CliTunnel,
    },
}

/// Configuration of the tunnel.
#[derive(clap::Args)]
pub struct CliTunnel {
    /// Tunnel configuration (KDL format).
    ///
    /// If it ends with `.kdl`, it is treated as a path to a configuration
    /// file. Otherwise it is directly parsed as inline KDL-formatted
    /// configuration.
    #[clap(short, long, value_name = "CONTENT/PATH")]
    pub config: Option<String>,

    /// Access key (read from `BROWSERSTACK_ACCESS_KEY` if not specified).
    #[clap(short, long, value_name = "KEY")]
    pub key: Option<String>,

    /// Option forwarded to the tunnel binary (e.g., `localIdentifier=ci-42`).
    ///
    /// A name without value is a boolean option set to `true`.
    #[clap(short, long = "option", value_name = "NAME[=VALUE]", value_parser = parse_option)]
    pub options: Vec<(String, String)>,
}

/// Error for a malformed `--option`.
#[derive(thiserror::Error, Debug)]
#[error("invalid option `{0}`: expected NAME[=VALUE]")]
pub struct InvalidOption(String);

fn parse_option(option: &str) -> Result<(String, String), InvalidOption> {
    let (name, value) = option.split_once('=').unwrap_or((option, "true"));

    if name.trim().is_empty() {
        return Err(InvalidOption(option.to_owned()));
    }

    Ok((name.to_owned(), value.to_owned()))
}

impl CliOpts {
    /// Parses the CLI from the command-line.
    ///
    /// # Warning
    ///
    /// Exits on error.
    pub fn parse_from_cmdline() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_option;

    #[test]
    fn parse_options() {
        assert_eq!(
            parse_option("localIdentifier=ci=42").ok(),
            Some(("localIdentifier".to_owned(), "ci=42".to_owned()))
        );
        assert_eq!(
            parse_option("forcelocal").ok(),
            Some(("forcelocal".to_owned(), "true".to_owned()))
        );
        assert!(parse_option("=value").is_err());
    }
}
