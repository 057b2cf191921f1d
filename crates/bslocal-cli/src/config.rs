use std::ffi::OsStr;
use std::path::Path;

use miette::IntoDiagnostic;

/// Configuration of the tunnel.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct TunnelConfig {
    /// Access key.
    #[knus(child, unwrap(argument))]
    pub key: Option<String>,

    /// Working folder of the tunnel binary.
    #[knus(child, unwrap(argument))]
    pub folder: Option<String>,

    /// Explicit location of the tunnel binary.
    #[knus(child, unwrap(argument))]
    pub binary_path: Option<String>,

    /// Explicit location of the tunnel log file.
    #[knus(child, unwrap(argument))]
    pub log_file: Option<String>,

    /// Maximum time (in seconds) to wait for the tunnel to connect.
    #[knus(child, default = 60, unwrap(argument))]
    pub ready_timeout: u64,

    /// Options forwarded to the tunnel binary.
    #[knus(children(name = "option"))]
    pub options: Vec<TunnelOption>,
}

/// Option forwarded to the tunnel binary.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct TunnelOption {
    /// Name of the option.
    #[knus(argument)]
    pub name: String,

    /// Value of the option (`true` if not specified).
    #[knus(argument)]
    pub value: Option<String>,
}

impl TunnelConfig {
    /// Parses the configuration, either from a `.kdl` file or from inline
    /// content.
    pub fn parse(config: &str) -> miette::Result<Self> {
        let path = Path::new(config);

        let config = if let Some((filename, "kdl")) = path
            .file_name()
            .and_then(OsStr::to_str)
            .zip(path.extension().and_then(OsStr::to_str))
        {
            let content = std::fs::read_to_string(path).into_diagnostic()?;
            knus::parse(filename, &content)?
        } else {
            knus::parse("<content>", config)?
        };

        Ok(config)
    }

    /// Returns the options of the tunnel manager, in order:
    ///
    /// 1. the configuration's dedicated nodes (`key`, `folder`...)
    /// 2. the configuration's `option` nodes
    /// 3. the given `key`, and `extra` options
    ///
    /// For `key`, `f`, `binarypath` and `logfile`, the last occurrence wins.
    pub fn into_options(
        self,
        key: Option<String>,
        extra: Vec<(String, String)>,
    ) -> Vec<(String, String)> {
        let scalars = [
            ("key", self.key),
            ("f", self.folder),
            ("binarypath", self.binary_path),
            ("logfile", self.log_file),
        ];

        scalars
            .into_iter()
            .filter_map(|(name, value)| Some((name.to_owned(), value?)))
            .chain(self.options.into_iter().map(|opt| {
                let value = opt.value.unwrap_or_else(|| "true".to_owned());
                (opt.name, value)
            }))
            .chain(key.map(|key| ("key".to_owned(), key)))
            .chain(extra)
            .collect()
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            key: None,
            folder: None,
            binary_path: None,
            log_file: None,
            ready_timeout: 60,
            options: Vec::new(),
        }
    }
}
