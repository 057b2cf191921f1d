use std::fmt;

/// Options taking a value, with the flag they are forwarded as.
///
/// An empty flag forwards the bare value.
static VALUE_COMMANDS: &[(&str, &str)] = &[
    ("localIdentifier", "-localIdentifier"),
    ("hosts", ""),
    ("proxyHost", "-proxyHost"),
    ("proxyPort", "-proxyPort"),
    ("proxyUser", "-proxyUser"),
    ("proxyPass", "-proxyPass"),
];

/// Options only forwarded (as the given flag) when their value is `true`.
static BOOLEAN_COMMANDS: &[(&str, &str)] = &[
    ("v", "-vvv"),
    ("force", "-force"),
    ("forcelocal", "-forcelocal"),
    ("forceproxy", "-forceproxy"),
    ("onlyAutomate", "-onlyAutomate"),
];

fn lookup(table: &'static [(&str, &str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, flag)| *flag)
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Arguments forwarded to the tunnel binary, translated from user options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<String>);

impl Arguments {
    /// Returns the argument tokens, in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    fn push_flag(&mut self, flag: &str) {
        if !flag.is_empty() {
            self.0.push(flag.to_owned());
        }
    }

    fn push_value(&mut self, value: &str) {
        if !value.trim().is_empty() {
            self.0.push(value.to_owned());
        }
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of translating user options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// Arguments to forward to the tunnel binary.
    pub arguments: Arguments,

    /// Access key (`key` option).
    pub access_key: Option<String>,

    /// Working folder (`f` option).
    pub folder: Option<String>,

    /// Explicit tunnel binary location (`binarypath` option).
    pub binary_path: Option<String>,

    /// Explicit log file location (`logfile` option).
    pub log_file: Option<String>,
}

/// Translates user options into tunnel binary arguments.
///
/// Options are processed in order. Options the binary doesn't need as flags
/// (`key`, `f`, `binarypath`, `logfile`) are pulled out of the arguments, the
/// last occurrence winning. Unknown options are forwarded as `-<key> <value>`,
/// or as a bare `-<key>` for a `true` value.
pub fn translate<I, K, V>(options: I) -> Translation
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    options
        .into_iter()
        .fold(Translation::default(), |mut translation, (key, value)| {
            translation.add(key.as_ref().trim(), value.into());
            translation
        })
}

impl Translation {
    fn add(&mut self, key: &str, value: String) {
        match key {
            "key" => self.access_key = Some(value),
            "f" => self.folder = Some(value),
            "binarypath" => self.binary_path = Some(value),
            "logfile" => self.log_file = Some(value),
            // legacy, verbosity is set with `v`
            "verbose" => (),
            key => {
                let args = &mut self.arguments;

                if let Some(flag) = lookup(VALUE_COMMANDS, key) {
                    args.push_flag(flag);
                    args.push_value(&value);
                } else if let Some(flag) = lookup(BOOLEAN_COMMANDS, key) {
                    if is_true(&value) {
                        args.push_flag(flag);
                    }
                } else if is_true(&value) {
                    args.push_flag(&format!("-{key}"));
                } else {
                    args.push_flag(&format!("-{key}"));
                    args.push_value(&value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Translation, translate};

    fn args_of(options: &[(&str, &str)]) -> Vec<String> {
        translate(options.iter().copied())
            .arguments
            .as_slice()
            .to_vec()
    }

    #[test]
    fn scalars_are_pulled_out() {
        let translation = translate([
            ("key", "abc"),
            ("f", "/var/www"),
            ("binarypath", "/opt/BrowserStackLocal"),
            ("logfile", "/tmp/local.log"),
            ("verbose", "true"),
        ]);

        assert_eq!(
            translation,
            Translation {
                arguments: Default::default(),
                access_key: Some("abc".to_owned()),
                folder: Some("/var/www".to_owned()),
                binary_path: Some("/opt/BrowserStackLocal".to_owned()),
                log_file: Some("/tmp/local.log".to_owned()),
            }
        );
    }

    #[test]
    fn scalars_last_write_wins() {
        let translation = translate([("key", "first"), (" key ", "second")]);
        assert_eq!(translation.access_key.as_deref(), Some("second"));
    }

    #[test]
    fn verbosity_flag_is_renamed() {
        let args = args_of(&[("v", "true")]);
        assert_eq!(args, ["-vvv"]);
        assert!(!args.contains(&"-v".to_owned()));
    }

    #[test]
    fn false_boolean_command_emits_nothing() {
        assert!(args_of(&[("force", "false")]).is_empty());
        assert!(args_of(&[("onlyAutomate", "nope")]).is_empty());
        assert_eq!(args_of(&[("forcelocal", " TRUE ")]), ["-forcelocal"]);
    }

    #[test]
    fn hosts_value_has_no_flag() {
        assert_eq!(args_of(&[("hosts", "1.2.3.4,80,0")]), ["1.2.3.4,80,0"]);
    }

    #[test]
    fn value_commands_are_renamed() {
        let args = args_of(&[
            ("localIdentifier", "ci-42"),
            ("proxyHost", "proxy.local"),
            ("proxyPort", "3128"),
        ]);
        assert_eq!(
            args,
            [
                "-localIdentifier",
                "ci-42",
                "-proxyHost",
                "proxy.local",
                "-proxyPort",
                "3128"
            ]
        );
    }

    #[test]
    fn unknown_options_pass_through() {
        assert_eq!(args_of(&[("randomFlag", "true")]), ["-randomFlag"]);
        assert_eq!(args_of(&[("randomFlag", "abc")]), ["-randomFlag", "abc"]);
        assert_eq!(
            args_of(&[("a", "1"), ("b", "True"), ("a", "2")]),
            ["-a", "1", "-b", "-a", "2"]
        );
    }

    #[test]
    fn table_lookup_is_case_sensitive() {
        assert_eq!(args_of(&[("V", "true")]), ["-V"]);
        assert_eq!(args_of(&[("Force", "false")]), ["-Force", "false"]);
    }

    #[test]
    fn display_joins_tokens() {
        let translation = translate([("v", "true"), ("localIdentifier", "x")]);
        assert_eq!(translation.arguments.to_string(), "-vvv -localIdentifier x");
    }
}
