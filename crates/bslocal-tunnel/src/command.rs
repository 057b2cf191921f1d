use std::fmt;
use std::path::PathBuf;

/// A process builder, describing how the tunnel binary should be spawned by
/// a [Launcher](crate::launcher::Launcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Program to spawn.
    pub program: PathBuf,

    /// Program arguments for the process to spawn.
    pub args: Vec<String>,
}

impl Command {
    /// Constructs a new `Command` for launching the program at
    /// path `program`, without any argument.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds an argument to pass to the program.
    ///
    /// Only one argument can be passed per use, it is never split on
    /// whitespace. To pass multiple arguments see [`args`](Self::args).
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments to pass to the program.
    ///
    /// To pass a single argument see [`arg`](Self::arg).
    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        args.into_iter().fold(self, |cmd, arg| cmd.arg(arg))
    }

    /// Returns the command with every argument equal to `secret` replaced by
    /// a placeholder, suitable for logging.
    pub fn redacted(&self, secret: &str) -> Self {
        let mut cmd = self.clone();
        cmd.args
            .iter_mut()
            .filter(|arg| arg.as_str() == secret)
            .for_each(|arg| *arg = "<redacted>".to_owned());
        cmd
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;

        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }

        Ok(())
    }
}
