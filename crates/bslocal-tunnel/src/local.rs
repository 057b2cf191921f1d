use std::path::PathBuf;

use crate::args::translate;
use crate::launcher::Launcher;
use crate::tunnel::{RunMode, Tunnel};
use crate::{Error, Result};

/// Environment variable holding the access key, when no `key` option is
/// given.
pub const ACCESS_KEY_ENV: &str = "BROWSERSTACK_ACCESS_KEY";

/// File name of the default tunnel log file.
pub const LOG_FILE_NAME: &str = "local.log";

/// Lookup function for environment variables.
pub type EnvLookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Entry point for managing a BrowserStack Local tunnel.
///
/// ```no_run
/// # async fn example<L: bslocal_tunnel::launcher::Launcher>(launcher: L) -> bslocal_tunnel::Result<()> {
/// use bslocal_tunnel::local::Local;
///
/// let mut local = Local::new(launcher);
///
/// local
///     .start([("key", "ACCESS_KEY"), ("localIdentifier", "ci-42")])
///     .await?;
/// assert!(local.is_running());
///
/// local.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct Local<L: Launcher> {
    tunnel: Tunnel<L>,
    session: Option<Session>,
    env: EnvLookup,
}

/// Parameters of a started tunnel, needed to stop it.
struct Session {
    access_key: String,
    folder: Option<String>,
    log_file: PathBuf,
}

impl<L: Launcher> Local<L> {
    /// Creates a manager looking for the tunnel binary in the platform
    /// default locations.
    pub fn new(launcher: L) -> Self {
        Self::with_tunnel(Tunnel::new(launcher))
    }

    /// Creates a manager driving the given tunnel supervisor.
    pub fn with_tunnel(tunnel: Tunnel<L>) -> Self {
        Self {
            tunnel,
            session: None,
            env: process_env,
        }
    }

    /// Uses the given function to look up environment variables, instead of
    /// the process environment.
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Returns the tunnel supervisor.
    pub const fn tunnel(&self) -> &Tunnel<L> {
        &self.tunnel
    }

    /// Whether the tunnel was started and is connected.
    pub fn is_running(&self) -> bool {
        self.session.is_some() && self.tunnel.is_connected()
    }

    /// Starts the tunnel with the given options.
    ///
    /// Every call starts over from the first candidate location (or the
    /// given `binarypath`). If the selected tunnel binary fails to run, the
    /// next candidate location is tried, until one connects.
    ///
    /// # Errors
    ///
    /// - [Error::MissingCredential] if no access key was found (nothing is
    ///   launched).
    /// - [Error::ExhaustedCandidates] if every tunnel binary failed to run.
    #[tracing::instrument(name = "Start", skip_all)]
    pub async fn start<I, K, V>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let translation = translate(options);

        let access_key = resolve_access_key(translation.access_key, self.env)?;

        match non_blank(translation.binary_path) {
            Some(binary_path) => self.tunnel.set_binary_path(binary_path),
            None => self.tunnel.reset_binary_path(),
        }

        let log_file = non_blank(translation.log_file)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.tunnel.locator().current_dir().join(LOG_FILE_NAME));

        let folder = non_blank(translation.folder);

        tracing::debug!(arguments = %translation.arguments, "translated options");

        self.tunnel.set_binary_arguments(translation.arguments);

        // the previous tunnel is killed by the first attempt
        self.session = None;

        loop {
            match self
                .tunnel
                .run(&access_key, folder.as_deref(), &log_file, RunMode::Start)
                .await
            {
                Ok(()) => break,
                Err(e) if e.is_transient() => {
                    tracing::warn!(error = %e, "Running Local failed. Falling back to backup path.");
                    self.tunnel.fallback_paths()?;
                }
                Err(e) => return Err(e),
            }
        }

        self.session = Some(Session {
            access_key,
            folder,
            log_file,
        });

        Ok(())
    }

    /// Stops the tunnel.
    ///
    /// The tunnel binary is asked to stop the tunnel, and the tunnel process
    /// is then killed in any case. Failures are logged, never returned.
    #[tracing::instrument(name = "Stop", skip_all)]
    pub async fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self
                .tunnel
                .run(
                    &session.access_key,
                    session.folder.as_deref(),
                    &session.log_file,
                    RunMode::Stop,
                )
                .await
            {
                tracing::warn!(error = %e, "failed to stop tunnel gracefully");
            }
        } else {
            tracing::debug!("no tunnel started");
        }

        self.tunnel.kill().await;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Returns the access key given explicitly, or else found in the
/// environment, with all whitespace stripped.
fn resolve_access_key(explicit: Option<String>, env: EnvLookup) -> Result<String> {
    non_blank(explicit)
        .or_else(|| env(ACCESS_KEY_ENV))
        .map(|key| key.split_whitespace().collect::<String>())
        .filter(|key| !key.is_empty())
        .ok_or(Error::MissingCredential)
}
