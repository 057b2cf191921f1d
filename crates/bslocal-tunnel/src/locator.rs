use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File name of the tunnel binary.
#[cfg(windows)]
pub const BINARY_NAME: &str = "BrowserStackLocal.exe";

/// File name of the tunnel binary.
#[cfg(not(windows))]
pub const BINARY_NAME: &str = "BrowserStackLocal";

/// Ordered candidate locations of the tunnel binary.
///
/// The first candidate is selected initially, and [advance](Self::advance)
/// moves to the next one whenever the selected binary failed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryLocator {
    binaries: Vec<PathBuf>,
    cursor: usize,
}

impl BinaryLocator {
    /// Creates a locator looking for the tunnel binary in each of the given
    /// directories, in order.
    ///
    /// Without any directory, the binary is looked up in the `PATH`.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let binaries: Vec<_> = dirs
            .into_iter()
            .map(|dir| dir.as_ref().join(BINARY_NAME))
            .collect();

        if binaries.is_empty() {
            return Self::explicit(BINARY_NAME);
        }

        Self {
            binaries,
            cursor: 0,
        }
    }

    /// Creates a locator with the conventional install directories:
    ///
    /// 1. `~/.browserstack`
    /// 2. the current working directory
    /// 3. the system temporary directory
    pub fn platform_default() -> Self {
        let dirs = [
            dirs::home_dir().map(|home| home.join(".browserstack")),
            std::env::current_dir().ok(),
            Some(std::env::temp_dir()),
        ];

        Self::new(dirs.into_iter().flatten())
    }

    /// Creates a locator with a single, explicitly given binary.
    pub fn explicit(binary: impl Into<PathBuf>) -> Self {
        Self {
            binaries: vec![binary.into()],
            cursor: 0,
        }
    }

    /// Returns the path of the selected binary.
    pub fn current_binary(&self) -> &Path {
        &self.binaries[self.cursor]
    }

    /// Returns the directory containing the selected binary.
    pub fn current_dir(&self) -> &Path {
        self.current_binary()
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    /// Returns the index of the selected binary.
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Returns the number of candidates.
    pub fn count(&self) -> usize {
        self.binaries.len()
    }

    /// Selects the next candidate.
    ///
    /// # Errors
    ///
    /// Fails with [Error::ExhaustedCandidates] if the last candidate was
    /// already selected.
    pub fn advance(&mut self) -> Result<&Path> {
        if self.cursor + 1 >= self.binaries.len() {
            return Err(Error::ExhaustedCandidates {
                tried: self.binaries.len(),
            });
        }

        self.cursor += 1;

        Ok(self.current_binary())
    }
}
