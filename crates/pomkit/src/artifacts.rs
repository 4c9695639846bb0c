//! Screenshot artifact output.
//!
//! Files are named `<scenario>_<env>_<target>.png`. The directory is
//! append-only: an existing file is never overwritten, a numeric suffix is
//! added instead. Write failures are logged and swallowed.

use crate::config::EnvKey;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Distinguishing parts of an artifact file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// Scenario name
    pub scenario: String,
    /// Environment the scenario ran against
    pub env: EnvKey,
    /// What was captured
    pub target: String,
}

impl ArtifactName {
    /// Create a new artifact name
    #[must_use]
    pub fn new(scenario: impl Into<String>, env: EnvKey, target: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            env,
            target: target.into(),
        }
    }

    /// File stem, with path-unsafe characters replaced
    #[must_use]
    pub fn stem(&self) -> String {
        format!(
            "{}_{}_{}",
            sanitize(&self.scenario),
            self.env,
            sanitize(&self.target)
        )
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.png", self.stem())
    }
}

/// Replace everything but ASCII alphanumerics, `-` and `.` with `_`
fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// Directory screenshots are written to
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir` (created on first write)
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write PNG bytes under `name`.
    ///
    /// Returns the written path, or `None` after logging a warning if the
    /// file could not be written.
    pub fn save_screenshot(&self, name: &ArtifactName, png: &[u8]) -> Option<PathBuf> {
        match self.write_new(&name.stem(), png) {
            Ok(path) => {
                debug!(path = %path.display(), "screenshot saved");
                Some(path)
            }
            Err(e) => {
                warn!(artifact = %name, dir = %self.dir.display(), error = %e, "screenshot not saved");
                None
            }
        }
    }

    fn write_new(&self, stem: &str, png: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let mut attempt = 0_u32;
        loop {
            let file_name = if attempt == 0 {
                format!("{stem}.png")
            } else {
                format!("{stem}-{attempt}.png")
            };
            let path = self.dir.join(file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(png)?;
                    file.flush()?;
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new("test-results")
    }
}
