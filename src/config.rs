//! Deployment configuration.
//!
//! Capacity, padding, and oversize-threshold constants are part of the
//! external wire contract (see [`crate::model`]) and are therefore not
//! configurable here. `Config` only covers the genuinely deployment-local
//! knobs: where the durable store file lives, where exports land, and
//! which page-dimension oracle to probe documents with.

use std::path::PathBuf;

/// Which [`crate::detect::PageDimensionOracle`] implementation to probe
/// documents with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleKind {
    /// Placeholder oracle producing randomized page counts and oversized
    /// pages, matching the reference implementation's lack of a linked PDF
    /// library. Suitable for demonstration runs only.
    #[default]
    Random,
    /// Deterministic oracle for tests, fed by a fixture table.
    Fixed,
}

/// Deployment-local configuration for a single allocation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filename of the durable store, resolved relative to the project
    /// path unless absolute.
    pub database_filename: String,
    /// Subdirectory (relative to the project path) that exported JSON
    /// files are written into.
    pub export_subdir: String,
    /// Which oracle implementation to probe documents with.
    pub oracle: OracleKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_filename: "microfilm.db".to_string(),
            export_subdir: ".data".to_string(),
            oracle: OracleKind::Random,
        }
    }
}

impl Config {
    /// Resolves the durable store path for a given project root.
    pub fn database_path(&self, project_path: &std::path::Path) -> PathBuf {
        let candidate = PathBuf::from(&self.database_filename);
        if candidate.is_absolute() {
            candidate
        } else {
            project_path.join(candidate)
        }
    }

    /// Resolves the export directory for a given project root.
    pub fn export_dir(&self, project_path: &std::path::Path) -> PathBuf {
        project_path.join(&self.export_subdir)
    }

    /// Loads configuration from a TOML file, falling back to defaults for
    /// any field the file omits.
    pub fn load(path: &std::path::Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&text)
            .map_err(|e| crate::MicrofilmError::InvalidInput(format!("invalid config: {e}")))?;
        Ok(partial.into_config())
    }

    /// Loads configuration from `path` if given, else from the default
    /// per-user config path if it exists, else falls back to defaults.
    /// Mirrors the CLI's `--config`-or-discover-or-default resolution
    /// order.
    pub fn load_or_default(explicit: Option<&std::path::Path>) -> crate::Result<Self> {
        let candidate = explicit.map(|p| p.to_path_buf()).or_else(default_config_path);
        match candidate {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// The default per-user config path (`<config_dir>/microfilm/config.toml`),
/// or `None` if the platform has no resolvable config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("microfilm").join("config.toml"))
}

#[derive(Debug, Default, serde::Deserialize)]
struct PartialConfig {
    database_filename: Option<String>,
    export_subdir: Option<String>,
}

impl PartialConfig {
    fn into_config(self) -> Config {
        let default = Config::default();
        Config {
            database_filename: self.database_filename.unwrap_or(default.database_filename),
            export_subdir: self.export_subdir.unwrap_or(default.export_subdir),
            oracle: default.oracle,
        }
    }
}
