//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use cellar_core::OpenTolerance;
use clap::ValueEnum;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Unit used when printing volumes. Ledger volumes are millilitres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Ml,
    L,
}

impl DisplayUnit {
    /// Converts a ledger volume into this unit.
    pub fn convert(self, ml: f64) -> f64 {
        match self {
            Self::Ml => ml,
            Self::L => ml / 1000.0,
        }
    }

    /// Formats a ledger volume in this unit.
    pub fn format(self, ml: f64) -> String {
        match self {
            Self::Ml => format!("{:.1}", self.convert(ml)),
            Self::L => format!("{:.2}", self.convert(ml)),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ml => "ml",
            Self::L => "l",
        }
    }
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the ledger JSON file.
    pub ledger_path: PathBuf,

    /// Days covered by the leftover timeline.
    pub window_days: u32,

    /// Tolerance for recognising a full-volume opening event.
    pub open_tolerance: OpenTolerance,

    /// Unit for human-readable output.
    pub display_unit: DisplayUnit,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("ledger_path", &self.ledger_path)
            .field("window_days", &self.window_days)
            .field("open_tolerance", &self.open_tolerance.value())
            .field("display_unit", &self.display_unit)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            ledger_path: data_dir.join("ledger.json"),
            window_days: 30,
            open_tolerance: OpenTolerance::DEFAULT,
            display_unit: DisplayUnit::Ml,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CELLAR_*)
        figment = figment.merge(Env::prefixed("CELLAR_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for cellar.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cellar"))
}

/// Returns the platform-specific data directory for cellar.
///
/// On Linux: `~/.local/share/cellar`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("cellar"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_cellar() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "cellar");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_ledger() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.ledger_path, data_dir.join("ledger.json"));
        assert_eq!(config.window_days, 30);
        assert_eq!(config.display_unit, DisplayUnit::Ml);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cellar.toml");
        std::fs::write(
            &path,
            "window_days = 7\nopen_tolerance = 0.5\ndisplay_unit = \"l\"\nledger_path = \"/tmp/bar.json\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.window_days, 7);
        assert!((config.open_tolerance.value() - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.display_unit, DisplayUnit::L);
        assert_eq!(config.ledger_path, PathBuf::from("/tmp/bar.json"));
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cellar.toml");
        std::fs::write(&path, "open_tolerance = -1.0\n").unwrap();
        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_display_unit_formats_litres() {
        assert_eq!(DisplayUnit::Ml.format(1800.0), "1800.0");
        assert_eq!(DisplayUnit::L.format(1800.0), "1.80");
    }
}
