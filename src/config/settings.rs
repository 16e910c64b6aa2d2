use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::errors::{PassLockError, Result};

/// User configuration, loaded from `passlock.toml` in the config directory.
///
/// Every field has a sensible default so PassLock works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault to use when `--vault` is not given.
    #[serde(default = "default_vault")]
    pub default_vault: String,

    /// Directory holding the vault files.  Defaults to the platform
    /// config directory (see `config::paths`).
    #[serde(default)]
    pub vault_dir: Option<PathBuf>,

    /// Argon2 memory cost in KiB for new vaults (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count for new vaults (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree for new vaults (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// How long to wait on a locked vault before failing, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault() -> String {
    "personal".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    KdfParams::DEFAULT.memory_kib
}

fn default_argon2_iterations() -> u32 {
    KdfParams::DEFAULT.iterations
}

fn default_argon2_parallelism() -> u32 {
    KdfParams::DEFAULT.parallelism
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_vault: default_vault(),
            vault_dir: None,
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the config directory.
    pub const FILE_NAME: &'static str = "passlock.toml";

    /// Load settings from `<config_dir>/passlock.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            PassLockError::Config(format!("Failed to read {}: {e}", config_path.display()))
        })?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassLockError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// KDF parameters for newly created vaults.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
            ..KdfParams::DEFAULT
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.default_vault, "personal");
        assert!(s.vault_dir.is_none());
        assert_eq!(s.argon2_memory_kib, 65_536);
        assert_eq!(s.argon2_iterations, 3);
        assert_eq!(s.argon2_parallelism, 4);
        assert_eq!(s.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_vault, "personal");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
default_vault = "work"
vault_dir = "/srv/vaults"
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
busy_timeout_ms = 250
"#;
        fs::write(tmp.path().join(Settings::FILE_NAME), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_vault, "work");
        assert_eq!(settings.vault_dir, Some(PathBuf::from("/srv/vaults")));
        assert_eq!(settings.argon2_memory_kib, 131_072);
        assert_eq!(settings.argon2_iterations, 5);
        assert_eq!(settings.argon2_parallelism, 8);
        assert_eq!(settings.busy_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "default_vault = \"home\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_vault, "home");
        assert!(settings.vault_dir.is_none());
        assert_eq!(settings.argon2_iterations, 3);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(PassLockError::Config(_))));
    }

    #[test]
    fn kdf_params_follow_settings() {
        let s = Settings {
            argon2_memory_kib: 16_384,
            argon2_iterations: 2,
            argon2_parallelism: 1,
            ..Settings::default()
        };
        let p = s.kdf_params();
        assert_eq!(p.memory_kib, 16_384);
        assert_eq!(p.iterations, 2);
        assert_eq!(p.parallelism, 1);
        assert_eq!(p.output_len, KdfParams::DEFAULT.output_len);
    }
}
