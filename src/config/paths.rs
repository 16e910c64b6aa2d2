//! Platform directory resolution.
//!
//! Linux: `~/.config/passlock`, macOS: `~/Library/Application Support/PassLock`,
//! Windows: `%APPDATA%\PassLock\config`.  Vaults live in a `vaults`
//! subdirectory unless `vault_dir` is configured.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::Settings;
use crate::errors::{PassLockError, Result};

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "PassLock";
pub const APP_NAME: &str = "PassLock";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "PASSLOCK_CONFIG_DIR";

/// The directory holding `passlock.toml`.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .ok_or_else(|| PassLockError::Config("cannot determine config directory".into()))?;
    Ok(dirs.config_dir().to_path_buf())
}

/// Resolve the vault root and make sure it exists.
///
/// Precedence: `override_dir` (CLI flag / env), `settings.vault_dir`,
/// then `<config dir>/vaults`.
pub fn vault_root(settings: &Settings, override_dir: Option<&Path>) -> Result<PathBuf> {
    let root = match (override_dir, &settings.vault_dir) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(dir)) => dir.clone(),
        (None, None) => config_dir()?.join("vaults"),
    };
    ensure_private_dir(&root)?;
    Ok(root)
}

/// Create `dir` if missing; on Unix restrict it to the owner.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}
