//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{self, Settings};
use crate::errors::{PassLockError, Result};
use crate::vault::{Session, VaultManager, VaultStore};

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable read before prompting for the master password.
pub const PASSWORD_ENV: &str = "PASSLOCK_PASSWORD";

/// PassLock CLI: local encrypted password vaults.
#[derive(Parser)]
#[command(
    name = "passlock",
    about = "Local encrypted password vaults",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault to operate on (default: `default_vault` from passlock.toml)
    #[arg(short, long, global = true, env = "PASSLOCK_VAULT")]
    pub vault: Option<String>,

    /// Directory holding the vault files
    #[arg(long, global = true, env = "PASSLOCK_VAULT_DIR")]
    pub vault_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Manage vaults (create, list, delete)
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Add a record to the vault
    Add {
        /// Service the credential belongs to (e.g. github.com)
        service: String,
        /// Account username
        username: String,
        /// Secret value (omit for interactive prompt or piped stdin)
        secret: Option<String>,
        /// Optional notes, stored encrypted
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Print a record's secret
    Get {
        /// Record id
        id: i64,
        /// Also print the record's notes
        #[arg(long)]
        notes: bool,
    },

    /// List records
    List {
        /// Only records for this service (exact match)
        #[arg(short, long)]
        service: Option<String>,
        /// Include secrets in the output
        #[arg(long)]
        reveal: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete every record in the vault (the vault itself is kept)
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

/// Vault subcommands.
#[derive(clap::Subcommand)]
pub enum VaultAction {
    /// Create a new vault
    Create {
        /// Vault name
        name: String,
    },

    /// List all vaults
    List,

    /// Permanently delete a vault and all its records
    Delete {
        /// Vault name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Settings and a ready-to-use manager for the configured vault root.
pub struct Context {
    pub settings: Settings,
    pub manager: VaultManager,
}

impl Context {
    /// Load settings, resolve the vault root, and build the manager.
    pub fn load(cli: &Cli) -> Result<Self> {
        let settings = Settings::load(&config::config_dir()?)?;
        let root = config::vault_root(&settings, cli.vault_dir.as_deref())?;
        let store = VaultStore::new(root).with_busy_timeout(settings.busy_timeout());
        let manager = VaultManager::new(store, settings.kdf_params());
        Ok(Self { settings, manager })
    }

    /// The vault selected by `--vault`, falling back to the configured default.
    pub fn vault_name<'a>(&'a self, cli: &'a Cli) -> &'a str {
        cli.vault.as_deref().unwrap_or(&self.settings.default_vault)
    }

    /// Prompt for the master password and authenticate.
    ///
    /// A missing vault and a wrong password produce the same message.
    pub fn open_session(&self, cli: &Cli) -> Result<Session> {
        let name = self.vault_name(cli);
        let password = prompt_password(name)?;
        self.manager
            .authenticate(name, password.as_bytes())
            .map_err(|e| match e {
                PassLockError::VaultNotFound(_) | PassLockError::AuthenticationDenied => {
                    debug!(vault = name, error = %e, "login rejected");
                    PassLockError::CommandFailed(e.public_message())
                }
                other => other,
            })
    }
}

/// Get the master password, trying in order:
/// 1. `PASSLOCK_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(vault: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Master password for '{vault}'"))
        .interact()
        .map_err(|e| PassLockError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `vault create`).
///
/// Also respects `PASSLOCK_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            check_password_len(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| PassLockError::CommandFailed(format!("password prompt: {e}")))?;

        if check_password_len(&password).is_err() {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Ask for a yes/no confirmation, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| PassLockError::CommandFailed(format!("confirm prompt: {e}")))
}

fn check_password_len(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PassLockError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
