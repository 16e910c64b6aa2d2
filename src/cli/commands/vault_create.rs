//! `passlock vault create`: create a new password-protected vault.

use crate::cli::output;
use crate::cli::{prompt_new_password, Cli, Context};
use crate::errors::{PassLockError, Result};

/// Execute `passlock vault create <name>`.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let ctx = Context::load(cli)?;

    // Check before prompting so the user doesn't type a password for nothing.
    if ctx.manager.store().exists(name)? {
        output::tip("Use `passlock vault list` to see existing vaults.");
        return Err(PassLockError::VaultAlreadyExists(name.to_string()));
    }

    let password = prompt_new_password()?;
    ctx.manager.create_vault(name, password.as_bytes())?;

    output::success(&format!(
        "Vault '{name}' created at {}",
        ctx.manager.store().vault_path(name).display()
    ));
    output::tip(&format!(
        "Run `passlock --vault {name} add <SERVICE> <USERNAME>` to add a record."
    ));

    Ok(())
}
