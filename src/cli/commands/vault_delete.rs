//! `passlock vault delete`: permanently delete a vault.

use crate::cli::output;
use crate::cli::{confirm, Cli, Context};
use crate::errors::Result;

/// Execute `passlock vault delete <name>`.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;

    if !force && !confirm(&format!(
        "Delete vault '{name}' and all its records? This cannot be undone"
    ))? {
        output::info("Cancelled.");
        return Ok(());
    }

    ctx.manager.delete_vault(name)?;
    output::success(&format!("Deleted vault '{name}'"));

    Ok(())
}
