//! `passlock clear`: delete every record but keep the vault.

use crate::cli::output;
use crate::cli::{confirm, Cli, Context};
use crate::errors::Result;

/// Execute the `clear` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let name = ctx.vault_name(cli);

    if !force && !confirm(&format!("Delete every record in '{name}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut session = ctx.open_session(cli)?;
    session.records().clear_vault()?;

    output::success(&format!("Cleared vault '{name}'"));

    Ok(())
}
