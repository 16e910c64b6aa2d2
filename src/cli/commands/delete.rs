//! `passlock delete`: remove a record from the vault.

use crate::cli::output;
use crate::cli::{confirm, Cli, Context};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete record {id}?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut session = ctx.open_session(cli)?;
    session.records().delete_record(id)?;

    output::success(&format!("Deleted record {id}"));

    Ok(())
}
