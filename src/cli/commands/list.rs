//! `passlock list`: display records in a table or as JSON.

use serde_json::json;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PassLockError, Result};

/// Execute the `list` command.
pub fn execute(cli: &Cli, service: Option<&str>, reveal: bool, as_json: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut session = ctx.open_session(cli)?;

    let records = session.records();
    let entries = match service {
        Some(s) => records.list_by_service(s)?,
        None => records.list_all()?,
    };

    if as_json {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                let mut item = json!({
                    "id": e.id,
                    "service": e.service,
                    "username": e.username,
                    "created_at": e.created_at.to_rfc3339(),
                });
                if reveal {
                    item["secret"] = json!(e.secret.as_str());
                    item["notes"] = json!(e.notes.as_ref().map(|n| n.as_str()));
                }
                item
            })
            .collect();
        let out = serde_json::to_string_pretty(&items)
            .map_err(|e| PassLockError::CommandFailed(format!("JSON output: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    output::info(&format!(
        "'{}' vault: {} record(s)",
        session.vault_name(),
        entries.len()
    ));
    output::print_entries_table(&entries, reveal);

    Ok(())
}
