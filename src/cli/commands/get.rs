//! `passlock get`: decrypt and print a single record's secret.

use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, id: i64, show_notes: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut session = ctx.open_session(cli)?;

    let entry = session.records().get_record(id)?;

    // The secret goes to stdout alone so it can be piped.
    println!("{}", entry.secret.as_str());
    if show_notes {
        if let Some(notes) = &entry.notes {
            eprintln!("{}", notes.as_str());
        }
    }

    Ok(())
}
