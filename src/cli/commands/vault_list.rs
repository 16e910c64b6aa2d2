//! `passlock vault list`: list all vaults.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute `passlock vault list`.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let vaults = ctx.manager.list_vaults()?;

    if vaults.is_empty() {
        output::info("No vaults found.");
        output::tip("Run `passlock vault create <NAME>` to create your first vault.");
        return Ok(());
    }

    let selected = ctx.vault_name(cli);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vault", "Selected"]);

    for name in &vaults {
        let marker = if name == selected {
            style("*").green().bold().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![name.clone(), marker]);
    }

    output::info(&format!(
        "{} vault(s) in {}:",
        vaults.len(),
        ctx.manager.store().root().display()
    ));
    println!("{table}");

    Ok(())
}
