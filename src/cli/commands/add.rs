//! `passlock add`: encrypt and store a new record.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PassLockError, Result};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: &str,
    secret: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let ctx = Context::load(cli)?;

    // Determine the secret from one of three sources.
    let secret = if let Some(s) = secret {
        // Source 1: Inline value on the command line.
        output::warning("Secret provided on command line; it may appear in shell history.");
        Zeroizing::new(s.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| PassLockError::CommandFailed(format!("reading stdin: {e}")))?;
        Zeroizing::new(buf.trim_end_matches(&['\r', '\n'][..]).to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let s = dialoguer::Password::new()
            .with_prompt(format!("Secret for {username}@{service}"))
            .interact()
            .map_err(|e| PassLockError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(s)
    };

    let mut session = ctx.open_session(cli)?;
    let entry = session
        .records()
        .add_record(service, username, &secret, notes)?;

    output::success(&format!(
        "Added record {} ({}@{}) to '{}'",
        entry.id,
        entry.username,
        entry.service,
        session.vault_name()
    ));

    Ok(())
}
