use clap::Parser;
use passlock::cli::{Cli, Commands, VaultAction};

fn main() {
    passlock::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Vault { ref action } => match action {
            VaultAction::Create { ref name } => {
                passlock::cli::commands::vault_create::execute(&cli, name)
            }
            VaultAction::List => passlock::cli::commands::vault_list::execute(&cli),
            VaultAction::Delete { ref name, force } => {
                passlock::cli::commands::vault_delete::execute(&cli, name, *force)
            }
        },
        Commands::Add {
            ref service,
            ref username,
            ref secret,
            ref notes,
        } => passlock::cli::commands::add::execute(
            &cli,
            service,
            username,
            secret.as_deref(),
            notes.as_deref(),
        ),
        Commands::Get { id, notes } => passlock::cli::commands::get::execute(&cli, id, notes),
        Commands::List {
            ref service,
            reveal,
            json,
        } => passlock::cli::commands::list::execute(&cli, service.as_deref(), reveal, json),
        Commands::Delete { id, force } => passlock::cli::commands::delete::execute(&cli, id, force),
        Commands::Clear { force } => passlock::cli::commands::clear::execute(&cli, force),
        Commands::Completions { ref shell } => passlock::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passlock::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
