use clap::Parser;
use securepass::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Start the security log early so every command is recorded.
    securepass::cli::init_logging(&cli);

    let result = match cli.command {
        Commands::Init => securepass::cli::commands::init::execute(&cli),
        Commands::Add {
            ref website,
            ref username,
            ref password,
            generate,
        } => securepass::cli::commands::add::execute(
            &cli,
            website,
            username.as_deref(),
            password.as_deref(),
            generate,
        ),
        Commands::View { ref website, copy } => {
            securepass::cli::commands::view::execute(&cli, website, copy)
        }
        Commands::List { ref filter } => {
            securepass::cli::commands::list::execute(&cli, filter.as_deref())
        }
        Commands::Delete { ref website, force } => {
            securepass::cli::commands::delete::execute(&cli, website, force)
        }
        Commands::Generate { length, copy } => {
            securepass::cli::commands::generate::execute(&cli, length, copy)
        }
        Commands::Reset { force } => securepass::cli::commands::reset::execute(&cli, force),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        securepass::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
