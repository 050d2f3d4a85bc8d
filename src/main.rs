use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => taskboard::tui::run(cli.config.clone(), cli.api_url.as_deref()),
        Some(_) => handlers::dispatch(cli),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
