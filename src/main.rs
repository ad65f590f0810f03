//! familyhub - module registry and integration sync for the FamilyHub portal
//!
//! Operator commands for inspecting module availability and linking or
//! copying standalone modules into the host portal.

use clap::Parser;

use familyhub::cli::{Cli, Commands};
use familyhub::{commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run(cli.root, args),
        Commands::Unsync(args) => commands::unsync::run(cli.root, args),
        Commands::Status(args) => commands::status::run(cli.root, args),
        Commands::Info(args) => commands::info::run(cli.root, args),
        Commands::Routes(args) => commands::routes::run(cli.root, args),
        Commands::Context(args) => commands::context::run(cli.root, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
