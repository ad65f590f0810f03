//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ROOT_ENV;
use crate::syncer::Mechanism;

/// FamilyHub - module registry and integration sync
///
/// Inspect and materialize the optional FamilyHub modules.
#[derive(Parser, Debug)]
#[command(
    name = "familyhub",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Module registry and integration sync for the FamilyHub portal",
    long_about = "familyhub reports which optional FamilyHub modules are implemented, \
                  integrated or stubbed, links or copies standalone modules into the host \
                  portal, and shows the module list, routes and template flags the portal \
                  composes at startup.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  familyhub status\n    \
                  familyhub sync timesheet --method copy\n    \
                  familyhub sync all --dry-run\n    \
                  familyhub unsync timesheet\n    \
                  familyhub routes --json\n    \
                  familyhub context"
)]
pub struct Cli {
    /// Project root holding the host portal and standalone modules (defaults to current directory)
    #[arg(long, short = 'r', global = true, env = ROOT_ENV)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Link or copy standalone modules into the host portal
    Sync(SyncArgs),

    /// Remove integrated modules from the host portal
    Unsync(UnsyncArgs),

    /// Show module availability
    Status(StatusArgs),

    /// Show details for one module
    Info(InfoArgs),

    /// Show the composed module list and routes
    Routes(RoutesArgs),

    /// Show the detected deployment context and template flags
    Context(ContextArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Symlink one module:\n    familyhub sync timesheet\n\n\
                  Copy one module (no privileges needed on Windows):\n    familyhub sync timesheet --method copy\n\n\
                  Sync every module with a standalone source:\n    familyhub sync all\n\n\
                  Show what would happen:\n    familyhub sync all --dry-run\n\n\
                  Overwrite a target not created by a previous sync:\n    familyhub sync timesheet --force")]
pub struct SyncArgs {
    /// Module key, or "all"
    pub module: String,

    /// How to materialize the module
    #[arg(long, short = 'm', value_enum, default_value_t = Mechanism::Symlink)]
    pub method: Mechanism,

    /// Overwrite integration targets that no previous sync created
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Report intended actions without touching the filesystem
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

/// Arguments for the unsync command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove one integrated module:\n    familyhub unsync timesheet\n\n\
                  Remove every synced module:\n    familyhub unsync all\n\n\
                  Remove a target not created by a previous sync:\n    familyhub unsync timesheet --force")]
pub struct UnsyncArgs {
    /// Module key, or "all"
    pub module: String,

    /// Remove integration targets that no previous sync created
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Report intended actions without touching the filesystem
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show all modules:\n    familyhub status\n\n\
                  Show one module:\n    familyhub status timesheet\n\n\
                  Include paths and drift checks:\n    familyhub status --detailed")]
pub struct StatusArgs {
    /// Module key (defaults to all modules)
    pub module: Option<String>,

    /// Show paths, ledger records and drift of copied modules
    #[arg(long, short = 'd')]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show module details:\n    familyhub info timesheet")]
pub struct InfoArgs {
    /// Module key
    pub module: String,
}

/// Arguments for the routes command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show installed modules and routes:\n    familyhub routes\n\n\
                  Machine-readable output:\n    familyhub routes --json")]
pub struct RoutesArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the context command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show the deployment context:\n    familyhub context\n\n\
                  Force standalone mode:\n    FAMILYHUB_IS_STANDALONE=true familyhub context\n\n\
                  Template flags as JSON:\n    familyhub context --json")]
pub struct ContextArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    familyhub completions --shell bash > ~/.bash_completion.d/familyhub\n\n\
                  Generate zsh completions:\n    familyhub completions --shell zsh > ~/.zfunc/_familyhub\n\n\
                  Generate fish completions:\n    familyhub completions --shell fish > ~/.config/fish/completions/familyhub.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
