use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

mod commands;

/// modforge - assemble projects from composable feature plugins
#[derive(Parser)]
#[command(name = "modforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logging (overridden by MODFORGE_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new modforge project
    Init {
        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Target framework (e.g., nextjs, nuxt)
        #[arg(short, long)]
        target: Option<String>,

        /// Write modforge.json instead of modforge.toml
        #[arg(long)]
        json: bool,
    },

    /// Add a plugin to the project
    Add {
        /// Plugin name (e.g., auth-clerk)
        plugin: String,

        /// Plugin option as key=value (repeatable)
        #[arg(short, long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,

        /// Fail instead of installing missing dependencies
        #[arg(long)]
        strict: bool,

        /// Show what would be installed without changing the project
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a plugin from the project
    Remove {
        /// Plugin name
        plugin: String,

        /// Check whether the plugin can be removed without changing the project
        #[arg(long)]
        dry_run: bool,
    },

    /// List installed plugins
    List,

    /// Explain why a plugin is installed and what it requires
    Why {
        /// Plugin name
        plugin: String,
    },

    /// Browse the plugin catalog
    Catalog {
        /// Only show one category (e.g., auth)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show integrations that apply to the project
    Integrations {
        /// Only show integrations involving this plugin
        plugin: Option<String>,
    },

    /// Check the project configuration for problems
    Check,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., resolver.conflict_policy)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MODFORGE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { name, target, json } => commands::init::run(name, target, json),
        Commands::Add {
            plugin,
            options,
            strict,
            dry_run,
        } => commands::add::run(plugin, options, strict, dry_run),
        Commands::Remove { plugin, dry_run } => commands::remove::run(plugin, dry_run),
        Commands::List => commands::list::run(),
        Commands::Why { plugin } => commands::why::run(plugin),
        Commands::Catalog { category } => commands::catalog::run(category),
        Commands::Integrations { plugin } => commands::integrations::run(plugin),
        Commands::Check => commands::check::run(),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_show(),
            ConfigAction::Set { key, value } => commands::config::run_set(&key, &value),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "modforge", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
