//! Tutero CLI
//!
//! Fills Tutero sign-up and log-in popups in the frontmost application with
//! generated test accounts.
//!
//! Usage:
//!   tutero manage set-name zac      # Name used at the start of every account
//!   tutero sign-up student          # Mint a new student account and fill the form
//!   tutero log-in student           # Log in with the last student account
//!   tutero log-in teacher --email x # Log in with a specific stored email
//!   tutero last-email teacher       # Copy the last teacher email to the clipboard
//!   tutero accounts                 # List every generated account
//!   tutero manage show              # Show stored preferences
//!   tutero manage clear             # Erase everything

mod console;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tutero::{AccountStore, Autofill, Command, Config, EpochScope, JsonFileStore, Role};

#[derive(Parser)]
#[command(name = "tutero")]
#[command(version, about = "Autofill Tutero sign-up and log-in popups with test accounts")]
struct Cli {
    /// JSON file holding the stored accounts (defaults to the user config directory)
    #[arg(long, global = true, env = "TUTERO_STORE")]
    store: Option<PathBuf>,

    /// Password typed into every form
    #[arg(long, global = true, env = "TUTERO_PASSWORD", default_value = tutero::config::DEFAULT_PASSWORD)]
    password: String,

    /// Domain of generated email addresses
    #[arg(
        long,
        global = true,
        env = "TUTERO_EMAIL_DOMAIN",
        default_value = tutero::config::DEFAULT_EMAIL_DOMAIN,
        value_parser = tutero::config::validate_email_domain
    )]
    email_domain: String,

    /// Whether the daily counter reset is shared by all roles or kept per role
    #[arg(long, global = true, env = "TUTERO_EPOCH_SCOPE", default_value = "global")]
    epoch_scope: EpochScope,

    /// Pause after every pasted field or key press, in milliseconds
    #[arg(long, global = true, env = "TUTERO_KEY_DELAY_MS", default_value_t = tutero::config::DEFAULT_KEY_DELAY_MS)]
    key_delay_ms: u64,

    /// Verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[clap(rename_all = "lower")]
enum RoleArg {
    Teacher,
    Student,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Student => Role::Student,
        }
    }
}

#[derive(Subcommand)]
enum ManageCommands {
    /// Show stored preferences (account lists excluded)
    Show,
    /// Set the name used at the start of your accounts (letters only)
    SetName { name: String },
    /// Erase every stored value
    Clear,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new account and fill the sign-up popup
    SignUp { role: RoleArg },
    /// Fill the log-in popup with the last account, or a given email
    LogIn {
        role: RoleArg,
        /// Log in with this stored email instead of the last one
        #[arg(long, short)]
        email: Option<String>,
    },
    /// List every generated account
    Accounts,
    /// Copy the last generated email for a role to the clipboard
    LastEmail { role: RoleArg },
    /// Edit the name, view stored values or clear everything
    #[command(subcommand)]
    Manage(ManageCommands),
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::SignUp { role } => Command::SignUp(role.into()),
            Commands::LogIn { role, email } => Command::LogIn {
                role: role.into(),
                email,
            },
            Commands::Accounts => Command::ListAccounts,
            Commands::LastEmail { role } => Command::CopyLastEmail(role.into()),
            Commands::Manage(ManageCommands::Show) => Command::ShowPreferences,
            Commands::Manage(ManageCommands::SetName { name }) => Command::SetName(name),
            Commands::Manage(ManageCommands::Clear) => Command::ClearAll,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        Level::DEBUG
    } else {
        std::env::var("LOG_LEVEL")
            .map(|level| match level.to_lowercase().as_str() {
                "error" => Level::ERROR,
                "info" => Level::INFO,
                "debug" => Level::DEBUG,
                _ => Level::WARN,
            })
            .unwrap_or(Level::WARN)
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `manage clear` overwrites the file without parsing it, so it also recovers
/// a store that no longer reads.
fn open_store(command: &Commands, path: &Path) -> Result<JsonFileStore> {
    let store = match command {
        Commands::Manage(ManageCommands::Clear) => JsonFileStore::reset(path),
        _ => JsonFileStore::open(path),
    };
    store.with_context(|| format!("Failed to open store at {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config {
        store_path: cli.store,
        password: cli.password,
        email_domain: cli.email_domain,
        epoch_scope: cli.epoch_scope,
        key_delay_ms: cli.key_delay_ms,
    };

    let store_path = config.resolved_store_path()?;
    tracing::debug!("using store at {}", store_path.display());
    let store = open_store(&cli.command, &store_path)?;
    let engine = tutero::create_engine()?;

    let mut autofill = Autofill::new(
        AccountStore::new(store),
        engine,
        Arc::new(console::ConsoleNotifier),
        config,
    );

    if !autofill.execute(&cli.command.into()).await {
        std::process::exit(1);
    }
    Ok(())
}
