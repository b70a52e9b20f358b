//! Cross-environment sync tool
//!
//! Copies documents, collections, user accounts and storage objects between
//! configured environments without overwriting existing targets unless asked.

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::info;

use fivemgolf::{
    config::Settings,
    database::DatabaseService,
    models::{CollectionPath, DocumentPath, Role},
    services::sync::{resolve_environments, SyncOptions, SyncReport, SyncService, UserSelection},
    utils::logging,
};

#[derive(Debug, Parser)]
#[command(name = "fivemgolf-sync", version, about = "Copy data between 5MGOLF environments")]
struct Cli {
    /// Source environment name
    #[arg(long, global = true)]
    from: Option<String>,

    /// Target environment name
    #[arg(long, global = true)]
    to: Option<String>,

    /// Replace existing targets instead of skipping them
    #[arg(long, global = true)]
    overwrite: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Copy a single document
    Document {
        /// Document path, e.g. `quotations/abc123`
        #[arg(long)]
        path: String,
    },
    /// Copy collections including nested subcollections
    Collections(CollectionArgs),
    /// Copy identity accounts and their profiles
    Users(UserArgs),
    /// Copy storage objects
    Storage {
        /// Only objects whose name starts with this prefix
        #[arg(long, default_value = "")]
        prefix: String,
    },
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["collections", "all"])))]
struct CollectionArgs {
    /// Comma separated collection paths
    #[arg(long, value_delimiter = ',')]
    collections: Vec<String>,

    /// Every root collection of the source
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct UserArgs {
    /// Only accounts holding this role
    #[arg(long)]
    role: Option<Role>,

    /// Comma separated email addresses
    #[arg(long, value_delimiter = ',')]
    emails: Vec<String>,

    /// Issue new passwords for accounts written to the target
    #[arg(long)]
    reset_passwords: bool,
}

fn print_report(report: &SyncReport) {
    println!(
        "copied: {}  skipped: {}  failed: {}",
        report.copied, report.skipped, report.failed
    );
    for failure in &report.failures {
        println!("  FAILED {} {}: {}", failure.kind, failure.key, failure.error);
    }
    if !report.issued_passwords.is_empty() {
        println!("Issued passwords:");
        for issued in &report.issued_passwords {
            println!("  {} ({}): {}", issued.email, issued.uid, issued.password);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::new().context("Failed to load configuration")?;
    let _log_guard = logging::init_logging(&settings.logging)?;

    let (Some(from), Some(to)) = (cli.from.as_deref(), cli.to.as_deref()) else {
        bail!("--from and --to are required");
    };
    let (source_env, target_env) = resolve_environments(&settings, from, to)?;

    let reset_passwords = matches!(&cli.command, Command::Users(args) if args.reset_passwords);
    if reset_passwords && !cli.overwrite {
        bail!("--reset-passwords requires --overwrite");
    }

    info!(from, to, overwrite = cli.overwrite, "Connecting to environments");
    let source = DatabaseService::connect(source_env)
        .await
        .with_context(|| format!("Failed to connect to {}", from))?;
    let target = DatabaseService::connect(target_env)
        .await
        .with_context(|| format!("Failed to connect to {}", to))?;

    let sync = SyncService::new(
        source,
        target,
        SyncOptions {
            overwrite: cli.overwrite,
            reset_passwords,
        },
    );

    let report = match cli.command {
        Command::Document { path } => sync.copy_document(&DocumentPath::parse(&path)?).await,
        Command::Collections(args) if args.all => sync.copy_all_collections().await?,
        Command::Collections(args) => {
            let collections = args
                .collections
                .iter()
                .map(|c| CollectionPath::parse(c))
                .collect::<Result<Vec<_>, _>>()?;
            sync.copy_collections(&collections).await
        }
        Command::Users(args) => {
            let selection = UserSelection {
                role: args.role,
                emails: args.emails,
            };
            sync.copy_users(&selection).await?
        }
        Command::Storage { prefix } => sync.copy_storage(&prefix).await?,
    };

    print_report(&report);
    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
