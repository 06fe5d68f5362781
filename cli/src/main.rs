use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use draftsweep::config::{load_config_or_default, validate_config, Config, PersistPolicy};
use draftsweep::ledger::{LedgerStore, ProcessedLedger};
use draftsweep::{init_logging, scan_and_draft, ImapTransport, LogFormat};

#[derive(Parser)]
#[clap(version, about, long_about = None)]
#[clap(name = "draftsweep")]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Path to the JSON config file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ledger file location
    #[clap(long, global = true)]
    state_file: Option<PathBuf>,

    /// Log output format: text or json
    #[clap(long, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the folder and draft replies (default)
    Scan(ScanArgs),

    /// Inspect or clear the processed-message ledger
    #[clap(subcommand)]
    Ledger(LedgerCommands),
}

#[derive(Args, Default)]
struct ScanArgs {
    /// Mailbox holding the folder; omit to scan the default inbox
    #[clap(long)]
    mailbox: Option<String>,

    /// Folder name inside the mailbox
    #[clap(long)]
    folder: Option<String>,

    /// Only consider messages received within this many days
    #[clap(long, conflicts_with = "all_time")]
    days: Option<u32>,

    /// Do not restrict by receipt time
    #[clap(long)]
    all_time: bool,

    /// Consider read messages as well
    #[clap(long)]
    include_read: bool,

    /// Body pattern (regular expression), repeatable. Replaces the configured set.
    #[clap(long = "pattern")]
    patterns: Vec<String>,

    /// When to write the ledger back to disk
    #[clap(long, value_enum)]
    persist: Option<PersistArg>,
}

#[derive(Subcommand)]
enum LedgerCommands {
    /// Print handled message counts per store
    Show,

    /// Forget every handled message
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum PersistArg {
    PerItem,
    EndOfRun,
}

impl From<PersistArg> for PersistPolicy {
    fn from(arg: PersistArg) -> Self {
        match arg {
            PersistArg::PerItem => PersistPolicy::PerItem,
            PersistArg::EndOfRun => PersistPolicy::EndOfRun,
        }
    }
}

impl ScanArgs {
    fn apply(self, config: &mut Config) {
        if let Some(mailbox) = self.mailbox {
            config.scan.mailbox = Some(mailbox);
        }
        if let Some(folder) = self.folder {
            config.scan.folder = folder;
        }
        if self.all_time {
            config.scan.lookback_days = None;
        } else if let Some(days) = self.days {
            config.scan.lookback_days = Some(days);
        }
        if self.include_read {
            config.scan.unread_only = false;
        }
        if !self.patterns.is_empty() {
            config.scan.patterns = self.patterns;
        }
        if let Some(persist) = self.persist {
            config.ledger.persist = persist.into();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    init_logging(cli.log_format, level)?;

    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(state_file) = cli.state_file {
        config.ledger.state_file = state_file;
    }

    match cli.command.unwrap_or(Commands::Scan(ScanArgs::default())) {
        Commands::Scan(args) => {
            args.apply(&mut config);
            validate_config(&config)?;

            let imap = config
                .imap
                .clone()
                .ok_or("No IMAP account configured; add an \"imap\" section to the config file")?;
            let mut transport = ImapTransport::new(imap);

            let drafted = scan_and_draft(&config, &mut transport).await?;
            println!("Drafted replies: {}", drafted);
        }
        Commands::Ledger(LedgerCommands::Show) => {
            let store = LedgerStore::new(&config.ledger.state_file);
            let ledger = store.load()?;

            println!("Ledger: {}", store.path().display());
            for (store_id, count) in ledger.stores() {
                println!("  {}: {}", store_id, count);
            }
            println!("Handled messages: {}", ledger.len());
        }
        Commands::Ledger(LedgerCommands::Reset) => {
            let store = LedgerStore::new(&config.ledger.state_file);
            // An unreadable ledger is replaced rather than blocking the reset
            let mut ledger = store.load().unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable ledger: {}", e);
                ProcessedLedger::new()
            });
            let cleared = ledger.len();
            ledger.reset();
            store.save(&ledger)?;
            tracing::info!("Ledger reset at {}", store.path().display());
            println!("Ledger cleared ({} handled messages forgotten)", cleared);
        }
    }

    Ok(())
}
