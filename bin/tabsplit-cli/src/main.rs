mod settings;
mod store;

use anyhow::Context;
use clap::{Parser, Subcommand};
use settings::{OutputFormat, Settings};
use std::path::PathBuf;
use store::LedgerFile;
use tabsplit_core::report::{render_json, render_summary};
use tabsplit_core::{ExpenseId, GroupId, GroupLedger, MemberDirectory, MemberId};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "tabsplit", version, about = "Split shared expenses and settle up")]
struct Cli {
    /// Ledger JSON file
    #[arg(short, long, default_value = "ledger.json")]
    ledger: PathBuf,

    /// Settings file (defaults to ./tabsplit.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format, overriding the settings
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show member balances of a group
    Balances {
        #[arg(short, long)]
        group: String,
    },

    /// Show balances and the payments that settle them
    Settle {
        #[arg(short, long)]
        group: String,
    },

    /// Compute the shares of one expense from its split policy
    Split {
        #[arg(short, long)]
        expense: String,

        /// Equal-split participants (defaults to the whole group)
        #[arg(short, long, value_delimiter = ',')]
        participants: Option<Vec<String>>,

        /// Store the computed shares on the expense and save the ledger
        #[arg(short, long)]
        write: bool,
    },
}

fn init_tracing(verbose: u8, default_level: &str) -> anyhow::Result<()> {
    let level = match verbose {
        0 => default_level
            .parse::<Level>()
            .with_context(|| format!("invalid log level {default_level:?}"))?,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &settings.log_level)?;

    let format = cli.format.unwrap_or(settings.format);
    let mut file = LedgerFile::load(&cli.ledger).await?;
    info!("Using ledger {}", cli.ledger.display());

    match cli.command {
        Command::Balances { group } => {
            let ledger = GroupLedger::new(&file, settings.ledger_config());
            let balances = ledger.balances(&GroupId::from(group)).await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&balances)?),
                OutputFormat::Text => {
                    for balance in &balances {
                        let name = file
                            .roster
                            .display_name(&balance.member_id)
                            .unwrap_or(balance.member_id.as_str());
                        println!("{name}\t{}", balance.amount);
                    }
                }
            }
        }
        Command::Settle { group } => {
            let ledger = GroupLedger::new(&file, settings.ledger_config());
            let summary = ledger.summary(&GroupId::from(group)).await?;

            match format {
                OutputFormat::Json => println!("{}", render_json(&summary)?),
                OutputFormat::Text => print!("{}", render_summary(&summary, &file.roster)),
            }
        }
        Command::Split {
            expense,
            participants,
            write,
        } => {
            let id = ExpenseId::from(expense);
            let participants: Option<Vec<MemberId>> =
                participants.map(|ids| ids.into_iter().map(MemberId::from).collect());

            let shares = file.attach_shares(&id, participants.as_deref())?.shares.clone();
            if write {
                file.save(&cli.ledger).await?;
                info!("Stored {} shares on expense {}", shares.len(), id);
            }

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shares)?),
                OutputFormat::Text => {
                    for share in &shares {
                        let paid = if share.paid { "paid" } else { "unpaid" };
                        println!("{}\t{}\t{paid}", share.member_id, share.amount);
                    }
                }
            }
        }
    }

    Ok(())
}
