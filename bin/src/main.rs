//! barvault CLI - local minute-bar archive with provider backfill.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

use display::{CalendarKind, Format};

#[derive(Parser)]
#[command(name = "barvault")]
#[command(about = "Local minute-bar archive with provider backfill", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Archive root directory. Defaults to the platform data directory.
    #[arg(long, global = true, env = "BARVAULT_ARCHIVE")]
    archive: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no summaries)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve bars from the archive, backfilling gaps from a source
    Bars {
        /// Symbols to serve (e.g., AAPL MSFT)
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Range start, inclusive (RFC 3339 or YYYY-MM-DD, UTC)
        #[arg(short, long)]
        start: String,

        /// Range end, exclusive (RFC 3339 or YYYY-MM-DD, UTC)
        #[arg(short, long)]
        end: String,

        /// Bar timeframe (see `barvault timeframes`)
        #[arg(short, long, default_value = "1min")]
        timeframe: String,

        /// Directory of <SYMBOL>.csv exports used to fill gaps
        #[arg(long)]
        source: Option<PathBuf>,

        /// Trading calendar deciding which minutes are expected
        #[arg(short, long, value_enum, default_value = "nyse")]
        calendar: CalendarKind,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file path. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum concurrent source fetches
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Report calendar minutes missing from the archive
    Gaps {
        /// Symbols to check
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Range start, inclusive (RFC 3339 or YYYY-MM-DD, UTC)
        #[arg(short, long)]
        start: String,

        /// Range end, exclusive (RFC 3339 or YYYY-MM-DD, UTC)
        #[arg(short, long)]
        end: String,

        /// Trading calendar deciding which minutes are expected
        #[arg(short, long, value_enum, default_value = "nyse")]
        calendar: CalendarKind,

        /// List every missing minute instead of a summary
        #[arg(long)]
        list: bool,
    },

    /// Write a CSV file of 1-minute bars into the archive
    Import {
        /// CSV file with timestamp,open,high,low,close,volume columns
        file: PathBuf,

        /// Symbol the bars belong to
        #[arg(long)]
        symbol: String,
    },

    /// List accepted timeframe specifiers
    Timeframes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    display::init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let archive = display::archive_config(cli.archive);

    match command {
        Commands::Bars {
            symbols,
            start,
            end,
            timeframe,
            source,
            calendar,
            format,
            output,
            concurrency,
        } => {
            commands::bars::bars(
                &archive,
                &symbols,
                &start,
                &end,
                &timeframe,
                source,
                calendar,
                format,
                output,
                concurrency,
                cli.quiet,
            )
            .await
        }
        Commands::Gaps {
            symbols,
            start,
            end,
            calendar,
            list,
        } => commands::gaps::gaps(&archive, &symbols, &start, &end, calendar, list),
        Commands::Import { file, symbol } => {
            commands::import::import(&archive, &file, &symbol, cli.quiet).await
        }
        Commands::Timeframes => {
            commands::timeframes::list_timeframes();
            Ok(())
        }
    }
}
