use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use chrono::Local;
use hrm::cli::RangeOptions;
use hrm::cli::table::default_bounds;
use hrm::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RangeArgs {
    /// First day of the range (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    from: Option<String>,

    /// Last day of the range, inclusive (defaults to --from, or a week
    /// from today when --from is omitted)
    #[arg(long)]
    to: Option<String>,

    /// Room type to price
    #[arg(short, long, default_value = "standard")]
    room_type: String,

    /// Use the local tariff tables instead of the prediction service
    #[arg(long)]
    offline: bool,

    /// Fill days without a prediction from the local tariff tables
    #[arg(long)]
    fill_missing: bool,
}

impl From<RangeArgs> for RangeOptions {
    fn from(args: RangeArgs) -> Self {
        let (from, to) = default_bounds(args.from, args.to, Local::now().date_naive());
        RangeOptions {
            from,
            to,
            room_type: args.room_type,
            offline: args.offline,
            fill_missing: args.fill_missing,
        }
    }
}

impl From<Commands> for hrm::AppCommand {
    fn from(cmd: Commands) -> hrm::AppCommand {
        match cmd {
            Commands::Table(args) => hrm::AppCommand::Table(args.into()),
            Commands::Chart(args) => hrm::AppCommand::Chart(args.into()),
            Commands::Explain { date, room_type } => hrm::AppCommand::Explain { date, room_type },
            Commands::Dashboard => hrm::AppCommand::Dashboard,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display current and predicted prices per day
    Table(RangeArgs),
    /// Display current and predicted prices as a bar chart
    Chart(RangeArgs),
    /// Explain the tariff tier applied to a day
    Explain {
        /// Day to explain (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Room type to price
        #[arg(short, long, default_value = "standard")]
        room_type: String,
    },
    /// Display revenue, occupancy and demand summary
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => hrm::cli::setup::setup(),
        Some(cmd) => hrm::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
