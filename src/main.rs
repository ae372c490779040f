use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use wayplan::core::log::init_logging;
use wayplan::core::trip::{ActivityCategory, ExpenseCategory};

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List all trips
    List,
    /// Add a new trip
    Add {
        /// Trip name
        name: String,
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the trip, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        /// Where the trip goes
        #[arg(long)]
        destination: Option<String>,
        /// Local currency for the trip (defaults to the configured one)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Change a trip's date range, reconciling its day schedule
    Edit {
        /// Trip name or id prefix
        trip: String,
        /// New first day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// New last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
    /// Remove a trip and everything it contains
    Remove {
        /// Trip name or id prefix
        trip: String,
    },
    /// Display the day-by-day itinerary of a trip
    Show {
        /// Trip name or id prefix
        trip: String,
    },
    /// Plan an activity on a trip day
    Activity {
        /// Trip name or id prefix
        trip: String,
        /// Day number, starting at 1
        #[arg(long)]
        day: usize,
        /// Time of day (HH:MM)
        #[arg(long)]
        time: NaiveTime,
        /// What is planned
        #[arg(long)]
        title: String,
        /// Activity category (sightseeing, dining, shopping,
        /// entertainment, transportation, accommodation, other)
        #[arg(long, default_value = "other")]
        category: ActivityCategory,
        /// Where it happens
        #[arg(long, default_value = "")]
        location: String,
        /// Free-text notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Display a trip's budget summary in its local currency
    Budget {
        /// Trip name or id prefix
        trip: String,
    },
    /// Set the budget for a trip day
    SetBudget {
        /// Trip name or id prefix
        trip: String,
        /// Day number, starting at 1
        #[arg(long)]
        day: usize,
        /// Budget total for the day
        #[arg(long)]
        total: Decimal,
        /// Budget currency (defaults to the day's current one)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Record an expense against a trip day
    Expense {
        /// Trip name or id prefix
        trip: String,
        /// Day number, starting at 1
        #[arg(long)]
        day: usize,
        /// Amount spent
        #[arg(long)]
        amount: Decimal,
        /// Currency of the amount (defaults to the trip's local currency)
        #[arg(long)]
        currency: Option<String>,
        /// Expense category (food, transportation, accommodation,
        /// activities, shopping, other)
        #[arg(long, default_value = "other")]
        category: ExpenseCategory,
        /// Free-text note
        #[arg(long, default_value = "")]
        note: String,
    },
}

impl From<Commands> for wayplan::AppCommand {
    fn from(cmd: Commands) -> wayplan::AppCommand {
        match cmd {
            Commands::List => wayplan::AppCommand::List,
            Commands::Add {
                name,
                start,
                end,
                destination,
                currency,
            } => wayplan::AppCommand::AddTrip {
                name,
                destination,
                start,
                end,
                currency,
            },
            Commands::Edit { trip, start, end } => {
                wayplan::AppCommand::EditDates { trip, start, end }
            }
            Commands::Remove { trip } => wayplan::AppCommand::RemoveTrip { trip },
            Commands::Show { trip } => wayplan::AppCommand::Show { trip },
            Commands::Activity {
                trip,
                day,
                time,
                title,
                category,
                location,
                notes,
            } => wayplan::AppCommand::AddActivity {
                trip,
                day,
                time,
                title,
                category,
                location,
                notes,
            },
            Commands::Budget { trip } => wayplan::AppCommand::Budget { trip },
            Commands::SetBudget {
                trip,
                day,
                total,
                currency,
            } => wayplan::AppCommand::SetBudget {
                trip,
                day,
                total,
                currency,
            },
            Commands::Expense {
                trip,
                day,
                amount,
                currency,
                category,
                note,
            } => wayplan::AppCommand::AddExpense {
                trip,
                day,
                amount,
                currency,
                category,
                note,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => wayplan::cli::setup::setup(),
        Some(cmd) => wayplan::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
