pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::currency::RateCache;
use crate::core::store::{TripDraft, TripStore};
use crate::core::trip::{ActivityCategory, ExpenseCategory};
use crate::providers::exchange_rate::ExchangeRateApiProvider;
use crate::store::disk::FjallRepository;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// The commands the application can run, decoupled from the CLI parser.
pub enum AppCommand {
    List,
    AddTrip {
        name: String,
        destination: Option<String>,
        start: NaiveDate,
        end: NaiveDate,
        currency: Option<String>,
    },
    EditDates {
        trip: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    RemoveTrip {
        trip: String,
    },
    Show {
        trip: String,
    },
    AddActivity {
        trip: String,
        day: usize,
        time: NaiveTime,
        title: String,
        category: ActivityCategory,
        location: String,
        notes: String,
    },
    Budget {
        trip: String,
    },
    SetBudget {
        trip: String,
        day: usize,
        total: Decimal,
        currency: Option<String>,
    },
    AddExpense {
        trip: String,
        day: usize,
        amount: Decimal,
        currency: Option<String>,
        category: ExpenseCategory,
        note: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    let repository = Arc::new(FjallRepository::open(&data_path)?);
    let mut trip_store = TripStore::open(repository);

    let provider = Arc::new(ExchangeRateApiProvider::new(&config.rates.base_url));
    let rates = RateCache::new(provider);

    match command {
        AppCommand::List => {
            cli::trips::list(&trip_store);
            Ok(())
        }
        AppCommand::AddTrip {
            name,
            destination,
            start,
            end,
            currency,
        } => cli::trips::add(
            &mut trip_store,
            TripDraft {
                name,
                destination,
                start_date: start,
                end_date: end,
                local_currency: currency.unwrap_or_else(|| config.currency.clone()),
            },
        ),
        AppCommand::EditDates { trip, start, end } => {
            cli::trips::edit_dates(&mut trip_store, &trip, start, end)
        }
        AppCommand::RemoveTrip { trip } => cli::trips::remove(&mut trip_store, &trip),
        AppCommand::Show { trip } => {
            let trip = cli::trips::find_trip(&trip_store, &trip)?;
            cli::itinerary::show(trip);
            Ok(())
        }
        AppCommand::AddActivity {
            trip,
            day,
            time,
            title,
            category,
            location,
            notes,
        } => cli::itinerary::add_activity(
            &mut trip_store,
            &trip,
            day,
            time,
            &title,
            category,
            &location,
            &notes,
        ),
        AppCommand::Budget { trip } => {
            let trip = cli::trips::find_trip(&trip_store, &trip)?;
            cli::budget::run(trip, &rates).await
        }
        AppCommand::SetBudget {
            trip,
            day,
            total,
            currency,
        } => cli::budget::set(&mut trip_store, &trip, day, total, currency.as_deref()),
        AppCommand::AddExpense {
            trip,
            day,
            amount,
            currency,
            category,
            note,
        } => {
            cli::expense::add(
                &mut trip_store,
                &rates,
                &trip,
                day,
                amount,
                currency.as_deref(),
                category,
                &note,
            )
            .await
        }
    }
}
