//! Core business logic: trip model, schedule derivation, budget ledger
//! and currency conversion.

pub mod config;
pub mod currency;
pub mod error;
pub mod ledger;
pub mod log;
pub mod schedule;
pub mod store;
pub mod trip;

// Re-export main types for cleaner imports
pub use currency::{RateCache, RateProvider};
pub use error::{ConversionError, LedgerError, ScheduleError, TripError};
pub use schedule::derive_schedule;
pub use store::{TripDraft, TripStore};
pub use trip::{Activity, ActivityCategory, Budget, Expense, ExpenseCategory, Trip, TripDay};
