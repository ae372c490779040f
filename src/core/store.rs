//! The trip store: aggregate root over the trip list.
//!
//! All mutations go through this type and are written through to the
//! backing repository. Callers never observe a half-applied change: every
//! operation validates and computes first, then mutates, then saves.

use crate::core::currency::RateCache;
use crate::core::error::TripError;
use crate::core::schedule::derive_schedule;
use crate::core::trip::{
    Activity, Budget, ChecklistItem, Expense, TransportationDetails, Trip, TripDay,
};
use crate::store::TripRepository;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// User input for a new trip; identity and days are assigned by the store.
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub name: String,
    pub destination: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub local_currency: String,
}

pub struct TripStore {
    trips: Vec<Trip>,
    repository: Arc<dyn TripRepository>,
}

impl TripStore {
    /// Opens the store over a repository, loading whatever was saved.
    /// Missing or unreadable state starts as an empty list.
    pub fn open(repository: Arc<dyn TripRepository>) -> Self {
        let trips = repository.load();
        debug!("Loaded {} trip(s)", trips.len());
        TripStore { trips, repository }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, trip_id: Uuid) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == trip_id)
    }

    /// Creates a trip from a draft: assigns identity, derives the initial
    /// day schedule from the date range, appends and persists.
    pub fn add_trip(&mut self, draft: TripDraft) -> Result<&Trip, TripError> {
        let days = derive_schedule(
            draft.start_date,
            draft.end_date,
            Vec::new(),
            &draft.local_currency,
        )?;

        let trip = Trip {
            id: Uuid::new_v4(),
            name: draft.name,
            destination: draft.destination,
            image_url: None,
            start_date: draft.start_date,
            end_date: draft.end_date,
            local_currency: draft.local_currency,
            days,
        };
        info!("Adding trip {} ({})", trip.name, trip.id);
        self.trips.push(trip);
        self.save()?;
        Ok(self.trips.last().expect("just pushed"))
    }

    /// Re-derives the day schedule for a new date range, carrying existing
    /// day content across by index. Days past the new range are dropped.
    /// The trip is untouched when the range is invalid.
    pub fn update_trip_dates(
        &mut self,
        trip_id: Uuid,
        new_start: NaiveDate,
        new_end: NaiveDate,
    ) -> Result<(), TripError> {
        let trip = self.trip_mut(trip_id)?;
        let days = derive_schedule(
            new_start,
            new_end,
            trip.days.clone(),
            &trip.local_currency,
        )?;

        trip.start_date = new_start;
        trip.end_date = new_end;
        trip.days = days;
        self.save()
    }

    /// Removes a trip and everything it owns. Unknown ids are a no-op.
    pub fn delete_trip(&mut self, trip_id: Uuid) -> Result<(), TripError> {
        let before = self.trips.len();
        self.trips.retain(|t| t.id != trip_id);
        if self.trips.len() == before {
            debug!("delete_trip: {} not found, nothing to do", trip_id);
            return Ok(());
        }
        info!("Deleted trip {}", trip_id);
        self.save()
    }

    pub fn add_activity(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        activity: Activity,
    ) -> Result<(), TripError> {
        self.day_mut(trip_id, day_index)?.activities.push(activity);
        self.save()
    }

    /// Replaces the day's transportation record wholesale.
    pub fn update_transportation(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        transportation: TransportationDetails,
    ) -> Result<(), TripError> {
        self.day_mut(trip_id, day_index)?.transportation = transportation;
        self.save()
    }

    /// Replaces the day's budget wholesale.
    pub fn update_budget(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        budget: Budget,
    ) -> Result<(), TripError> {
        self.day_mut(trip_id, day_index)?.budget = budget;
        self.save()
    }

    pub fn update_day_title(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        title: &str,
    ) -> Result<(), TripError> {
        self.day_mut(trip_id, day_index)?.title = title.to_string();
        self.save()
    }

    /// Appends an expense in the day budget's own currency.
    pub fn add_expense(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        expense: Expense,
    ) -> Result<(), TripError> {
        let day = self.day_mut(trip_id, day_index)?;
        day.budget
            .add_expense(expense)
            .map_err(TripError::Ledger)?;
        self.save()
    }

    /// Appends an expense, converting into the budget currency first when
    /// needed. A failed conversion leaves the budget untouched.
    pub async fn add_expense_converted(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        expense: Expense,
        rates: &RateCache,
    ) -> Result<(), TripError> {
        let day = self.day_mut(trip_id, day_index)?;
        day.budget.add_expense_converted(expense, rates).await?;
        self.save()
    }

    /// Removes an expense by identity; unknown ids are a no-op.
    pub fn remove_expense(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        expense_id: Uuid,
    ) -> Result<(), TripError> {
        if self.day_mut(trip_id, day_index)?.budget.remove_expense(expense_id) {
            self.save()?;
        }
        Ok(())
    }

    pub fn add_checklist_item(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        text: &str,
    ) -> Result<(), TripError> {
        self.day_mut(trip_id, day_index)?
            .checklist
            .push(ChecklistItem::new(text));
        self.save()
    }

    /// Flips a checklist item's done state; unknown ids are a no-op.
    pub fn toggle_checklist_item(
        &mut self,
        trip_id: Uuid,
        day_index: usize,
        item_id: Uuid,
    ) -> Result<(), TripError> {
        let day = self.day_mut(trip_id, day_index)?;
        if let Some(item) = day.checklist.iter_mut().find(|i| i.id == item_id) {
            item.is_done = !item.is_done;
            self.save()?;
        }
        Ok(())
    }

    /// Plain field update used by external image search.
    pub fn set_destination_image(&mut self, trip_id: Uuid, url: &str) -> Result<(), TripError> {
        self.trip_mut(trip_id)?.image_url = Some(url.to_string());
        self.save()
    }

    fn trip_mut(&mut self, trip_id: Uuid) -> Result<&mut Trip, TripError> {
        self.trips
            .iter_mut()
            .find(|t| t.id == trip_id)
            .ok_or(TripError::TripNotFound(trip_id))
    }

    fn day_mut(&mut self, trip_id: Uuid, day_index: usize) -> Result<&mut TripDay, TripError> {
        let trip = self.trip_mut(trip_id)?;
        let len = trip.days.len();
        trip.days
            .get_mut(day_index)
            .ok_or(TripError::DayIndexOutOfRange {
                index: day_index,
                len,
            })
    }

    fn save(&self) -> Result<(), TripError> {
        self.repository
            .save(&self.trips)
            .map_err(TripError::Persistence)
    }
}
