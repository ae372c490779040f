//! Trip data model: trips, days, activities, transportation and budgets.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Sightseeing,
    Dining,
    Shopping,
    Entertainment,
    Transportation,
    Accommodation,
    Other,
}

impl Display for ActivityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ActivityCategory::Sightseeing => "sightseeing",
                ActivityCategory::Dining => "dining",
                ActivityCategory::Shopping => "shopping",
                ActivityCategory::Entertainment => "entertainment",
                ActivityCategory::Transportation => "transportation",
                ActivityCategory::Accommodation => "accommodation",
                ActivityCategory::Other => "other",
            }
        )
    }
}

impl FromStr for ActivityCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sightseeing" => Ok(ActivityCategory::Sightseeing),
            "dining" => Ok(ActivityCategory::Dining),
            "shopping" => Ok(ActivityCategory::Shopping),
            "entertainment" => Ok(ActivityCategory::Entertainment),
            "transportation" => Ok(ActivityCategory::Transportation),
            "accommodation" => Ok(ActivityCategory::Accommodation),
            "other" => Ok(ActivityCategory::Other),
            _ => Err(anyhow::anyhow!("Invalid activity category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Accommodation,
    Activities,
    Shopping,
    Other,
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExpenseCategory::Food => "food",
                ExpenseCategory::Transportation => "transportation",
                ExpenseCategory::Accommodation => "accommodation",
                ExpenseCategory::Activities => "activities",
                ExpenseCategory::Shopping => "shopping",
                ExpenseCategory::Other => "other",
            }
        )
    }
}

impl FromStr for ExpenseCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(ExpenseCategory::Food),
            "transportation" => Ok(ExpenseCategory::Transportation),
            "accommodation" => Ok(ExpenseCategory::Accommodation),
            "activities" => Ok(ExpenseCategory::Activities),
            "shopping" => Ok(ExpenseCategory::Shopping),
            "other" => Ok(ExpenseCategory::Other),
            _ => Err(anyhow::anyhow!("Invalid expense category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub time: NaiveDateTime,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    pub category: ActivityCategory,
}

impl Activity {
    pub fn new(time: NaiveDateTime, title: &str, category: ActivityCategory) -> Self {
        Activity {
            id: Uuid::new_v4(),
            time,
            title: title.to_string(),
            location: String::new(),
            notes: String::new(),
            category,
        }
    }

    /// An activity needs a non-empty title to be shown on the itinerary.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Single transportation record per day, replaced wholesale on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportationDetails {
    pub mode: String,
    pub time: NaiveDateTime,
}

impl TransportationDetails {
    pub fn for_date(date: NaiveDate) -> Self {
        TransportationDetails {
            mode: String::new(),
            time: date.and_time(NaiveTime::MIN),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub note: String,
    /// Amount in the owning budget's currency. Populated only when the
    /// expense currency differs from the budget currency.
    pub converted_amount: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(amount: Decimal, currency: &str, category: ExpenseCategory, note: &str) -> Self {
        Expense {
            id: Uuid::new_v4(),
            amount,
            currency: currency.to_string(),
            category,
            note: note.to_string(),
            converted_amount: None,
            date: Some(Utc::now()),
        }
    }

    /// The amount this expense counts toward budget totals: the converted
    /// amount for a foreign-currency expense, the raw amount otherwise.
    /// A foreign expense still awaiting conversion contributes nothing.
    pub fn contribution(&self, budget_currency: &str) -> Option<Decimal> {
        if self.currency == budget_currency {
            Some(self.amount)
        } else {
            self.converted_amount
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub total: Decimal,
    pub currency: String,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Budget {
    pub fn new(total: Decimal, currency: &str) -> Self {
        Budget {
            total,
            currency: currency.to_string(),
            expenses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub is_done: bool,
}

impl ChecklistItem {
    pub fn new(text: &str) -> Self {
        ChecklistItem {
            id: Uuid::new_v4(),
            text: text.to_string(),
            is_done: false,
        }
    }
}

/// One calendar day of a trip's itinerary. Days only exist through their
/// trip; their dates are rewritten whenever the trip range changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDay {
    pub id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    pub transportation: TransportationDetails,
    pub budget: Budget,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

impl TripDay {
    /// A fresh, empty day at `index` within a schedule, dated `date`.
    pub fn empty(date: NaiveDate, index: usize, currency: &str) -> Self {
        TripDay {
            id: Uuid::new_v4(),
            date,
            title: format!("Day {}", index + 1),
            activities: Vec::new(),
            transportation: TransportationDetails::for_date(date),
            budget: Budget::new(Decimal::ZERO, currency),
            checklist: Vec::new(),
        }
    }

    /// Activities ordered for display. Insertion order is preserved in
    /// `activities`; presentation sorts on time of day.
    pub fn sorted_activities(&self) -> Vec<&Activity> {
        let mut sorted: Vec<&Activity> = self.activities.iter().collect();
        sorted.sort_by_key(|a| a.time);
        sorted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub local_currency: String,
    #[serde(default)]
    pub days: Vec<TripDay>,
}

impl Trip {
    /// Inclusive day count of the trip's range. A single-day trip has one.
    pub fn number_of_days(&self) -> usize {
        (self.end_date - self.start_date).num_days() as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_number_of_days_is_inclusive() {
        let trip = Trip {
            id: Uuid::new_v4(),
            name: "Rome".to_string(),
            destination: None,
            image_url: None,
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 3),
            local_currency: "EUR".to_string(),
            days: Vec::new(),
        };
        assert_eq!(trip.number_of_days(), 3);

        let single_day = Trip {
            end_date: date(2024, 6, 1),
            ..trip
        };
        assert_eq!(single_day.number_of_days(), 1);
    }

    #[test]
    fn test_contribution_uses_converted_amount_for_foreign_currency() {
        let mut expense = Expense::new(dec!(100), "USD", ExpenseCategory::Food, "lunch");
        assert_eq!(expense.contribution("USD"), Some(dec!(100)));

        // Foreign currency without a conversion contributes nothing.
        assert_eq!(expense.contribution("EUR"), None);

        expense.converted_amount = Some(dec!(92.00));
        assert_eq!(expense.contribution("EUR"), Some(dec!(92.00)));
    }

    #[test]
    fn test_activity_requires_title() {
        let time = date(2024, 6, 1).and_time(NaiveTime::MIN);
        assert!(Activity::new(time, "Colosseum", ActivityCategory::Sightseeing).is_valid());
        assert!(!Activity::new(time, "  ", ActivityCategory::Other).is_valid());
    }

    #[test]
    fn test_sorted_activities_does_not_reorder_storage() {
        let day_date = date(2024, 6, 1);
        let mut day = TripDay::empty(day_date, 0, "EUR");
        let late = Activity::new(
            day_date.and_hms_opt(18, 0, 0).unwrap(),
            "Dinner",
            ActivityCategory::Dining,
        );
        let early = Activity::new(
            day_date.and_hms_opt(9, 0, 0).unwrap(),
            "Museum",
            ActivityCategory::Sightseeing,
        );
        day.activities.push(late.clone());
        day.activities.push(early.clone());

        let sorted = day.sorted_activities();
        assert_eq!(sorted[0].id, early.id);
        assert_eq!(sorted[1].id, late.id);
        // Insertion order untouched.
        assert_eq!(day.activities[0].id, late.id);
    }

    #[test]
    fn test_trip_serde_round_trip() {
        let mut day = TripDay::empty(date(2024, 6, 1), 0, "EUR");
        day.budget.total = dec!(150);
        day.budget
            .expenses
            .push(Expense::new(dec!(12.50), "EUR", ExpenseCategory::Food, "coffee"));
        let trip = Trip {
            id: Uuid::new_v4(),
            name: "Rome".to_string(),
            destination: Some("Rome, Italy".to_string()),
            image_url: None,
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 1),
            local_currency: "EUR".to_string(),
            days: vec![day],
        };

        let json = serde_json::to_string(&trip).unwrap();
        let back: Trip = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, trip.id);
        assert_eq!(back.days.len(), 1);
        assert_eq!(back.days[0].budget.expenses[0].amount, dec!(12.50));
    }
}
