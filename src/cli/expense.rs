use super::{trips, ui};
use crate::core::currency::RateCache;
use crate::core::store::TripStore;
use crate::core::trip::{Expense, ExpenseCategory};
use anyhow::{Result, bail};
use rust_decimal::Decimal;

/// Records an expense against a trip day. Foreign-currency amounts are
/// converted into the day budget's currency before they are stored; when
/// the rate cannot be fetched the expense is not recorded at all.
#[allow(clippy::too_many_arguments)]
pub async fn add(
    store: &mut TripStore,
    rates: &RateCache,
    trip_query: &str,
    day: usize,
    amount: Decimal,
    currency: Option<&str>,
    category: ExpenseCategory,
    note: &str,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        bail!("Expense amount must be positive");
    }
    if day == 0 {
        bail!("Day numbers start at 1");
    }
    let day_index = day - 1;

    let trip = trips::find_trip(store, trip_query)?;
    let trip_id = trip.id;
    let currency = currency
        .map(str::to_string)
        .unwrap_or_else(|| trip.local_currency.clone());

    let expense = Expense::new(amount, &currency, category, note);
    store
        .add_expense_converted(trip_id, day_index, expense, rates)
        .await?;

    let budget = store
        .trip(trip_id)
        .and_then(|t| t.days.get(day_index))
        .map(|d| &d.budget);
    if let Some(budget) = budget {
        match budget.expenses.last() {
            Some(recorded) if recorded.converted_amount.is_some() => println!(
                "Recorded {} ({})",
                ui::format_money(recorded.amount, &recorded.currency),
                ui::format_money(
                    recorded.converted_amount.unwrap_or_default(),
                    &budget.currency
                )
            ),
            Some(recorded) => println!(
                "Recorded {}",
                ui::format_money(recorded.amount, &recorded.currency)
            ),
            None => {}
        }
        println!(
            "Day {} remaining: {}",
            day,
            ui::style_text(
                &ui::format_money(budget.remaining(), &budget.currency),
                ui::StyleType::TotalValue
            )
        );
    }

    Ok(())
}
