use super::{trips, ui};
use crate::core::currency::RateCache;
use crate::core::store::TripStore;
use crate::core::trip::{ExpenseCategory, Trip};
use anyhow::{Result, bail};
use comfy_table::Cell;
use console::style;
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Sets the budget total (and optionally the currency) for one trip day.
/// The day's recorded expenses are carried over into the replaced budget.
pub fn set(
    store: &mut TripStore,
    trip_query: &str,
    day: usize,
    total: Decimal,
    currency: Option<&str>,
) -> Result<()> {
    if total < Decimal::ZERO {
        bail!("Budget total cannot be negative");
    }
    if day == 0 {
        bail!("Day numbers start at 1");
    }
    let day_index = day - 1;

    let trip = trips::find_trip(store, trip_query)?;
    let trip_id = trip.id;
    let mut budget = trip
        .days
        .get(day_index)
        .map(|d| d.budget.clone())
        .unwrap_or_else(|| crate::core::trip::Budget::new(Decimal::ZERO, &trip.local_currency));
    budget.total = total;
    if let Some(currency) = currency {
        budget.currency = currency.to_string();
    }

    store.update_budget(trip_id, day_index, budget)?;
    let updated = store
        .trip(trip_id)
        .and_then(|t| t.days.get(day_index))
        .map(|d| &d.budget);
    if let Some(budget) = updated {
        println!(
            "Day {} budget set to {}",
            day,
            ui::style_text(
                &ui::format_money(budget.total, &budget.currency),
                ui::StyleType::TotalValue
            )
        );
    }
    Ok(())
}

/// Displays the trip's budget: per-day totals, category breakdown and a
/// grand total, everything expressed in the trip's local currency.
///
/// Day budgets kept in another currency are converted at today's rate; a
/// day whose rate cannot be fetched shows N/A and is left out of the
/// totals rather than silently miscounted.
pub async fn run(trip: &Trip, rates: &RateCache) -> Result<()> {
    let local = trip.local_currency.as_str();

    // One rate per distinct foreign budget currency, fetched concurrently.
    let foreign: HashSet<&str> = trip
        .days
        .iter()
        .map(|d| d.budget.currency.as_str())
        .filter(|c| *c != local)
        .collect();

    let mut day_rates: HashMap<String, Option<Decimal>> = HashMap::new();
    if !foreign.is_empty() {
        let pb = ui::new_progress_bar(foreign.len() as u64, true);
        pb.set_message("Fetching exchange rates...");

        let rate_futures = foreign.iter().map(|currency| {
            let pb_clone = pb.clone();
            async move {
                let rate = match rates.get_rate(currency, local).await {
                    Ok(rate) => Decimal::from_f64(rate),
                    Err(e) => {
                        debug!("Rate lookup failed for {}: {}", currency, e);
                        None
                    }
                };
                pb_clone.inc(1);
                (currency.to_string(), rate)
            }
        });

        day_rates = join_all(rate_futures).await.into_iter().collect();
        pb.finish_and_clear();
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell("Date"),
        ui::header_cell(&format!("Budget ({local})")),
        ui::header_cell(&format!("Spent ({local})")),
        ui::header_cell(&format!("Remaining ({local})")),
    ]);

    let mut total_budget = Decimal::ZERO;
    let mut total_spent = Decimal::ZERO;
    let mut category_totals: HashMap<ExpenseCategory, Decimal> = HashMap::new();
    let mut all_days_valid = true;

    for (index, day) in trip.days.iter().enumerate() {
        let budget = &day.budget;
        let rate = if budget.currency == local {
            Some(Decimal::ONE)
        } else {
            day_rates.get(&budget.currency).copied().flatten()
        };

        match rate {
            Some(rate) => {
                let day_total = budget.total * rate;
                let day_spent = budget.spent() * rate;
                total_budget += day_total;
                total_spent += day_spent;
                for (category, amount) in budget.category_totals() {
                    *category_totals.entry(category).or_insert(Decimal::ZERO) += amount * rate;
                }
                table.add_row(vec![
                    Cell::new((index + 1).to_string()),
                    Cell::new(day.date.to_string()),
                    ui::money_cell(day_total),
                    ui::money_cell(day_spent),
                    ui::money_cell(day_total - day_spent),
                ]);
            }
            None => {
                all_days_valid = false;
                table.add_row(vec![
                    Cell::new((index + 1).to_string()),
                    Cell::new(day.date.to_string()),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                ]);
            }
        }
    }

    println!(
        "Budget for {}\n",
        ui::style_text(&trip.name, ui::StyleType::Title)
    );
    println!("{table}");

    if !category_totals.is_empty() {
        let mut categories: Vec<(ExpenseCategory, Decimal)> =
            category_totals.into_iter().collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1));

        let mut breakdown = ui::new_styled_table();
        breakdown.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell(&format!("Spent ({local})")),
        ]);
        for (category, amount) in categories {
            breakdown.add_row(vec![
                Cell::new(category.to_string()),
                ui::money_cell(amount),
            ]);
        }
        println!("\n{breakdown}");
    }

    if all_days_valid {
        let remaining = total_budget - total_spent;
        let total_str = format!(
            "Total: {} budgeted, {} spent, {} remaining",
            ui::format_money(total_budget, local),
            ui::format_money(total_spent, local),
            ui::format_money(remaining, local)
        );
        let styled_total = style(&total_str).bold().green();
        println!("\n{styled_total}");
    } else {
        println!(
            "\n{}",
            ui::style_text(
                "Some day budgets could not be converted; totals omitted.",
                ui::StyleType::Error
            )
        );
    }

    Ok(())
}
