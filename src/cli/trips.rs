use super::ui;
use crate::core::store::{TripDraft, TripStore};
use crate::core::trip::Trip;
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use comfy_table::Cell;

/// Resolves a trip by case-insensitive name or id prefix.
pub fn find_trip<'a>(store: &'a TripStore, query: &str) -> Result<&'a Trip> {
    let query_lower = query.to_lowercase();
    store
        .trips()
        .iter()
        .find(|t| {
            t.name.to_lowercase() == query_lower || t.id.to_string().starts_with(&query_lower)
        })
        .ok_or_else(|| anyhow!("No trip matches '{}'. Run `wayplan list` to see trips.", query))
}

pub fn list(store: &TripStore) {
    if store.trips().is_empty() {
        println!(
            "{}",
            ui::style_text("No trips yet. Add one with `wayplan add`.", ui::StyleType::Subtle)
        );
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Destination"),
        ui::header_cell("Start"),
        ui::header_cell("End"),
        ui::header_cell("Days"),
        ui::header_cell("Currency"),
    ]);

    for trip in store.trips() {
        let short_id: String = trip.id.to_string().chars().take(8).collect();
        table.add_row(vec![
            Cell::new(short_id),
            Cell::new(&trip.name),
            Cell::new(trip.destination.as_deref().unwrap_or("-")),
            Cell::new(trip.start_date.to_string()),
            Cell::new(trip.end_date.to_string()),
            Cell::new(trip.days.len().to_string()),
            Cell::new(&trip.local_currency),
        ]);
    }

    println!("{table}");
}

pub fn add(store: &mut TripStore, draft: TripDraft) -> Result<()> {
    let trip = store.add_trip(draft)?;
    println!(
        "Added {} ({} to {}, {} day(s), {})",
        ui::style_text(&trip.name, ui::StyleType::Title),
        trip.start_date,
        trip.end_date,
        trip.days.len(),
        trip.local_currency
    );
    Ok(())
}

/// Moves or resizes a trip's date range. Day content is carried across by
/// index; days beyond the new range are dropped for good, so warn loudly.
pub fn edit_dates(
    store: &mut TripStore,
    query: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<()> {
    let trip = find_trip(store, query)?;
    let trip_id = trip.id;
    let old_len = trip.days.len();

    store.update_trip_dates(trip_id, start, end)?;

    let trip = store.trip(trip_id).ok_or_else(|| anyhow!("Trip vanished"))?;
    let new_len = trip.days.len();
    println!(
        "{} now runs {} to {} ({} day(s))",
        ui::style_text(&trip.name, ui::StyleType::Title),
        trip.start_date,
        trip.end_date,
        new_len
    );
    if new_len < old_len {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "Dropped {} day(s) beyond the new range, including their plans and expenses.",
                    old_len - new_len
                ),
                ui::StyleType::Error
            )
        );
    }
    Ok(())
}

pub fn remove(store: &mut TripStore, query: &str) -> Result<()> {
    let trip = find_trip(store, query)?;
    let (trip_id, name) = (trip.id, trip.name.clone());
    store.delete_trip(trip_id)?;
    println!("Deleted trip {name}");
    Ok(())
}
