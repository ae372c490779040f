use super::{trips, ui};
use crate::core::store::TripStore;
use crate::core::trip::{Activity, ActivityCategory, Trip};
use anyhow::{Result, bail};
use chrono::NaiveTime;
use comfy_table::Cell;

/// Plans an activity on a trip day at a time of day.
#[allow(clippy::too_many_arguments)]
pub fn add_activity(
    store: &mut TripStore,
    trip_query: &str,
    day: usize,
    time: NaiveTime,
    title: &str,
    category: ActivityCategory,
    location: &str,
    notes: &str,
) -> Result<()> {
    if day == 0 {
        bail!("Day numbers start at 1");
    }
    let day_index = day - 1;

    let trip = trips::find_trip(store, trip_query)?;
    let trip_id = trip.id;
    let Some(date) = trip.days.get(day_index).map(|d| d.date) else {
        bail!("Trip '{}' has no day {}", trip.name, day);
    };

    let mut activity = Activity::new(date.and_time(time), title, category);
    activity.location = location.to_string();
    activity.notes = notes.to_string();
    if !activity.is_valid() {
        bail!("Activity title cannot be empty");
    }

    store.add_activity(trip_id, day_index, activity)?;
    println!(
        "Planned '{}' on day {} at {}",
        title,
        day,
        time.format("%H:%M")
    );
    Ok(())
}

/// Prints the day-by-day itinerary of a trip.
pub fn show(trip: &Trip) {
    println!(
        "Trip: {} ({} to {})\n",
        ui::style_text(&trip.name, ui::StyleType::Title),
        trip.start_date,
        trip.end_date
    );

    let num_days = trip.days.len();
    for (index, day) in trip.days.iter().enumerate() {
        let heading = format!("{} · {}", day.date.format("%a %d %b %Y"), day.title);
        println!("{}", ui::style_text(&heading, ui::StyleType::TotalLabel));

        if day.activities.is_empty() {
            println!(
                "  {}",
                ui::style_text("No activities planned", ui::StyleType::Subtle)
            );
        } else {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Time"),
                ui::header_cell("Activity"),
                ui::header_cell("Category"),
                ui::header_cell("Location"),
            ]);
            for activity in day.sorted_activities() {
                table.add_row(vec![
                    Cell::new(activity.time.format("%H:%M").to_string()),
                    Cell::new(&activity.title),
                    Cell::new(activity.category.to_string()),
                    Cell::new(&activity.location),
                ]);
            }
            println!("{table}");
        }

        if !day.transportation.mode.is_empty() {
            println!(
                "  Transportation: {} at {}",
                day.transportation.mode,
                day.transportation.time.format("%H:%M")
            );
        }

        let budget = &day.budget;
        println!(
            "  Budget: {} · spent {} · remaining {}",
            ui::format_money(budget.total, &budget.currency),
            ui::format_money(budget.spent(), &budget.currency),
            ui::format_money(budget.remaining(), &budget.currency)
        );

        for item in &day.checklist {
            let mark = if item.is_done { "[x]" } else { "[ ]" };
            println!("  {} {}", mark, item.text);
        }

        if index + 1 < num_days {
            ui::print_separator();
        }
    }
}
