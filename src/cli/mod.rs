pub mod budget;
pub mod expense;
pub mod itinerary;
pub mod setup;
pub mod trips;
pub mod ui;
