//! Meal-planning calendar entities.

pub mod label;

pub use label::{CalendarEventLabel, LabelContext, LabelOperation, RawCalendarLabel};

/// Endpoint that accepts every meal-planning calendar operation.
pub const UPDATE_PATH: &str = "data/meal-planning-calendar/update";

/// Multipart field carrying the encoded operation list.
pub const OPERATIONS_FIELD: &str = "operations";
