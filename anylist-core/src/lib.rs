//! Client library for AnyList's meal-planning calendar.
//!
//! This crate provides:
//! - `meal_planning` entities such as [`CalendarEventLabel`]
//! - `protobuf` wire messages exchanged with the server
//! - `client` with the [`Transport`] seam and its reqwest implementation
//! - `config` for the on-disk client configuration

pub mod client;
pub mod config;
pub mod error;
pub mod meal_planning;
pub mod protobuf;
pub mod utils;

pub use client::{Client, Transport};
pub use config::AnyListConfig;
pub use error::{AnyListError, AnyListResult};
pub use meal_planning::{CalendarEventLabel, LabelContext, LabelOperation, RawCalendarLabel};
