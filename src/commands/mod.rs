pub mod config;
pub mod label;
