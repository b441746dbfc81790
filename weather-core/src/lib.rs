//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The weather record, display unit and classification models
//! - Pure display logic (unit conversion, classification, card text)
//! - The OpenWeather lookup behind the [`WeatherProvider`] trait
//! - Persistence of the last viewed record in a key-value slot
//! - The application shell tying these together
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod display;
pub mod model;
pub mod provider;
pub mod storage;
pub mod unit;

pub use app::{LookupOutcome, LookupTicket, WeatherApp};
pub use config::Config;
pub use display::{classify, convert};
pub use model::{Classification, Unit, WeatherRecord};
pub use provider::{LookupError, WeatherProvider, provider_from_config};
pub use storage::{FileSlotStore, MemorySlotStore, SlotStore, WeatherStore};
pub use unit::UnitContext;
