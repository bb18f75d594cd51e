//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The two-stage zip code lookup (geocoding, then forecast) behind a [`Resolver`]
//! - The view controller that turns a lookup outcome into a render tree
//! - Shared domain models (requests, results, failures)
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod view;

pub use config::Config;
pub use error::LookupError;
pub use model::{
    Condition, CurrentConditions, DEFAULT_ZIP_CODE, DayForecast, LookupRequest, NonEmpty,
    ResolutionOutcome, WeatherResult,
};
pub use provider::{HttpReply, HttpTransport, Transport, openweather::Endpoints};
pub use resolver::Resolver;
pub use view::{Navigation, Route, Screen, ViewController};
