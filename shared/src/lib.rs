// lib.rs - Event comparison core shared with the web shell

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]

pub mod action;
pub mod api;
pub mod app;
pub mod capabilities;
pub mod config;
pub mod epoch;
pub mod event;
pub mod model;
pub mod retry;
pub mod selectors;
pub mod store;
pub mod view;

pub use action::{dispatch, Action, Resource};
pub use app::App;
pub use capabilities::{Capabilities, Effect, FetchError, FetchOutcome};
pub use config::{AppConfig, ConfigError};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{
    Address, AddressId, ComparisonResult, EventId, EventIdentifier, EventRecord, Model,
    SelectionSet, UiState, UserId,
};
pub use retry::{RetryDecision, RetryPolicy};
pub use selectors::SELECTION_CAP;
pub use store::reduce;
pub use view::{DiffLine, ViewModel};
