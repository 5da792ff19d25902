//! Client for the HRMS Lite REST API: typed employee and attendance
//! operations, response normalization, and a freshness-gated controller
//! for the dashboard statistics.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod utils;
pub mod view;

pub use api::HrmsClient;
pub use config::Config;
pub use dashboard::{FetchController, Freshness, StatsSource};
pub use error::ApiError;
