//! Core domain types and logic.

pub mod analysis;
pub mod breakout;
pub mod config_validation;
pub mod error;
pub mod returns;
pub mod series;
pub mod summary;
