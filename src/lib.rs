pub mod config;
pub mod evaluator;
pub mod models;
pub mod parse;
pub mod scrapers;
pub mod store;
pub mod tracker;
pub mod utils;
pub mod web;

pub use utils::error::{AppError, Result};
