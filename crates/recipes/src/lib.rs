//! Recipes - matches free-text requests to workflow tasks
//!
//! A request is embedded, matched against the task names of a published
//! spreadsheet, enriched with the matched task's agenda items and methods,
//! and phrased into a suggestion by a chat model.

pub mod cli;
pub mod config;
pub mod enricher;
pub mod error;
pub mod index;
pub mod loader;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod responder;
pub mod server;

pub use config::{Config, FeedConfig, IndexMode, ProviderConfig};
pub use error::{FeedError, IndexError, ProviderError, RecipeError};
pub use pipeline::{Recommendation, RecipeService};
