//! REST server for recipe requests
//!
//! Exposes the pipeline at `POST /get_recipe` alongside service endpoints for
//! status, version, the request journal and index maintenance.

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;

use herald::journal::Journal;
use std::sync::Arc;

use crate::pipeline::RecipeService;

pub use routing::create_router;
pub use startup::start_server;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
  pub service: Arc<RecipeService>,
  pub journal: Journal,
}

impl AppState {
  pub fn new(service: RecipeService, journal: Journal) -> Self {
    Self { service: Arc::new(service), journal }
  }
}
