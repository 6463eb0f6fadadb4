//! Request context and middleware for the recipes REST API
//!
//! Every request gets a [`RequestContext`] carrying its id, metadata and the
//! shared journal, injected as a request extension.

use axum::{
  extract::{Request, State},
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use herald::journal::{EntryContext, Journal};
use herald::Level;
use std::time::Instant;
use uuid::Uuid;

use crate::server::AppState;

/// Request context containing the journal and request metadata
#[derive(Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub user_agent: Option<String>,
  pub journal: Journal,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, user_agent: Option<String>, journal: Journal) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri, user_agent, journal }
  }

  pub async fn log_info(&self, message: &str, component: &str) {
    self.log_with_context(Level::Info, message, component, None, None).await;
  }

  pub async fn log_success(&self, message: &str, component: &str) {
    self.log_with_context(Level::Success, message, component, None, None).await;
  }

  pub async fn log_warn(&self, message: &str, component: &str) {
    self.log_with_context(Level::Warn, message, component, None, None).await;
  }

  pub async fn log_error(&self, message: &str, component: &str) {
    self.log_with_context(Level::Error, message, component, None, None).await;
  }

  /// Journal a message with the request's structured context attached
  pub async fn log_with_context(
    &self,
    level: Level,
    message: &str,
    component: &str,
    status_code: Option<u16>,
    duration_ms: Option<f64>,
  ) {
    let context = EntryContext {
      request_id: Some(self.request_id.to_string()),
      method: Some(self.method.to_string()),
      path: Some(self.uri.path().to_string()),
      user_agent: self.user_agent.clone(),
      status_code,
      duration_ms,
    };
    let line = format!("[{}] {} {} - {}", self.request_id, self.method, self.uri.path(), message);
    self.journal.log(level, &line, component, Some(context)).await;
  }

  pub async fn log_request_start(&self) {
    self.log_with_context(Level::Info, "Request started", "http-request", None, None).await;
  }

  pub async fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    let level = if status_code >= 500 { Level::Error } else { Level::Info };
    self
      .log_with_context(level, "Request completed", "http-request", Some(status_code), Some(duration_ms))
      .await;
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(
  State(state): State<AppState>,
  mut request: Request,
  next: Next,
) -> Response {
  let user_agent = request
    .headers()
    .get(axum::http::header::USER_AGENT)
    .and_then(|value| value.to_str().ok())
    .map(str::to_string);

  let context =
    RequestContext::new(request.method().clone(), request.uri().clone(), user_agent, state.journal.clone());

  let start_time = Instant::now();
  context.log_request_start().await;

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms).await;

  response
}
