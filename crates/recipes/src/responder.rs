//! Prompt templating and suggestion composition

use tracing::debug;

use crate::enricher::Enrichment;
use crate::error::ProviderError;
use crate::matcher::MatchResult;
use crate::providers::ChatModel;

/// Separator between agenda items in the prompt
pub const AGENDA_SEPARATOR: &str = ", ";

/// Distance scaled by 100 and rounded to two decimals
///
/// This is a distance, not a probability: 0 means identical embeddings and
/// the value has no upper bound.
pub fn similarity_percent(distance: f32) -> f64 {
  let scaled = f64::from(distance) * 100.0;
  (scaled * 100.0).round() / 100.0
}

/// Fill the suggestion template; the similarity always carries two decimals
pub fn render_prompt(agenda_items: &[String], recipe_name: &str, similarity: f64, closest_task: &str) -> String {
  format!(
    "Based on your input, I suggest you to follow these steps: {agenda}. \
     This suggestion is based on the recipe '{recipe_name}', which is {similarity:.2}% similar to your input. \
     The original recipe that it is matching with is '{closest_task}'.",
    agenda = agenda_items.join(AGENDA_SEPARATOR),
  )
}

/// Ask the chat model to phrase the suggestion; its text is returned verbatim
pub async fn compose_suggestion(
  chat: &dyn ChatModel,
  matched: &MatchResult,
  enrichment: &Enrichment,
  query: &str,
) -> Result<String, ProviderError> {
  let prompt = render_prompt(
    &enrichment.agenda_items,
    query,
    similarity_percent(matched.distance),
    &matched.journey_name,
  );
  debug!(prompt_len = prompt.len(), "compose_suggestion: sending prompt");
  chat.complete(&prompt).await
}
