//! Prompt composition for the external summarization model.

use narrative_core::{SummaryConfig, SummaryPrompt, SummaryRequest};

/// Compose the system and user messages for one summary request.
pub fn build_prompt(request: &SummaryRequest, config: &SummaryConfig) -> SummaryPrompt {
    let narrative = &request.narrative;
    let mut user = format!(
        "Summarize the following clinical records from a FHIR bundle with {} entries.\n",
        narrative.resource_entry_count
    );

    if let Some(focus) = &request.focus {
        user.push_str(&format!("Focus the summary on: {focus}\n"));
    }

    user.push('\n');
    if narrative.narrative_text.is_empty() {
        user.push_str("No recognizable clinical resources were found in the bundle.\n");
    } else {
        user.push_str(&narrative.narrative_text);
    }

    SummaryPrompt {
        system: config.system_prompt.clone(),
        user,
    }
}
