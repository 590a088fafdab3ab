//! FHIR bundle to clinical narrative converter.
//!
//! The pipeline validates a raw bundle, sorts its entries into
//! patients/conditions/medications/observations/other and renders them as a
//! sectioned text block for a downstream summarization model.

mod bundle;
mod categorize;
mod prompt;
mod render;
pub mod resolve;

pub use bundle::{parse_bundle_str, parse_resource, validate, validate_with};
pub use categorize::{categorize, count_resources};
pub use prompt::build_prompt;
pub use render::render;

use narrative_core::{
    BundleObserver, ClinicalSummary, NarrativeError, NarrativeOutput, SummaryConfig,
    SummaryRequest, Summarizer,
};
use serde_json::Value;

/// Build the narrative and entry count from a raw bundle value.
pub fn prepare_narrative(
    raw: &Value,
    observer: &dyn BundleObserver,
) -> Result<NarrativeOutput, NarrativeError> {
    let bundle = validate_with(raw, observer)?;
    let resources = categorize(&bundle);

    Ok(NarrativeOutput {
        narrative_text: render(&resources),
        resource_entry_count: count_resources(&bundle),
    })
}

/// Build the narrative from a JSON string.
pub fn prepare_narrative_str(
    bundle_json: &str,
    observer: &dyn BundleObserver,
) -> Result<NarrativeOutput, NarrativeError> {
    let value = parse_bundle_str(bundle_json)?;
    prepare_narrative(&value, observer)
}

/// Run the whole pipeline and hand the narrative to `summarizer`.
pub fn summarize_bundle(
    raw: &Value,
    focus: Option<&str>,
    summarizer: &dyn Summarizer,
    config: &SummaryConfig,
    observer: &dyn BundleObserver,
) -> Result<ClinicalSummary, NarrativeError> {
    let narrative = prepare_narrative(raw, observer)?;
    let resource_entry_count = narrative.resource_entry_count;
    let request = SummaryRequest::new(narrative, focus, config);
    let prompt = build_prompt(&request, config);

    let summary = summarizer.summarize(&prompt, config)?;
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(NarrativeError::Summarizer(
            "model returned an empty summary".to_string(),
        ));
    }

    Ok(ClinicalSummary {
        summary: summary.to_string(),
        resource_entry_count,
    })
}
