use std::cell::RefCell;

use narrative_core::{
    NarrativeError, NarrativeOutput, NoopObserver, SummaryConfig, SummaryPrompt, SummaryRequest,
    Summarizer,
};
use narrative_fhir::{build_prompt, summarize_bundle};
use serde_json::json;

struct CannedSummarizer {
    answer: String,
    prompts: RefCell<Vec<SummaryPrompt>>,
}

impl CannedSummarizer {
    fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl Summarizer for CannedSummarizer {
    fn summarize(
        &self,
        prompt: &SummaryPrompt,
        _config: &SummaryConfig,
    ) -> Result<String, NarrativeError> {
        self.prompts.borrow_mut().push(prompt.clone());
        Ok(self.answer.clone())
    }
}

fn diabetes_bundle() -> serde_json::Value {
    json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [
            { "resource": {
                "resourceType": "Condition",
                "code": { "text": "Type 2 diabetes mellitus" },
                "subject": { "reference": "Patient/p1" }
            } },
            { "fullUrl": "urn:uuid:blank" }
        ]
    })
}

#[test]
fn summary_carries_model_answer_and_entry_count() {
    let summarizer = CannedSummarizer::new("  Patient with type 2 diabetes.\n");
    let config = SummaryConfig::default();

    let summary = summarize_bundle(
        &diabetes_bundle(),
        Some("  glycemic control "),
        &summarizer,
        &config,
        &NoopObserver,
    )
    .unwrap();

    assert_eq!(summary.summary, "Patient with type 2 diabetes.");
    assert_eq!(summary.resource_entry_count, 2);

    let prompts = summarizer.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].system, config.system_prompt);
    assert!(prompts[0].user.contains("with 2 entries"));
    assert!(prompts[0]
        .user
        .contains("Focus the summary on: glycemic control\n"));
    assert!(prompts[0]
        .user
        .ends_with("MEDICAL CONDITIONS:\n1. Type 2 diabetes mellitus (Patient: Patient/p1)\n\n"));
}

#[test]
fn blank_model_answer_is_an_error() {
    let summarizer = CannedSummarizer::new("   ");

    let err = summarize_bundle(
        &diabetes_bundle(),
        None,
        &summarizer,
        &SummaryConfig::default(),
        &NoopObserver,
    )
    .unwrap_err();

    assert!(matches!(err, NarrativeError::Summarizer(_)));
}

#[test]
fn invalid_bundle_never_reaches_the_model() {
    let summarizer = CannedSummarizer::new("unused");

    let err = summarize_bundle(
        &json!({ "resourceType": "Bundle" }),
        None,
        &summarizer,
        &SummaryConfig::default(),
        &NoopObserver,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Invalid bundle: type is required");
    assert!(summarizer.prompts.borrow().is_empty());
}

#[test]
fn prompt_for_empty_narrative_says_so() {
    let config = SummaryConfig::default();
    let request = SummaryRequest::new(NarrativeOutput::default(), Some("   "), &config);

    let prompt = build_prompt(&request, &config);

    assert_eq!(request.focus, None);
    assert_eq!(
        prompt.user,
        "Summarize the following clinical records from a FHIR bundle with 0 entries.\n\n\
         No recognizable clinical resources were found in the bundle.\n"
    );
}
