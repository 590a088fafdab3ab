//! Fallback chains that pick the best available display string.
//!
//! Empty strings count as missing at every step.

use narrative_core::{CodeableConcept, Condition, Observation, Patient};

fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
}

/// Non-empty string value.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// `text`, then the first coding's `display`, then its `code`.
pub fn concept_label(concept: Option<&CodeableConcept>) -> Option<&str> {
    let concept = concept?;
    let coding = concept.first_coding();
    first_present([
        concept.text.as_deref(),
        coding.and_then(|coding| coding.display.as_deref()),
        coding.and_then(|coding| coding.code.as_deref()),
    ])
}

/// First name entry as "given... family", or `None` when it comes out blank.
pub fn patient_name(patient: &Patient) -> Option<String> {
    let name = patient.name.first()?;
    let given = name.given.join(" ");
    let family = name.family.as_deref().unwrap_or("");
    let full = format!("{given} {family}").trim().to_string();
    if full.is_empty() {
        None
    } else {
        Some(full)
    }
}

pub fn patient_gender(patient: &Patient) -> Option<&str> {
    present(&patient.gender)
}

pub fn patient_birth_date(patient: &Patient) -> Option<&str> {
    present(&patient.birth_date)
}

/// Code of the first clinical-status coding.
pub fn clinical_status(condition: &Condition) -> Option<&str> {
    condition
        .clinical_status
        .as_ref()
        .and_then(CodeableConcept::first_coding)
        .and_then(|coding| coding.code.as_deref())
        .filter(|code| !code.is_empty())
}

/// Observation value, by priority: quantity, string, concept text, concept
/// display.
pub fn observation_value(observation: &Observation) -> Option<String> {
    if let Some(quantity) = &observation.value_quantity {
        if let Some(value) = quantity.value {
            let unit = quantity.unit.as_deref().unwrap_or("");
            return Some(format!("{value} {unit}"));
        }
    }

    if let Some(text) = present(&observation.value_string) {
        return Some(text.to_string());
    }

    let concept = observation.value_codeable_concept.as_ref()?;
    first_present([
        concept.text.as_deref(),
        concept
            .first_coding()
            .and_then(|coding| coding.display.as_deref()),
    ])
    .map(str::to_string)
}
