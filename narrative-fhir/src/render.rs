//! Plain-text narrative of categorized resources.

use narrative_core::{
    CategorizedResources, Condition, Medication, Observation, OtherResource, Patient,
};

use crate::resolve;

/// Render every non-empty bucket as a numbered section.
///
/// Sections always appear as patients, conditions, medications, observations,
/// other. Each emitted section ends with a blank line; empty buckets emit
/// nothing, so an empty input renders to an empty string.
pub fn render(resources: &CategorizedResources) -> String {
    let mut output = String::new();

    push_section(&mut output, "PATIENTS:", &resources.patients, patient_line);
    push_section(
        &mut output,
        "MEDICAL CONDITIONS:",
        &resources.conditions,
        condition_line,
    );
    push_section(
        &mut output,
        "MEDICATIONS:",
        &resources.medications,
        medication_line,
    );
    push_section(
        &mut output,
        "OBSERVATIONS/VITAL SIGNS:",
        &resources.observations,
        observation_line,
    );
    push_section(&mut output, "OTHER RESOURCES:", &resources.other, other_line);

    output
}

fn push_section<T>(output: &mut String, header: &str, items: &[T], line: fn(&T) -> String) {
    if items.is_empty() {
        return;
    }

    output.push_str(header);
    output.push('\n');
    for (index, item) in items.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", index + 1, line(item)));
    }
    output.push('\n');
}

fn patient_line(patient: &Patient) -> String {
    let name = resolve::patient_name(patient).unwrap_or_else(|| {
        format!(
            "Patient ID: {}",
            resolve::present(&patient.id).unwrap_or("unknown")
        )
    });

    let mut demographics = Vec::new();
    if let Some(gender) = resolve::patient_gender(patient) {
        demographics.push(format!("Gender: {gender}"));
    }
    if let Some(birth_date) = resolve::patient_birth_date(patient) {
        demographics.push(format!("DOB: {birth_date}"));
    }

    if demographics.is_empty() {
        name
    } else {
        format!("{name} ({})", demographics.join(", "))
    }
}

fn condition_line(condition: &Condition) -> String {
    let mut line = resolve::concept_label(condition.code.as_ref())
        .unwrap_or("Unknown condition")
        .to_string();
    push_patient_suffix(&mut line, &condition.subject);
    if let Some(status) = resolve::clinical_status(condition) {
        line.push_str(&format!(" - Status: {status}"));
    }
    line
}

fn medication_line(medication: &Medication) -> String {
    let mut line = resolve::concept_label(medication.medication.as_ref())
        .unwrap_or("Unknown medication")
        .to_string();
    push_patient_suffix(&mut line, &medication.subject);
    line
}

fn observation_line(observation: &Observation) -> String {
    let mut line = resolve::concept_label(observation.code.as_ref())
        .unwrap_or("Unknown observation")
        .to_string();
    if let Some(value) = resolve::observation_value(observation) {
        line.push_str(&format!(": {value}"));
    }
    push_patient_suffix(&mut line, &observation.subject);
    line
}

fn other_line(resource: &OtherResource) -> String {
    format!(
        "{} (ID: {})",
        resolve::present(&resource.resource_type).unwrap_or("Unknown"),
        resolve::present(&resource.id).unwrap_or("unknown")
    )
}

fn push_patient_suffix(line: &mut String, subject: &Option<String>) {
    if let Some(reference) = resolve::present(subject) {
        line.push_str(&format!(" (Patient: {reference})"));
    }
}
