//! FHIR JSON validation and lenient conversion into the typed bundle model.

use narrative_core::{
    Bundle, BundleEntry, BundleObserver, BundleType, CodeableConcept, Coding, Condition,
    HumanName, InvalidBundle, Medication, MedicationKind, NarrativeError, Observation,
    OtherResource, Patient, Quantity, Resource, TracingObserver, BUNDLE_RESOURCE_TYPE,
};
use serde_json::Value;

/// Read a bundle from a JSON string without validating its shape.
pub fn parse_bundle_str(bundle_json: &str) -> Result<Value, NarrativeError> {
    serde_json::from_str(bundle_json).map_err(|err| NarrativeError::Parse(err.to_string()))
}

/// Validate a raw bundle, logging through `tracing`.
pub fn validate(raw: &Value) -> Result<Bundle, InvalidBundle> {
    validate_with(raw, &TracingObserver)
}

/// Validate a raw bundle and build a fresh typed copy of it.
///
/// A missing or non-array `entry` becomes an empty entry list. The input value
/// is left untouched.
pub fn validate_with(raw: &Value, observer: &dyn BundleObserver) -> Result<Bundle, InvalidBundle> {
    match build_bundle(raw) {
        Ok(bundle) => {
            observer.bundle_accepted(&bundle.bundle_type, bundle.entries.len());
            Ok(bundle)
        }
        Err(reason) => {
            observer.bundle_rejected(&reason);
            Err(reason)
        }
    }
}

fn build_bundle(raw: &Value) -> Result<Bundle, InvalidBundle> {
    let object = raw.as_object().ok_or(InvalidBundle::NotAnObject)?;

    if object.get("resourceType").and_then(Value::as_str) != Some(BUNDLE_RESOURCE_TYPE) {
        return Err(InvalidBundle::NotABundle);
    }

    let bundle_type = object
        .get("type")
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())
        .map(BundleType::from_code)
        .ok_or(InvalidBundle::MissingType)?;

    let mut bundle = Bundle::new(bundle_type);
    if let Some(entries) = object.get("entry").and_then(Value::as_array) {
        bundle.entries = entries
            .iter()
            .map(|entry| BundleEntry {
                resource: entry
                    .get("resource")
                    .filter(|resource| !resource.is_null())
                    .map(parse_resource),
            })
            .collect();
    }

    Ok(bundle)
}

/// Convert one resource, dispatching on `resourceType`.
pub fn parse_resource(resource: &Value) -> Resource {
    let resource_type = string_field(resource, "resourceType");

    match resource_type.as_deref() {
        Some("Patient") => Resource::Patient(parse_patient(resource)),
        Some("Condition") => Resource::Condition(parse_condition(resource)),
        Some("Medication") => {
            Resource::Medication(parse_medication(resource, MedicationKind::Medication))
        }
        Some("MedicationRequest") => {
            Resource::Medication(parse_medication(resource, MedicationKind::MedicationRequest))
        }
        Some("Observation") => Resource::Observation(parse_observation(resource)),
        _ => Resource::Other(OtherResource {
            resource_type,
            id: string_field(resource, "id"),
        }),
    }
}

fn parse_patient(resource: &Value) -> Patient {
    let name = resource
        .get("name")
        .and_then(Value::as_array)
        .map(|names| names.iter().map(parse_human_name).collect())
        .unwrap_or_default();

    Patient {
        id: string_field(resource, "id"),
        name,
        gender: string_field(resource, "gender"),
        birth_date: string_field(resource, "birthDate"),
    }
}

fn parse_human_name(name: &Value) -> HumanName {
    let given = name
        .get("given")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    HumanName {
        given,
        family: string_field(name, "family"),
    }
}

fn parse_condition(resource: &Value) -> Condition {
    Condition {
        id: string_field(resource, "id"),
        subject: subject_reference(resource),
        code: resource.get("code").and_then(parse_codeable_concept),
        clinical_status: resource
            .get("clinicalStatus")
            .and_then(parse_codeable_concept),
    }
}

fn parse_medication(resource: &Value, kind: MedicationKind) -> Medication {
    let medication = resource
        .get("medicationCodeableConcept")
        .and_then(parse_codeable_concept)
        .or_else(|| resource.get("code").and_then(parse_codeable_concept));

    Medication {
        kind,
        id: string_field(resource, "id"),
        subject: subject_reference(resource),
        medication,
    }
}

fn parse_observation(resource: &Value) -> Observation {
    Observation {
        id: string_field(resource, "id"),
        subject: subject_reference(resource),
        code: resource.get("code").and_then(parse_codeable_concept),
        value_quantity: resource.get("valueQuantity").and_then(parse_quantity),
        value_string: string_field(resource, "valueString"),
        value_codeable_concept: resource
            .get("valueCodeableConcept")
            .and_then(parse_codeable_concept),
    }
}

fn parse_codeable_concept(value: &Value) -> Option<CodeableConcept> {
    value.as_object()?;

    let coding = value
        .get("coding")
        .and_then(Value::as_array)
        .map(|codings| {
            codings
                .iter()
                .map(|coding| Coding {
                    system: string_field(coding, "system"),
                    code: string_field(coding, "code"),
                    display: string_field(coding, "display"),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(CodeableConcept {
        text: string_field(value, "text"),
        coding,
    })
}

fn parse_quantity(value: &Value) -> Option<Quantity> {
    value.as_object()?;
    Some(Quantity {
        value: value.get("value").and_then(Value::as_f64),
        unit: string_field(value, "unit"),
    })
}

fn subject_reference(resource: &Value) -> Option<String> {
    resource
        .get("subject")
        .and_then(|subject| string_field(subject, "reference"))
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}
