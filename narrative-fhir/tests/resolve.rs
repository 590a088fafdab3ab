use narrative_core::{
    CategorizedResources, CodeableConcept, Coding, Condition, HumanName, Observation, Patient,
    Quantity,
};
use narrative_fhir::render;
use narrative_fhir::resolve::{clinical_status, concept_label, observation_value, patient_name};

fn coding(code: Option<&str>, display: Option<&str>) -> Coding {
    Coding {
        system: None,
        code: code.map(str::to_string),
        display: display.map(str::to_string),
    }
}

#[test]
fn concept_label_walks_text_display_code() {
    let mut concept = CodeableConcept {
        text: Some("Essential hypertension".to_string()),
        coding: vec![coding(Some("59621000"), Some("Hypertension"))],
    };
    assert_eq!(concept_label(Some(&concept)), Some("Essential hypertension"));

    concept.text = Some(String::new());
    assert_eq!(concept_label(Some(&concept)), Some("Hypertension"));

    concept.coding = vec![coding(Some("59621000"), None)];
    assert_eq!(concept_label(Some(&concept)), Some("59621000"));

    concept.coding = vec![coding(None, None), coding(Some("ignored"), Some("Ignored"))];
    assert_eq!(concept_label(Some(&concept)), None);
    assert_eq!(concept_label(None), None);
}

#[test]
fn patient_name_joins_given_names_and_trims() {
    let mut patient = Patient {
        name: vec![
            HumanName {
                given: vec!["Anna".to_string(), "Maria".to_string()],
                family: None,
            },
            HumanName {
                given: vec![],
                family: Some("Ignored".to_string()),
            },
        ],
        ..Patient::default()
    };
    assert_eq!(patient_name(&patient).as_deref(), Some("Anna Maria"));

    patient.name = vec![HumanName {
        given: vec![],
        family: Some("Nguyen".to_string()),
    }];
    assert_eq!(patient_name(&patient).as_deref(), Some("Nguyen"));

    patient.name = vec![HumanName::default()];
    assert_eq!(patient_name(&patient), None);
}

#[test]
fn clinical_status_uses_first_coding_code() {
    let condition = Condition {
        clinical_status: Some(CodeableConcept {
            text: Some("Active".to_string()),
            coding: vec![coding(Some("resolved"), None), coding(Some("active"), None)],
        }),
        ..Condition::default()
    };
    assert_eq!(clinical_status(&condition), Some("resolved"));
    assert_eq!(clinical_status(&Condition::default()), None);
}

#[test]
fn observation_value_priority() {
    let mut observation = Observation {
        value_quantity: Some(Quantity {
            value: Some(36.6),
            unit: None,
        }),
        value_string: Some("afebrile".to_string()),
        value_codeable_concept: Some(CodeableConcept {
            text: None,
            coding: vec![coding(Some("260385009"), Some("Negative"))],
        }),
        ..Observation::default()
    };
    assert_eq!(observation_value(&observation).as_deref(), Some("36.6 "));

    observation.value_quantity = None;
    assert_eq!(observation_value(&observation).as_deref(), Some("afebrile"));

    observation.value_string = None;
    assert_eq!(observation_value(&observation).as_deref(), Some("Negative"));

    observation.value_codeable_concept = Some(CodeableConcept {
        text: None,
        coding: vec![coding(Some("260385009"), None)],
    });
    assert_eq!(observation_value(&observation), None);
}

#[test]
fn patient_without_demographics_has_no_parentheses() {
    let resources = CategorizedResources {
        patients: vec![
            Patient {
                id: Some("p7".to_string()),
                ..Patient::default()
            },
            Patient {
                birth_date: Some("2001-02-03".to_string()),
                ..Patient::default()
            },
        ],
        ..CategorizedResources::default()
    };

    assert_eq!(
        render(&resources),
        "PATIENTS:\n1. Patient ID: p7\n2. Patient ID: unknown (DOB: 2001-02-03)\n\n"
    );
}

#[test]
fn empty_buckets_render_nothing() {
    assert_eq!(render(&CategorizedResources::default()), "");
}
