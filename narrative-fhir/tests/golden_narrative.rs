use std::fs;

use narrative_core::NoopObserver;
use narrative_fhir::prepare_narrative_str;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn clinic_visit_bundle_matches_golden() {
    let bundle = fs::read_to_string(fixture_path("clinic_visit_bundle.json"))
        .expect("Không đọc được bundle mẫu");

    let output = prepare_narrative_str(&bundle, &NoopObserver).expect("Không tạo được narrative");

    let expected = fs::read_to_string(fixture_path("clinic_visit_narrative.txt"))
        .expect("Không đọc được golden narrative");

    assert_eq!(output.narrative_text, expected.replace("\r\n", "\n"));
    assert_eq!(output.resource_entry_count, 11);
}

#[test]
fn rendering_the_same_bundle_twice_is_byte_identical() {
    let bundle = fs::read_to_string(fixture_path("clinic_visit_bundle.json"))
        .expect("Không đọc được bundle mẫu");

    let first = prepare_narrative_str(&bundle, &NoopObserver).expect("lần 1");
    let second = prepare_narrative_str(&bundle, &NoopObserver).expect("lần 2");

    assert_eq!(first, second);
}
