//! Tests for iaso-model loading.

use iaso_model::{DescriptorNode, Label, MappingSet, MappingValue, ModelError, NodeKind};

const SURVEY: &str = r#"{
    "name": "household_survey",
    "type": "survey",
    "title": "Household survey",
    "id_string": "household_survey",
    "children": [
        {
            "name": "household",
            "type": "group",
            "label": {"English": "Household", "French": "Ménage"},
            "children": [
                {"name": "members", "type": "integer", "label": "Members"},
                {"name": "total", "type": "calculate", "bind": {"calculate": "${members} * 2"}}
            ]
        },
        {"name": "start", "type": "start"}
    ]
}"#;

#[test]
fn parses_bare_descriptor() {
    let survey = DescriptorNode::from_json_str(SURVEY).unwrap().unwrap();
    assert_eq!(survey.kind(), NodeKind::Survey);
    assert_eq!(survey.title.as_deref(), Some("Household survey"));
    assert_eq!(survey.children.len(), 2);

    let household = &survey.children[0];
    assert!(household.is_container());
    assert_eq!(household.display_label(Some("French")), "Ménage");
    assert!(matches!(household.label, Some(Label::Translations(_))));

    let total = &household.children[1];
    assert_eq!(total.calculate(), Some("${members} * 2"));
    assert_eq!(total.kind(), NodeKind::Question("calculate".to_string()));
}

#[test]
fn parses_form_version_envelope() {
    let json = format!(r#"{{"id": 12, "version_id": "2024010101", "descriptor": {SURVEY}}}"#);
    let survey = DescriptorNode::from_json_str(&json).unwrap().unwrap();
    assert_eq!(survey.name, "household_survey");
}

#[test]
fn null_descriptor_is_absent() {
    assert!(DescriptorNode::from_json_str("null").unwrap().is_none());
    assert!(
        DescriptorNode::from_json_str(r#"{"id": 1, "descriptor": null}"#)
            .unwrap()
            .is_none()
    );
}

#[test]
fn non_object_descriptor_is_rejected() {
    let err = DescriptorNode::from_json_str("[1]").unwrap_err();
    assert!(matches!(err, ModelError::InvalidDescriptor(_)));
    assert!(matches!(
        DescriptorNode::from_json_str("{").unwrap_err(),
        ModelError::Json(_)
    ));
}

#[test]
fn mapping_set_from_reader() {
    let json = br#"{"members": {"id": "dhis2-uid"}, "total": {"type": "neverMapped"}, "start": null}"#;
    let set = MappingSet::from_reader(&json[..]).unwrap();
    assert_eq!(set.len(), 3);
    assert!(matches!(
        set.get("members"),
        Some(MappingValue::MappedSingle { .. })
    ));
    assert!(matches!(set.get("total"), Some(MappingValue::NeverMapped { .. })));
    assert_eq!(set.get("start"), Some(&MappingValue::Unset));
}

struct FailingReader;

impl std::io::Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("device unplugged"))
    }
}

#[test]
fn read_failures_surface_as_json_errors() {
    let err = MappingSet::from_reader(FailingReader).unwrap_err();
    assert!(matches!(err, ModelError::Json(ref inner) if inner.is_io()));
    let err = DescriptorNode::from_reader(FailingReader).unwrap_err();
    assert!(matches!(err, ModelError::Json(ref inner) if inner.is_io()));
}

#[test]
fn unrecognised_mapping_shapes_are_kept() {
    let set = MappingSet::from_json_str(r#"{"q1": {"comment": "later"}, "q2": []}"#).unwrap();
    assert_eq!(
        set.get("q1"),
        Some(&MappingValue::Other(serde_json::json!({"comment": "later"})))
    );
    assert!(set.is_present("q1"));
    assert!(set.is_present("q2"));
    assert_eq!(
        serde_json::to_string(&set).unwrap(),
        r#"{"q1":{"comment":"later"},"q2":[]}"#
    );
}
