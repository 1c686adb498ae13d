use iaso_map::{FlatIndex, index_questions};
use iaso_model::{DescriptorNode, Label};

fn parse(json: &str) -> DescriptorNode {
    DescriptorNode::from_json_str(json).unwrap().unwrap()
}

fn path_of(index: &FlatIndex, key: &str) -> Option<Vec<String>> {
    index.get(key).and_then(|node| node.path.clone())
}

#[test]
fn simple_survey_keys_and_paths() {
    let survey = parse(
        r#"{"name": "survey", "children": [
            {"name": "g1", "type": "group", "children": [
                {"name": "q1", "type": "text"},
                {"name": "q2", "type": "text"}
            ]}
        ]}"#,
    );
    let index = index_questions(Some(&survey));

    assert_eq!(index.keys().collect::<Vec<_>>(), vec!["g1", "q1", "q2"]);
    assert_eq!(
        path_of(&index, "q1"),
        Some(vec!["survey".to_string(), "g1".to_string(), "q1".to_string()])
    );
    assert_eq!(path_of(&index, "g1"), None);
    assert_eq!(index.get("q2").unwrap().parent_name.as_deref(), Some("g1"));
    assert!(index.get("g1").unwrap().is_container);
    assert_eq!(index.questions().count(), 2);
}

#[test]
fn select_all_options_get_synthetic_keys() {
    let survey = parse(
        r#"{"name": "survey", "type": "survey", "children": [
            {"name": "q3", "type": "select all that apply", "children": [{"name": "opt1"}]}
        ]}"#,
    );
    let index = index_questions(Some(&survey));

    let option = index.get("q3__opt1").expect("option indexed under synthetic key");
    assert_eq!(option.name, "opt1");
    assert_eq!(option.uuid.as_deref(), Some("q3__opt1"));
    assert_eq!(option.parent_name.as_deref(), Some("q3"));
    assert!(!index.contains_key("opt1"));
    // The input tree keeps no trace of the synthetic key.
    assert_eq!(survey.children[0].children[0], DescriptorNode::new("opt1", ""));
}

#[test]
fn select_one_children_are_not_indexed() {
    let survey = parse(
        r#"{"name": "survey", "children": [
            {"name": "color", "type": "select one", "children": [
                {"name": "red"}, {"name": "blue"}
            ]}
        ]}"#,
    );
    let index = index_questions(Some(&survey));

    assert_eq!(index.keys().collect::<Vec<_>>(), vec!["color"]);
    let color = index.get("color").unwrap();
    assert!(!color.is_container);
    assert_eq!(color.children, vec!["red".to_string(), "blue".to_string()]);
}

#[test]
fn duplicate_keys_keep_the_first_entry() {
    let survey = DescriptorNode::new("survey", "survey").with_children(vec![
        DescriptorNode::new("age", "integer").with_label(Label::Text("First".to_string())),
        DescriptorNode::new("age", "integer").with_label(Label::Text("Second".to_string())),
    ]);
    let index = index_questions(Some(&survey));

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("age").unwrap().display_label(None), "First");
    assert_eq!(index.get("age1").unwrap().display_label(None), "Second");
    assert_eq!(index.get("age1").unwrap().name, "age");

    let by_name: Vec<&str> = index.find_by_name("age").map(|e| e.key.as_str()).collect();
    assert_eq!(by_name, vec!["age", "age1"]);
}

#[test]
fn nested_repeat_paths_follow_structure() {
    let survey = parse(
        r#"{"name": "census", "type": "survey", "children": [
            {"name": "household", "type": "group", "children": [
                {"name": "person", "type": "repeat", "children": [
                    {"name": "age", "type": "integer"}
                ]}
            ]}
        ]}"#,
    );
    let index = index_questions(Some(&survey));

    assert_eq!(
        path_of(&index, "age"),
        Some(vec![
            "census".to_string(),
            "household".to_string(),
            "person".to_string(),
            "age".to_string()
        ])
    );
    assert_eq!(index.get("age").unwrap().parent_key.as_deref(), Some("person"));
    assert_eq!(
        index
            .children_of(Some("household"))
            .map(|n| n.key.as_str())
            .collect::<Vec<_>>(),
        vec!["person"]
    );
}

#[test]
fn reindexing_a_clone_is_identical() {
    let survey = parse(
        r#"{"name": "survey", "children": [
            {"name": "g1", "type": "group", "children": [
                {"name": "q1", "type": "text"},
                {"name": "pick", "type": "select all that apply", "children": [{"name": "a"}, {"name": "b"}]}
            ]},
            {"name": "q2", "type": "text"}
        ]}"#,
    );
    let before = survey.clone();
    let first = index_questions(Some(&survey.clone()));
    let second = index_questions(Some(&survey.clone()));

    assert_eq!(first, second);
    assert_eq!(index_questions(Some(&survey)), first);
    assert_eq!(survey, before);
}

#[test]
fn calculate_formula_is_carried() {
    let survey = parse(
        r#"{"name": "survey", "children": [
            {"name": "bmi", "type": "calculate", "bind": {"calculate": "${weight} div (${height} * ${height})"}}
        ]}"#,
    );
    let index = index_questions(Some(&survey));
    assert_eq!(
        index.get("bmi").unwrap().calculate.as_deref(),
        Some("${weight} div (${height} * ${height})")
    );
}
