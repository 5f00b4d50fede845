use chrono::{TimeZone, Utc};

use forms_elements::default_registry;
use forms_export::{Exporter, to_json};
use forms_model::{
    Container, Element, ElementChoice, ElementId, FieldValue, Form, FormId, Submission,
    SubmissionId,
};

fn id(name: &str) -> ElementId {
    ElementId::new(name).unwrap()
}

/// A form mixing inputs, static content, and an unresolvable element type.
fn fixture() -> (Form, Vec<Submission>) {
    let intro = Element::new(id("intro"), "content", "Intro");
    let name = Element::new(id("name"), "textfield", "Name");
    let colors = Element::new(id("colors"), "multiplechoice", "Colors").with_choices(vec![
        ElementChoice::new("red", "Red"),
        ElementChoice::new("green", "Green"),
        ElementChoice::new("blue", "Blue"),
    ]);
    let consent = Element::new(id("consent"), "checkbox", "Consent");
    let ghost = Element::new(id("ghost"), "hologram", "Ghost");
    let form = Form::new(FormId::new(7), "Feedback").with_containers(vec![
        Container::new("Page 1").with_elements(vec![intro, name, colors, consent, ghost]),
    ]);

    let created = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let mut first = Submission::new(SubmissionId::new(1), form.id, created);
    first.values.insert(id("name"), FieldValue::Text("Ada".into()));
    first.values.insert(
        id("colors"),
        FieldValue::Many(vec!["red".into(), "blue".into()]),
    );
    first.values.insert(id("consent"), FieldValue::Text("yes".into()));
    first
        .mark_completed(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap())
        .unwrap();

    // Second submission never completed and answered only one element.
    let created = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
    let mut second = Submission::new(SubmissionId::new(2), form.id, created);
    second.values.insert(id("name"), FieldValue::Text("Grace".into()));

    (form, vec![first, second])
}

#[test]
fn csv_table_shape() {
    let (form, submissions) = fixture();
    let exporter = Exporter::new(default_registry());
    let output = exporter.csv_string(&form, &submissions).unwrap();
    insta::assert_snapshot!(output);
}

#[test]
fn csv_skips_static_content_and_keeps_unresolvable_columns() {
    let (form, submissions) = fixture();
    let exporter = Exporter::new(default_registry());
    let output = exporter.csv_string(&form, &submissions).unwrap();

    let header = output.lines().next().unwrap();
    assert_eq!(header, "Submission,Date,Name,Colors,Consent,Ghost");
    assert!(!header.contains("Intro"));
}

#[test]
fn json_projection_keeps_value_structure() {
    let (form, submissions) = fixture();
    let rows = to_json(default_registry(), &form, &submissions).unwrap();

    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(first["id"], "1");
    assert_eq!(first["form_id"], "7");
    assert_eq!(first["status"], "completed");
    assert_eq!(first["values"]["name"], "Ada");
    assert_eq!(first["values"]["colors"], serde_json::json!(["red", "blue"]));
    assert_eq!(first["values"]["ghost"], "");
    // Static content collects nothing and is not projected.
    assert!(first["values"].get("intro").is_none());

    let second = &rows[1];
    assert_eq!(second["status"], "in_progress");
    assert_eq!(second["completed_at"], serde_json::Value::Null);
    assert_eq!(second["values"]["colors"], serde_json::Value::Null);
}
