use ljs_config::{render, Field};
use ljs_core::SweepError;

#[test]
fn default_directory_template_uses_six_decimals() {
    let rendered = render(
        "T_{temperature:f}/d_{density:f}",
        &[
            ("temperature", Field::Number(0.1)),
            ("density", Field::Number(1.0)),
        ],
    )
    .expect("render");
    assert_eq!(rendered, "T_0.100000/d_1.000000");
}

#[test]
fn phase_names_embed_text_fields() {
    let rendered = render(
        "(T={temperature:.2f}, d={density:.2f}) {name}",
        &[
            ("temperature", Field::Number(0.7)),
            ("density", Field::Number(0.3)),
            ("name", Field::Text("Observation Phase")),
        ],
    )
    .expect("render");
    assert_eq!(rendered, "(T=0.70, d=0.30) Observation Phase");
}

#[test]
fn bare_numbers_use_shortest_form() {
    let rendered = render("{t}", &[("t", Field::Number(0.25))]).expect("render");
    assert_eq!(rendered, "0.25");
}

#[test]
fn unknown_fields_are_rejected() {
    let err = render("{pressure}", &[("temperature", Field::Number(1.0))]).expect_err("unknown");
    match err {
        SweepError::Template(info) => {
            assert_eq!(info.code, "template_unknown_field");
            assert_eq!(info.context.get("field").map(String::as_str), Some("pressure"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn malformed_templates_are_rejected() {
    assert!(render("T_{temperature", &[("temperature", Field::Number(1.0))]).is_err());
    assert!(render("T_}", &[]).is_err());
    assert!(render("{name:f}", &[("name", Field::Text("x"))]).is_err());
}

#[test]
fn oversized_precision_is_a_format_error() {
    let fields = [("temperature", Field::Number(0.5))];
    let rendered = render("{temperature:.17f}", &fields).expect("widest precision");
    assert_eq!(rendered, "0.50000000000000000");

    for template in ["{temperature:.18f}", "{temperature:.999999999999f}"] {
        match render(template, &fields).expect_err("too precise") {
            SweepError::Template(info) => assert_eq!(info.code, "template_format"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
