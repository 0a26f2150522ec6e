//! Wire-format tests for replacement rules.
//!
//! Rules travel as the flat JSON records the generation backend accepts;
//! these tests pin that shape and the conversion failures.

use pdf_batch::domain::{parse_rules, RawRule, DEFAULT_RANDOM_MAX, DEFAULT_START_VALUE};
use pdf_batch::{BatchError, ReplacementRule, RuleKind};
use serde_json::json;

#[test]
fn test_parse_web_client_payload() {
    let json = r#"[
        {"section_id": "section_0", "original_text": "INV-0001", "type": "serial",
         "start_value": 100, "prefix": "INV-", "suffix": "-2024", "format": "%04d"},
        {"section_id": "section_1", "original_text": "42", "type": "random",
         "random_min": 10, "random_max": 99, "prefix": "", "suffix": ""}
    ]"#;
    let rules = parse_rules(json).unwrap();

    assert_eq!(rules[0].kind, RuleKind::Serial { start_value: 100 });
    assert_eq!(rules[0].prefix, "INV-");
    assert_eq!(rules[0].format.as_ref().map(|f| f.as_str()), Some("%04d"));
    assert_eq!(rules[1].kind, RuleKind::Random { min: 10, max: 99 });
    assert!(rules[1].format.is_none());
}

#[test]
fn test_null_and_missing_fields_take_defaults() {
    let json = r#"[{"section_id": "s", "type": "serial", "prefix": null, "format": ""}]"#;
    let rules = parse_rules(json).unwrap();
    assert_eq!(
        rules[0].kind,
        RuleKind::Serial {
            start_value: DEFAULT_START_VALUE
        }
    );
    assert_eq!(rules[0].prefix, "");
    assert_eq!(rules[0].original_text, "");
    assert!(rules[0].format.is_none());
}

#[test]
fn test_random_defaults() {
    let raw = RawRule {
        section_id: "s".to_string(),
        rule_type: "random".to_string(),
        random_min: Some(50),
        ..Default::default()
    };
    let rule = ReplacementRule::try_from(raw).unwrap();
    assert_eq!(
        rule.kind,
        RuleKind::Random {
            min: 50,
            max: DEFAULT_RANDOM_MAX
        }
    );
}

#[test]
fn test_bogus_type_is_invalid_rule_type() {
    let raw = RawRule {
        section_id: "s".to_string(),
        rule_type: "bogus".to_string(),
        ..Default::default()
    };
    match ReplacementRule::try_from(raw) {
        Err(BatchError::InvalidRuleType { value }) => assert_eq!(value, "bogus"),
        other => panic!("expected InvalidRuleType, got {:?}", other),
    }
}

#[test]
fn test_bogus_type_through_serde() {
    let err = serde_json::from_value::<ReplacementRule>(json!({
        "section_id": "s",
        "type": "bogus"
    }))
    .unwrap_err();
    assert!(err.to_string().contains("Invalid rule type 'bogus'"));
}

#[test]
fn test_type_is_case_sensitive() {
    assert!(matches!(
        parse_rules(r#"[{"section_id": "s", "type": "Serial"}]"#),
        Err(BatchError::InvalidRuleType { .. })
    ));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        parse_rules("{not json"),
        Err(BatchError::Serialization { .. })
    ));
}

#[test]
fn test_custom_rule_wire_shape() {
    let rule = ReplacementRule::new("section_1", "ACME")
        .with_kind(RuleKind::Custom {
            text: "Globex".to_string(),
        })
        .with_suffix(" Inc.");
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(
        value,
        json!({
            "section_id": "section_1",
            "original_text": "ACME",
            "type": "custom",
            "prefix": "",
            "suffix": " Inc.",
            "custom_text": "Globex"
        })
    );
}

#[test]
fn test_random_rule_wire_shape() {
    let rule = ReplacementRule::new("s", "x")
        .with_kind(RuleKind::Random { min: 3, max: 7 })
        .with_format("%02d");
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(value["type"], "random");
    assert_eq!(value["random_min"], 3);
    assert_eq!(value["random_max"], 7);
    assert_eq!(value["format"], "%02d");
    assert!(value.get("start_value").is_none());
    assert!(value.get("custom_text").is_none());
}

#[test]
fn test_inverted_range_parses_but_fails_validation() {
    let rules =
        parse_rules(r#"[{"section_id": "s", "type": "random", "random_min": 9, "random_max": 1}]"#)
            .unwrap();
    assert!(matches!(
        rules[0].validate(),
        Err(BatchError::InvalidRange { min: 9, max: 1 })
    ));
}
