// redactive-ner/tests/recognizer_tests.rs
use anyhow::Result;
use redactive_ner::{EntityLabel, EntityRecognizer, Lexicons};

fn recognizer() -> Result<EntityRecognizer> {
    EntityRecognizer::new()
}

#[test_log::test]
fn test_advising_message_extracts_expected_entities() -> Result<()> {
    let text = "Dr. Sarah Johnson from the Computer Science Department said my \
                appeal is due 10/15/2024. Student ID: 7654321.";
    let result = recognizer()?.recognize(text);

    let labels: Vec<EntityLabel> = result.entities.iter().map(|e| e.label).collect();
    assert!(labels.contains(&EntityLabel::Person));
    assert!(labels.contains(&EntityLabel::Org));
    assert!(labels.contains(&EntityLabel::Date));
    assert!(labels.contains(&EntityLabel::Id));

    let person = result
        .entities
        .iter()
        .find(|e| e.label == EntityLabel::Person)
        .unwrap();
    assert_eq!(person.text, "Sarah Johnson");
    Ok(())
}

#[test]
fn test_no_entities_is_high_confidence() -> Result<()> {
    let result = recognizer()?.recognize("the weather was pleasant today");
    assert!(result.entities.is_empty());
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.redacted_text, "the weather was pleasant today");
    Ok(())
}

#[test]
fn test_mean_confidence_over_mixed_entities() -> Result<()> {
    // One template hit at 0.8 plus one at 0.9 averages to 0.85.
    let result = recognizer()?.recognize("Prof. Emily Davis recommends CS 240");
    assert_eq!(result.entities.len(), 2);
    let mean = result.entities.iter().map(|e| e.confidence).sum::<f64>()
        / result.entities.len() as f64;
    assert!((result.confidence - mean).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_custom_lexicons_are_injectable() {
    let yaml = "first_names:\n  - zorblax\nlast_names:\n  - vemrick\n";
    let lexicons: Lexicons = serde_yml::from_str(yaml).unwrap();
    let recognizer = EntityRecognizer::with_lexicons(lexicons);

    let result = recognizer.recognize("please email zorblax vemrick today");
    assert!(result
        .entities
        .iter()
        .any(|e| e.label == EntityLabel::Person && e.text == "zorblax vemrick"));

    // Default names are unknown to the custom lexicon and nothing else in
    // the sentence matches a template.
    let result = recognizer.recognize("please email jane doe today");
    assert!(result.entities.is_empty());
}

#[test]
fn test_spans_index_back_into_source() -> Result<()> {
    let text = "Contact jane.doe@purdue.edu about MA 161 before 01/02/2025";
    let result = recognizer()?.recognize(text);
    for entity in &result.entities {
        assert_eq!(&text[entity.start..entity.end], entity.text);
    }
    Ok(())
}

#[test]
fn test_redacted_text_replaces_every_entity() -> Result<()> {
    let text = "jane doe got a B+ in CS 252";
    let result = recognizer()?.recognize(text);
    assert!(!result.redacted_text.contains("jane doe"));
    assert!(result.redacted_text.contains("[NAME]"));
    assert!(result.redacted_text.contains("[COURSE]"));
    Ok(())
}
