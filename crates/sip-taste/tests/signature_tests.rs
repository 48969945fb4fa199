use pretty_assertions::assert_eq;
use sip_taste::*;
use sip_test_utils::sample_log;

#[test]
fn test_sample_log_signature() {
    let signature = TasteSignature::from_entries(&sample_log());

    assert_eq!(signature.total_drinks, 5);
    assert_eq!(
        signature.breakdown,
        vec![
            TasteBreakdownItem::new("wine", 3, 60.0, 4.3),
            TasteBreakdownItem::new("beer", 1, 20.0, 3.5),
            TasteBreakdownItem::new("whiskey", 1, 20.0, 5.0),
        ]
    );
    // 60% is not strictly above the devotee threshold
    assert_eq!(signature.personality_label, "Eclectic Sipper");
}

#[test]
fn test_one_more_wine_makes_a_devotee() {
    let mut log = sample_log();
    log.push(DrinkLogEntry::new("d6", "Soave", "wine", 3.0));

    let signature = TasteSignature::from_entries(&log);
    assert_eq!(signature.breakdown[0].percentage, 67.0);
    assert_eq!(signature.personality_label, "Wine Devotee");
}

#[test]
fn test_top_drinks_skip_unrated() {
    let top = top_drinks_by_category(&sample_log(), 5);

    let wine = &top[0];
    assert_eq!(wine.category, DrinkCategory::BuiltIn(BuiltInCategory::Wine));
    let names: Vec<_> = wine.top_drinks.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Barolo", "Chianti"]);
    assert_eq!(top.len(), 3);
}

#[test]
fn test_log_json_shape() {
    let json = r#"[
        {"id": "1", "name": "Junmai", "type": "Sake", "rating": 4, "imageUrl": null, "brand": "Dassai"},
        {"id": "2", "name": "Negroni", "type": "cocktail"}
    ]"#;
    let log: Vec<DrinkLogEntry> = serde_json::from_str(json).unwrap();

    assert_eq!(log[0].category, DrinkCategory::Custom("Sake".to_string()));
    assert_eq!(log[0].brand.as_deref(), Some("Dassai"));
    assert_eq!(log[1].rating, 0.0);

    let signature = TasteSignature::from_entries(&log);
    assert_eq!(signature.personality_label, "Sake & Cocktail Enthusiast");
}
