use condition_editor::condition::{
    Catalog, Column, Operator, OperatorCatalog, Selection, SuggestionKind, suggest,
};

fn catalog() -> Catalog {
    Catalog::with_columns(vec![
        Column::number("status"),
        Column::string("message"),
        Column::string("tag"),
    ])
}

fn labels(text: &str, selection: &Selection, catalog: &Catalog) -> Vec<String> {
    suggest(text, selection, catalog)
        .into_iter()
        .map(|s| s.label)
        .collect()
}

#[test]
fn test_empty_buffer_offers_every_column() {
    let suggestions = suggest("", &Selection::default(), &catalog());
    assert_eq!(suggestions.len(), 3);
    assert_eq!(
        suggestions
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>(),
        vec!["status...", "message...", "tag..."]
    );
    assert!(matches!(
        &suggestions[1].kind,
        SuggestionKind::Column { column } if column == "message"
    ));
}

#[test]
fn test_typing_narrows_columns() {
    assert_eq!(
        labels("ta", &Selection::default(), &catalog()),
        vec!["status...", "tag..."]
    );
    assert_eq!(labels("mess", &Selection::default(), &catalog()), vec!["message..."]);
    assert!(labels("zzz", &Selection::default(), &catalog()).is_empty());
}

#[test]
fn test_containment_is_case_sensitive() {
    assert!(labels("TAG", &Selection::default(), &catalog()).is_empty());
}

#[test]
fn test_numeric_column_offers_full_catalog() {
    let suggestions = labels("status", &Selection::default(), &catalog());
    assert_eq!(suggestions.len(), 10);
    assert!(suggestions.contains(&"status >=".to_string()));
}

#[test]
fn test_selected_column_drives_operator_list() {
    let selection = Selection::new(Some("tag".to_string()), None);
    let suggestions = suggest("", &selection, &catalog());
    assert_eq!(suggestions.len(), 6);
    assert_eq!(suggestions[0].label, "tag =");
    assert!(matches!(
        &suggestions[0].kind,
        SuggestionKind::Operator { column, operator: Operator::Eq } if column == "tag"
    ));

    assert_eq!(
        labels("IS", &selection, &catalog()),
        vec!["tag IS NULL", "tag IS NOT NULL"]
    );
}

#[test]
fn test_operator_list_respects_catalog() {
    let catalog = Catalog::new(
        vec![Column::number("status")],
        OperatorCatalog::new([Operator::Eq, Operator::In]),
    );
    assert_eq!(
        labels("status", &Selection::default(), &catalog),
        vec!["status =", "status IN"]
    );
}

#[test]
fn test_resolved_operator_means_value_is_typed() {
    assert!(labels("status >", &Selection::default(), &catalog()).is_empty());
    let selection = Selection::new(Some("status".to_string()), Some(Operator::Gt));
    assert!(labels("", &selection, &catalog()).is_empty());
}

#[test]
fn test_complete_condition_stops_suggestions() {
    assert!(labels("message IS NULL", &Selection::default(), &catalog()).is_empty());
    assert!(labels("tag IN a,b", &Selection::default(), &catalog()).is_empty());
}
