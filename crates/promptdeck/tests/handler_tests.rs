use promptdeck::{
    CopySession, CopyState, MemoryStorage, PromptDeck, PromptdeckError, TemplateId, TemplateStore,
    format_date, resolve,
};
use std::sync::Arc;
use time::macros::date;

async fn deck() -> PromptDeck {
    let store = TemplateStore::open(Arc::new(MemoryStorage::new()))
        .await
        .unwrap();
    PromptDeck::with_session(store, CopySession::with_date(date!(2025 - 03 - 05)))
}

#[test]
fn test_resolve_examples() {
    let today = format_date(promptdeck::resolve::today());
    assert_eq!(
        resolve("Hello {input} on {today}", &["World"]),
        format!("Hello World on {}", today)
    );
    assert_eq!(resolve("{input}-{input}", &["a"]), "a-");
    assert_eq!(resolve("no tokens here", &[] as &[&str]), "no tokens here");
    assert_eq!(promptdeck::required_input_count("{input} and {input}"), 2);
}

#[tokio::test]
async fn test_copy_without_inputs_resolves_immediately() {
    let mut deck = deck().await;
    let id = deck.on_add("Standup notes for {today}").await.unwrap().value.id;

    let state = deck.on_copy_requested(id).unwrap();
    assert_eq!(
        state,
        &CopyState::Resolved("Standup notes for 5 March 2025".to_string())
    );
}

#[tokio::test]
async fn test_copy_collects_inputs() {
    let mut deck = deck().await;
    let id = deck
        .on_add("Review {input} before {input}")
        .await
        .unwrap()
        .value
        .id;

    assert!(matches!(
        deck.on_copy_requested(id).unwrap(),
        CopyState::CollectingInputs { inputs, .. } if inputs.len() == 2
    ));

    deck.on_input(0, "the PR").unwrap();
    match deck.on_confirm() {
        Err(PromptdeckError::MissingInputs { fields }) => assert_eq!(fields, vec![2]),
        other => panic!("Expected MissingInputs, got {:?}", other),
    }

    deck.on_input(1, "Friday").unwrap();
    assert_eq!(deck.on_confirm().unwrap(), "Review the PR before Friday");
}

#[tokio::test]
async fn test_cancel_returns_to_idle() {
    let mut deck = deck().await;
    let id = deck.on_add("{input}").await.unwrap().value.id;

    deck.on_copy_requested(id).unwrap();
    deck.on_input(0, "draft").unwrap();
    deck.on_cancel();

    assert_eq!(deck.session().state(), &CopyState::Idle);
}

#[tokio::test]
async fn test_copy_unknown_template() {
    let mut deck = deck().await;
    assert!(matches!(
        deck.on_copy_requested(TemplateId(99)),
        Err(PromptdeckError::NotFound(99))
    ));
}

#[tokio::test]
async fn test_export_then_import_into_empty_store() {
    let mut source = deck().await;
    source.on_add("one {input}").await.unwrap();
    source.on_add("two {today}").await.unwrap();

    let export = source.on_export().unwrap();
    assert!(export.file_name.starts_with("prompt-templates-"));
    assert!(export.file_name.ends_with(".json"));

    let mut target = deck().await;
    let imported = target.on_import(&export.content).await.unwrap();
    assert_eq!(imported.value, 2);
    assert_eq!(target.templates(), source.templates());
}

#[tokio::test]
async fn test_import_non_array_leaves_store_unchanged() {
    let mut deck = deck().await;
    deck.on_add("existing").await.unwrap();

    for content in [r#"{"template": "x"}"#, "nonsense"] {
        assert!(matches!(
            deck.on_import(content).await,
            Err(PromptdeckError::MalformedImport { .. })
        ));
    }
    assert_eq!(deck.templates().len(), 1);
}
