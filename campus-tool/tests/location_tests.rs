use campus_core::{ErrorKind, ToolOutcome};
use campus_data::Catalog;
use campus_tool::{GET_LOCATION_INFO, builtin_registry};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_lookup_ignores_case() {
    let registry = builtin_registry(Arc::new(Catalog::builtin()));
    let outcome =
        registry.invoke(GET_LOCATION_INFO, &json!({"locationName": "main library"})).await.unwrap();

    let record = outcome.found().expect("Main Library should be found");
    assert_eq!(record["name"], "Main Library");
}

#[tokio::test]
async fn test_tech_building_record() {
    let registry = builtin_registry(Arc::new(Catalog::builtin()));
    let outcome =
        registry.invoke(GET_LOCATION_INFO, &json!({"locationName": "Tech Building"})).await.unwrap();

    let record = outcome.found().unwrap();
    assert_eq!(record["type"], "Academic");
    assert_eq!(record["hours"], "Open 24/7 for students in the program");
}

#[tokio::test]
async fn test_unknown_location_is_not_an_error() {
    let registry = builtin_registry(Arc::new(Catalog::builtin()));
    let outcome =
        registry.invoke(GET_LOCATION_INFO, &json!({"locationName": "Moon Base"})).await.unwrap();

    match outcome {
        ToolOutcome::NotFound(message) => {
            assert!(message.starts_with("Information for \"Moon Base\" could not be found."));
            assert!(message.contains("Main Library, Student Union, Tech Building"));
        }
        other => panic!("expected not-found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_location_name_is_invalid_input() {
    let registry = builtin_registry(Arc::new(Catalog::builtin()));
    let err = registry.invoke(GET_LOCATION_INFO, &json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_declaration_exposes_parameters() {
    let registry = builtin_registry(Arc::new(Catalog::builtin()));
    let decls = registry.declarations(&[GET_LOCATION_INFO]).unwrap();
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].parameters["type"], "OBJECT");
    assert_eq!(decls[0].parameters["required"], json!(["locationName"]));
}
