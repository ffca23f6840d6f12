//! Integration tests for editor crate

use anyhow::Result;
use serde_json::{json, Value};
use zobject_editor::{
    ChangeTypeOptions, Document, EditSession, KeyPath, Mutation, RowValue, ZType,
};
use zobject_transcoder::{canonicalize_value, normalize};

fn canonical_function() -> Value {
    json!({
        "Z1K1": "Z2",
        "Z2K1": { "Z1K1": "Z6", "Z6K1": "Z0" },
        "Z2K2": {
            "Z1K1": "Z8",
            "Z8K1": ["Z17", { "Z1K1": "Z17", "Z17K1": "Z6", "Z17K2": "Z0K1" }],
            "Z8K2": "Z6",
            "Z8K3": ["Z20"],
            "Z8K4": ["Z14"],
            "Z8K5": "Z0"
        },
        "Z2K3": {
            "Z1K1": "Z12",
            "Z12K1": ["Z11", { "Z1K1": "Z11", "Z11K1": "Z1002", "Z11K2": "echo" }]
        }
    })
}

#[test]
fn test_document_lifecycle() -> Result<()> {
    let normal = normalize(&canonical_function());
    let mut doc = Document::from_normal(&normal, 0);

    // Check initial state
    assert_eq!(doc.version, 0);
    assert!(!doc.is_dirty());
    assert_eq!(doc.to_canonical("main")?, canonical_function());
    assert_eq!(doc.to_normal("main")?, normal);

    doc.apply(&Mutation::ChangeType {
        key_path: KeyPath::parse("main.Z2K2.Z8K1")?,
        new_type: ZType::ArgumentDeclaration,
        options: ChangeTypeOptions {
            append: true,
            ..Default::default()
        },
    })?;
    doc.apply(&Mutation::SetValue {
        key_path: KeyPath::parse("main.Z2K2.Z8K1.2.Z17K1")?,
        value: "Z40".to_string(),
    })?;

    let saved = doc.to_canonical("main")?;
    assert_eq!(doc.version, 2);
    assert_eq!(saved["Z2K2"]["Z8K1"][2]["Z17K1"], json!("Z40"));
    assert_eq!(
        saved["Z2K2"]["Z8K1"][2]["Z17K2"],
        json!({ "Z1K1": "Z6", "Z6K1": "Z0K2" })
    );
    assert_eq!(canonicalize_value(&doc.to_normal("main")?), saved);
    Ok(())
}

#[test]
fn test_edit_session_workflow() -> Result<()> {
    let doc = Document::from_canonical(&canonical_function(), 0);
    let mut session = EditSession::new("test-client", doc);

    session.enqueue(Mutation::PushItems {
        list_path: KeyPath::parse("main.Z2K3.Z12K1")?,
        values: vec![json!({
            "Z1K1": { "Z1K1": "Z9", "Z9K1": "Z11" },
            "Z11K1": { "Z1K1": "Z9", "Z9K1": "Z1003" },
            "Z11K2": { "Z1K1": "Z6", "Z6K1": "écho" }
        })],
    });
    session.enqueue(Mutation::DeleteListItems {
        list_path: KeyPath::parse("main.Z2K3.Z12K1")?,
        indexes: vec![0],
    });
    assert_eq!(session.pending_count(), 2);

    let outcomes = session.flush();
    assert!(outcomes.iter().all(|outcome| outcome.result.is_ok()));

    let saved = session.save("main")?;
    assert_eq!(
        saved["Z2K3"]["Z12K1"],
        json!(["Z11", { "Z1K1": "Z11", "Z11K1": "Z1003", "Z11K2": "écho" }])
    );
    Ok(())
}

#[test]
fn test_implementation_draft_in_its_own_namespace() -> Result<()> {
    let mut doc = Document::from_canonical(&canonical_function(), 0);
    doc.load_namespace("implementation", &json!({ "Z1K1": "Z14", "Z14K1": "Z0" }))?;

    doc.apply(&Mutation::ChangeType {
        key_path: KeyPath::parse("implementation.Z14K2")?,
        new_type: ZType::FunctionCall,
        options: Default::default(),
    })
    .expect_err("Z14K2 does not exist yet");

    doc.apply(&Mutation::ReplaceSubtree {
        key_path: KeyPath::parse("implementation.Z14K1")?,
        value: json!({ "Z1K1": "Z9", "Z9K1": "Z10001" }),
    })?;

    assert_eq!(
        doc.to_canonical("implementation")?,
        json!({ "Z1K1": "Z14", "Z14K1": "Z10001" })
    );
    // The main tree is untouched
    assert_eq!(doc.to_canonical("main")?, canonical_function());

    // Namespace rows share one id space
    let main_root = doc.table().namespace_root("main").unwrap();
    let impl_root = doc.table().namespace_root("implementation").unwrap();
    assert!(impl_root > main_root);
    Ok(())
}

#[test]
fn test_rows_hold_hybrid_terminals() {
    let doc = Document::from_canonical(
        &json!({ "Z1K1": "Z11", "Z11K1": "Z1002", "Z11K2": { "Z1K1": "Z6", "Z6K1": "Z1002" } }),
        0,
    );
    let table = doc.table();

    let text = table.resolve(&KeyPath::parse("main.Z11K2.Z6K1").unwrap()).unwrap();
    assert_eq!(text.value, RowValue::Terminal("Z1002".to_string()));
    let language = table.resolve(&KeyPath::parse("main.Z11K1.Z9K1").unwrap()).unwrap();
    assert_eq!(language.value, RowValue::Terminal("Z1002".to_string()));
}

#[test]
fn test_mutation_serialization() {
    let mutation = Mutation::DeleteListItems {
        list_path: KeyPath::parse("main.Z2K2.Z8K1").unwrap(),
        indexes: vec![0, 2],
    };

    // Serialize to JSON
    let json = serde_json::to_string(&mutation).unwrap();
    assert_eq!(
        json,
        r#"{"DeleteListItems":{"list_path":"main.Z2K2.Z8K1","indexes":[0,2]}}"#
    );

    // Deserialize back
    let deserialized: Mutation = serde_json::from_str(&json).unwrap();
    assert_eq!(mutation, deserialized);
}
