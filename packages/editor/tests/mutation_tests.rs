//! Tests for each mutation on its own

use serde_json::{json, Value};
use zobject_editor::{
    ChangeTypeOptions, InitValues, KeyPath, Mutation, MutationError, RowTable, TypeCatalog, ZType,
};
use zobject_transcoder::{canonical_to_hybrid, hybrid_to_canonical};

fn function() -> Value {
    json!({
        "Z1K1": "Z2",
        "Z2K1": { "Z1K1": "Z6", "Z6K1": "Z10001" },
        "Z2K2": {
            "Z1K1": "Z8",
            "Z8K1": [
                "Z17",
                { "Z1K1": "Z17", "Z17K1": "Z6", "Z17K2": "Z10001K1", "Z17K3": { "Z1K1": "Z12", "Z12K1": ["Z11"] } },
                { "Z1K1": "Z17", "Z17K1": "Z40", "Z17K2": "Z10001K2", "Z17K3": { "Z1K1": "Z12", "Z12K1": ["Z11"] } }
            ],
            "Z8K2": "Z6",
            "Z8K3": ["Z20"],
            "Z8K4": ["Z14"],
            "Z8K5": "Z10001"
        }
    })
}

fn table() -> RowTable {
    RowTable::from_tree(&canonical_to_hybrid(&function()), 0)
}

fn path(s: &str) -> KeyPath {
    KeyPath::parse(s).unwrap()
}

fn canonical(table: &RowTable) -> Value {
    let root = table.namespace_root("main").unwrap();
    hybrid_to_canonical(&table.to_tree(root, false).unwrap())
}

fn argument_types(table: &RowTable) -> Vec<Value> {
    canonical(table)["Z2K2"]["Z8K1"].as_array().unwrap()[1..]
        .iter()
        .map(|arg| arg["Z17K1"].clone())
        .collect()
}

#[test]
fn test_insert_list_item() {
    let mut table = table();
    let item = canonical_to_hybrid(&json!({ "Z1K1": "Z17", "Z17K1": "Z1", "Z17K2": "Z10001K3" }));

    table
        .insert_list_item(&path("main.Z2K2.Z8K1.2"), &item)
        .unwrap();

    assert_eq!(argument_types(&table), vec![json!("Z6"), json!("Z1"), json!("Z40")]);
}

#[test]
fn test_insert_at_end_and_past_end() {
    let mut table = table();
    let item = canonical_to_hybrid(&json!("Z6"));

    table.insert_list_item(&path("main.Z2K2.Z8K3.1"), &item).unwrap();
    assert_eq!(canonical(&table)["Z2K2"]["Z8K3"], json!(["Z20", "Z6"]));

    let err = table.insert_list_item(&path("main.Z2K2.Z8K3.3"), &item).unwrap_err();
    assert_eq!(err, MutationError::IndexOutOfRange { index: 3, len: 1 });
}

#[test]
fn test_insert_rejects_non_list() {
    let mut table = table();
    let err = table
        .insert_list_item(&path("main.Z2K2.Z8K2.1"), &json!("x"))
        .unwrap_err();
    assert!(matches!(err, MutationError::NotAList(_)));

    let err = table
        .insert_list_item(&path("main.Z2K2.Z8K1.Z17K1"), &json!("x"))
        .unwrap_err();
    assert!(matches!(err, MutationError::NotAListItem(_)));
}

#[test]
fn test_delete_list_items() {
    let mut table = table();
    let before = table.len();

    table
        .delete_list_items(&path("main.Z2K2.Z8K1"), &[0])
        .unwrap();

    assert_eq!(argument_types(&table), vec![json!("Z40")]);
    assert!(table.len() < before);
    // Every removed row took its descendants with it
    for row in table.rows() {
        if let Some(parent) = row.parent {
            assert!(table.row(parent).is_some());
        }
    }
}

#[test]
fn test_delete_out_of_range_changes_nothing() {
    let mut table = table();
    let before = table.clone();

    let err = table
        .delete_list_items(&path("main.Z2K2.Z8K1"), &[0, 2])
        .unwrap_err();

    assert_eq!(err, MutationError::IndexOutOfRange { index: 2, len: 2 });
    assert_eq!(table, before);
}

#[test]
fn test_delete_duplicate_indexes() {
    let mut table = table();
    table
        .delete_list_items(&path("main.Z2K2.Z8K1"), &[1, 1])
        .unwrap();
    assert_eq!(argument_types(&table), vec![json!("Z6")]);
}

#[test]
fn test_move_list_item() {
    let mut table = table();
    table.move_list_item(&path("main.Z2K2.Z8K1.2"), -1).unwrap();
    assert_eq!(argument_types(&table), vec![json!("Z40"), json!("Z6")]);
}

#[test]
fn test_move_past_either_end_fails() {
    let mut table = table();
    let before = table.clone();

    let err = table.move_list_item(&path("main.Z2K2.Z8K1.1"), -1).unwrap_err();
    assert_eq!(err, MutationError::IndexOutOfRange { index: 0, len: 2 });

    let err = table.move_list_item(&path("main.Z2K2.Z8K1.2"), 1).unwrap_err();
    assert_eq!(err, MutationError::IndexOutOfRange { index: 3, len: 2 });

    assert_eq!(table, before);
}

#[test]
fn test_push_items() {
    let mut table = table();
    let values = vec![
        canonical_to_hybrid(&json!({ "Z1K1": "Z14", "Z14K1": "Z10001" })),
        canonical_to_hybrid(&json!("Z10002")),
    ];

    let ids = table.push_items(&path("main.Z2K2.Z8K4"), &values).unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(
        canonical(&table)["Z2K2"]["Z8K4"],
        json!(["Z14", { "Z1K1": "Z14", "Z14K1": "Z10001" }, "Z10002"])
    );
}

#[test]
fn test_set_value() {
    let mut table = table();
    table
        .set_value(&path("main.Z2K2.Z8K2"), "Z40".to_string())
        .unwrap();
    assert_eq!(canonical(&table)["Z2K2"]["Z8K2"], json!("Z40"));

    let err = table
        .set_value(&path("main.Z2K2.Z8K1"), "Z40".to_string())
        .unwrap_err();
    assert!(matches!(err, MutationError::NotATerminal(_)));
}

#[test]
fn test_replace_subtree_keeps_row() {
    let mut table = table();
    let id = table.resolve_id(&path("main.Z2K2.Z8K2")).unwrap();

    let replaced = table
        .replace_subtree(
            &path("main.Z2K2.Z8K2"),
            &canonical_to_hybrid(&json!({ "Z1K1": "Z7", "Z7K1": "Z881", "Z881K1": "Z6" })),
        )
        .unwrap();

    assert_eq!(replaced, id);
    assert_eq!(
        canonical(&table)["Z2K2"]["Z8K2"],
        json!({ "Z1K1": "Z7", "Z7K1": "Z881", "Z881K1": "Z6" })
    );
}

#[test]
fn test_change_type_in_place() {
    let mut table = table();
    let options = ChangeTypeOptions {
        init: InitValues {
            function: Some("Z801".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    table
        .change_type(
            &path("main.Z2K2.Z8K2"),
            &ZType::FunctionCall,
            &options,
            &TypeCatalog::new(),
        )
        .unwrap();

    assert_eq!(
        canonical(&table)["Z2K2"]["Z8K2"],
        json!({ "Z1K1": "Z7", "Z7K1": "Z801" })
    );
}

#[test]
fn test_change_type_append_mints_argument_key() {
    let mut table = table();
    let options = ChangeTypeOptions {
        append: true,
        init: InitValues {
            value: Some("Z6".to_string()),
            ..Default::default()
        },
    };

    table
        .change_type(
            &path("main.Z2K2.Z8K1"),
            &ZType::ArgumentDeclaration,
            &options,
            &TypeCatalog::new(),
        )
        .unwrap();

    let args = canonical(&table)["Z2K2"]["Z8K1"].clone();
    assert_eq!(args.as_array().unwrap().len(), 4);
    assert_eq!(args[3]["Z17K1"], json!("Z6"));
    assert_eq!(args[3]["Z17K2"], json!({ "Z1K1": "Z6", "Z6K1": "Z10001K3" }));
}

#[test]
fn test_change_type_append_needs_list() {
    let mut table = table();
    let options = ChangeTypeOptions {
        append: true,
        ..Default::default()
    };
    let err = table
        .change_type(&path("main.Z2K2.Z8K2"), &ZType::String, &options, &TypeCatalog::new())
        .unwrap_err();
    assert!(matches!(err, MutationError::NotAList(_)));
}

#[test]
fn test_validate_has_no_effect() {
    let table = table();
    let before = table.clone();

    let ok = Mutation::MoveListItem {
        key_path: path("main.Z2K2.Z8K1.1"),
        offset: 1,
    };
    assert!(ok.validate(&table).is_ok());

    let bad = Mutation::DeleteListItems {
        list_path: path("main.Z2K2.Z8K1"),
        indexes: vec![5],
    };
    assert!(bad.validate(&table).is_err());
    assert_eq!(table, before);
}

#[test]
fn test_mutation_from_json() {
    let mutation: Mutation = serde_json::from_value(json!({
        "ChangeType": {
            "key_path": "main.Z2K2.Z8K2",
            "new_type": "Z11",
            "options": { "init": { "value": "hello", "language": "Z1003" } }
        }
    }))
    .unwrap();

    let mut table = table();
    mutation.apply(&mut table).unwrap();

    assert_eq!(
        canonical(&table)["Z2K2"]["Z8K2"],
        json!({ "Z1K1": "Z11", "Z11K1": "Z1003", "Z11K2": "hello" })
    );
}
