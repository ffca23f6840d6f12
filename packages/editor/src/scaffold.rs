//! # Default values
//!
//! Builds the Hybrid value a field gets when its type is changed. Built-in
//! types have fixed shapes; other types are scaffolded from their fetched
//! definitions when the host has put them in a [`TypeCatalog`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use zobject_common::keys::*;
use zobject_common::{global_key, ZType};
use zobject_transcoder::list::{list_item_type, reference_id};
use zobject_transcoder::{canonicalize_value, wrap_terminal};

/// Custom types nest at most this deep before fields are left untyped
const MAX_DEPTH: usize = 3;

/// Optional seeds for the scaffolded value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitValues {
    /// Text of a string, id of a reference, type of an argument, or the
    /// inner type of a persistent object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Function of a call, implementation or tester
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Language of monolingual text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Element type of a list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTypeOptions {
    /// Append to the list at the path instead of replacing it
    #[serde(default)]
    pub append: bool,

    #[serde(default)]
    pub init: InitValues,
}

/// Type definitions fetched by the host, by type id
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, Value>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a definition in any encoding. A persistent object wrapping the
    /// type is unwrapped.
    pub fn insert(&mut self, zid: impl Into<String>, definition: &Value) {
        let canonical = canonicalize_value(definition);
        let definition = match canonical.get(PERSISTENT_VALUE) {
            Some(inner) => inner.clone(),
            None => canonical,
        };
        self.types.insert(zid.into(), definition);
    }

    pub fn get(&self, zid: &str) -> Option<&Value> {
        self.types.get(zid)
    }

    pub fn contains(&self, zid: &str) -> bool {
        self.types.contains_key(zid)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// `(key id, key type)` pairs declared by a type, in order
    pub fn keys_of(&self, zid: &str) -> Option<Vec<(String, Value)>> {
        let keys = self.get(zid)?.get(TYPE_KEYS)?.as_array()?;
        Some(
            keys.iter()
                .skip(1)
                .filter_map(|key| {
                    let id = key.get(KEY_ID)?.as_str()?.to_string();
                    let ty = key.get(KEY_TYPE).cloned().unwrap_or_else(|| "Z1".into());
                    Some((id, ty))
                })
                .collect(),
        )
    }
}

/// What the scaffolder needs to know about the object being edited
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldContext {
    /// Id of the object new keys belong to
    pub owner_zid: String,

    /// Number to use for the next minted `<zid>K<n>` key
    pub next_key: u32,
}

pub struct Scaffolder<'a> {
    catalog: &'a TypeCatalog,
    context: ScaffoldContext,
}

impl<'a> Scaffolder<'a> {
    pub fn new(catalog: &'a TypeCatalog, context: ScaffoldContext) -> Self {
        Self { catalog, context }
    }

    /// Default Hybrid value of `ty`
    pub fn scaffold(&self, ty: &ZType, init: &InitValues) -> Value {
        self.scaffold_at(ty, init, 0)
    }

    fn scaffold_at(&self, ty: &ZType, init: &InitValues, depth: usize) -> Value {
        let value = init.value.as_deref().unwrap_or_default();
        let function = init.function.as_deref();
        let language = init.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);

        match ty {
            ZType::String => string(value),
            ZType::Reference => reference(value),
            ZType::Object => record("", vec![]),
            ZType::Boolean => record("Z40", vec![(BOOLEAN_VALUE, reference(value))]),
            ZType::FunctionCall => record(
                "Z7",
                vec![(FUNCTION_CALL_FUNCTION, reference(function.unwrap_or_default()))],
            ),
            ZType::ArgumentReference => {
                record("Z18", vec![(ARGUMENT_REFERENCE_KEY, string(value))])
            }
            ZType::Monolingual => record(
                "Z11",
                vec![
                    (MONOLINGUAL_LANGUAGE, reference(language)),
                    (MONOLINGUAL_TEXT, string(value)),
                ],
            ),
            ZType::Multilingual => multilingual(),
            ZType::MonolingualStringset => record(
                "Z31",
                vec![
                    (MONOLINGUAL_STRINGSET_LANGUAGE, reference(language)),
                    (MONOLINGUAL_STRINGSET_VALUES, list("Z6")),
                ],
            ),
            ZType::MultilingualStringset => {
                record("Z32", vec![(MULTILINGUAL_STRINGSETS, list("Z31"))])
            }
            ZType::NaturalLanguage => record("Z60", vec![("Z60K1", string(value))]),
            ZType::Key => record(
                "Z3",
                vec![
                    (KEY_TYPE, reference(value)),
                    (KEY_ID, string(&self.next_key())),
                    ("Z3K3", multilingual()),
                ],
            ),
            ZType::ArgumentDeclaration => record(
                "Z17",
                vec![
                    (ARGUMENT_TYPE, reference(value)),
                    (ARGUMENT_KEY, string(&self.next_key())),
                    (ARGUMENT_LABEL, multilingual()),
                ],
            ),
            ZType::Type => record(
                "Z4",
                vec![
                    (TYPE_IDENTITY, reference(UNSAVED_PLACEHOLDER)),
                    (TYPE_KEYS, list("Z3")),
                    ("Z4K3", reference("")),
                ],
            ),
            ZType::Error => record(
                "Z5",
                vec![("Z5K1", reference(value)), ("Z5K2", record("", vec![]))],
            ),
            ZType::Function => record(
                "Z8",
                vec![
                    (FUNCTION_ARGUMENTS, list("Z17")),
                    (FUNCTION_OUTPUT, reference(value)),
                    (FUNCTION_TESTERS, list("Z20")),
                    (FUNCTION_IMPLEMENTATIONS, list("Z14")),
                    (FUNCTION_IDENTITY, reference(UNSAVED_PLACEHOLDER)),
                ],
            ),
            ZType::Implementation => record(
                "Z14",
                vec![(
                    IMPLEMENTATION_FUNCTION,
                    reference(function.unwrap_or(UNSAVED_PLACEHOLDER)),
                )],
            ),
            ZType::Tester => {
                let call = self.scaffold_at(&ZType::FunctionCall, &InitValues::default(), depth + 1);
                record(
                    "Z20",
                    vec![
                        (TESTER_FUNCTION, reference(function.unwrap_or(UNSAVED_PLACEHOLDER))),
                        (TESTER_CALL, call.clone()),
                        (TESTER_VALIDATION, call),
                    ],
                )
            }
            ZType::Persistent => {
                let inner = match init.value.as_deref() {
                    Some(zid) if depth < MAX_DEPTH => {
                        self.scaffold_at(&ZType::from_zid(zid), &InitValues::default(), depth + 1)
                    }
                    _ => record("", vec![]),
                };
                record(
                    "Z2",
                    vec![
                        (PERSISTENT_ID, string(UNSAVED_PLACEHOLDER)),
                        (PERSISTENT_VALUE, inner),
                        (PERSISTENT_LABEL, multilingual()),
                        (PERSISTENT_ALIASES, record("Z32", vec![(MULTILINGUAL_STRINGSETS, list("Z31"))])),
                        (PERSISTENT_DESCRIPTION, multilingual()),
                    ],
                )
            }
            ZType::TypedList => list(init.item_type.as_deref().unwrap_or("Z1")),
            ZType::TypedPair | ZType::TypedMap => record(ty.zid(), vec![]),
            ZType::Custom(zid) => self.scaffold_custom(zid, depth),
        }
    }

    /// One field per declared key, each scaffolded from its key type.
    fn scaffold_custom(&self, zid: &str, depth: usize) -> Value {
        let Some(keys) = self.catalog.keys_of(zid) else {
            return record(zid, vec![]);
        };

        let mut fields = Map::new();
        fields.insert(OBJECT_TYPE.to_string(), reference(zid));
        for (key, key_type) in keys {
            let value = if let Some(item_type) = list_item_type(&key_type) {
                let item = reference_id(&item_type).unwrap_or("Z1");
                list(item)
            } else {
                match reference_id(&key_type) {
                    Some(type_id) if depth < MAX_DEPTH => self.scaffold_at(
                        &ZType::from_zid(type_id),
                        &InitValues::default(),
                        depth + 1,
                    ),
                    Some(type_id) => record(type_id, vec![]),
                    None => record("", vec![]),
                }
            };
            fields.insert(key, value);
        }
        Value::Object(fields)
    }

    fn next_key(&self) -> String {
        global_key(&self.context.owner_zid, self.context.next_key)
    }
}

fn string(s: &str) -> Value {
    let mut record = Map::new();
    record.insert(OBJECT_TYPE.to_string(), "Z6".into());
    record.insert(STRING_VALUE.to_string(), s.into());
    Value::Object(record)
}

fn reference(zid: &str) -> Value {
    let mut record = Map::new();
    record.insert(OBJECT_TYPE.to_string(), "Z9".into());
    record.insert(REFERENCE_ID.to_string(), zid.into());
    Value::Object(record)
}

fn record(ty: &str, fields: Vec<(&str, Value)>) -> Value {
    let mut map = Map::new();
    map.insert(OBJECT_TYPE.to_string(), reference(ty));
    for (key, value) in fields {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

fn list(item_type: &str) -> Value {
    Value::Array(vec![wrap_terminal(item_type)])
}

fn multilingual() -> Value {
    record("Z12", vec![(MULTILINGUAL_TEXTS, list("Z11"))])
}
