//! Well-known keys and ids of the built-in ZObject types.

/// Type tag carried by every composite
pub const OBJECT_TYPE: &str = "Z1K1";

/// Payload of a string record
pub const STRING_VALUE: &str = "Z6K1";
/// Payload of a reference record
pub const REFERENCE_ID: &str = "Z9K1";

/// Function called by a function call
pub const FUNCTION_CALL_FUNCTION: &str = "Z7K1";
/// Element type argument of the typed list constructor
pub const TYPED_LIST_ITEM_TYPE: &str = "Z881K1";
/// Identity of a literal type
pub const TYPE_IDENTITY: &str = "Z4K1";
/// Keys of a literal type
pub const TYPE_KEYS: &str = "Z4K2";
/// Value type of a key declaration
pub const KEY_TYPE: &str = "Z3K1";
/// Id of a key declaration
pub const KEY_ID: &str = "Z3K2";

/// Head of a cons-cell list
pub const LIST_HEAD: &str = "K1";
/// Tail of a cons-cell list
pub const LIST_TAIL: &str = "K2";

/// Persistent object id, value and labels
pub const PERSISTENT_ID: &str = "Z2K1";
pub const PERSISTENT_VALUE: &str = "Z2K2";
pub const PERSISTENT_LABEL: &str = "Z2K3";
pub const PERSISTENT_ALIASES: &str = "Z2K4";
pub const PERSISTENT_DESCRIPTION: &str = "Z2K5";

/// Function arguments, output type, testers, implementations, identity
pub const FUNCTION_ARGUMENTS: &str = "Z8K1";
pub const FUNCTION_OUTPUT: &str = "Z8K2";
pub const FUNCTION_TESTERS: &str = "Z8K3";
pub const FUNCTION_IMPLEMENTATIONS: &str = "Z8K4";
pub const FUNCTION_IDENTITY: &str = "Z8K5";

/// Argument declaration type, key and labels
pub const ARGUMENT_TYPE: &str = "Z17K1";
pub const ARGUMENT_KEY: &str = "Z17K2";
pub const ARGUMENT_LABEL: &str = "Z17K3";

pub const ARGUMENT_REFERENCE_KEY: &str = "Z18K1";

pub const IMPLEMENTATION_FUNCTION: &str = "Z14K1";
pub const IMPLEMENTATION_COMPOSITION: &str = "Z14K2";

pub const TESTER_FUNCTION: &str = "Z20K1";
pub const TESTER_CALL: &str = "Z20K2";
pub const TESTER_VALIDATION: &str = "Z20K3";

pub const MONOLINGUAL_LANGUAGE: &str = "Z11K1";
pub const MONOLINGUAL_TEXT: &str = "Z11K2";
pub const MULTILINGUAL_TEXTS: &str = "Z12K1";
pub const MONOLINGUAL_STRINGSET_LANGUAGE: &str = "Z31K1";
pub const MONOLINGUAL_STRINGSET_VALUES: &str = "Z31K2";
pub const MULTILINGUAL_STRINGSETS: &str = "Z32K1";

pub const BOOLEAN_VALUE: &str = "Z40K1";

/// Id of an object that has not been persisted yet
pub const UNSAVED_PLACEHOLDER: &str = "Z0";

/// Default natural language (English)
pub const DEFAULT_LANGUAGE: &str = "Z1002";

