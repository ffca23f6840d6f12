//! Built-in ZObject types.
//!
//! Type tags travel as strings (`"Z6"`, `"Z881"`, ...). `ZType` gives the
//! built-ins a closed set of variants so dispatch on them is checked, and
//! keeps every other id in [`ZType::Custom`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommonError;
use crate::result::CommonResult;
use crate::reference::is_reference;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ZType {
    /// Z1, the generic object
    Object,
    /// Z2
    Persistent,
    /// Z3
    Key,
    /// Z4
    Type,
    /// Z5
    Error,
    /// Z6
    String,
    /// Z7
    FunctionCall,
    /// Z8
    Function,
    /// Z9
    Reference,
    /// Z11
    Monolingual,
    /// Z12
    Multilingual,
    /// Z14
    Implementation,
    /// Z17
    ArgumentDeclaration,
    /// Z18
    ArgumentReference,
    /// Z20
    Tester,
    /// Z31
    MonolingualStringset,
    /// Z32
    MultilingualStringset,
    /// Z40
    Boolean,
    /// Z60
    NaturalLanguage,
    /// Z881
    TypedList,
    /// Z882
    TypedPair,
    /// Z883
    TypedMap,
    /// Any other type id
    Custom(String),
}

const BUILTINS: &[(&str, ZType)] = &[
    ("Z1", ZType::Object),
    ("Z2", ZType::Persistent),
    ("Z3", ZType::Key),
    ("Z4", ZType::Type),
    ("Z5", ZType::Error),
    ("Z6", ZType::String),
    ("Z7", ZType::FunctionCall),
    ("Z8", ZType::Function),
    ("Z9", ZType::Reference),
    ("Z11", ZType::Monolingual),
    ("Z12", ZType::Multilingual),
    ("Z14", ZType::Implementation),
    ("Z17", ZType::ArgumentDeclaration),
    ("Z18", ZType::ArgumentReference),
    ("Z20", ZType::Tester),
    ("Z31", ZType::MonolingualStringset),
    ("Z32", ZType::MultilingualStringset),
    ("Z40", ZType::Boolean),
    ("Z60", ZType::NaturalLanguage),
    ("Z881", ZType::TypedList),
    ("Z882", ZType::TypedPair),
    ("Z883", ZType::TypedMap),
];

impl ZType {
    /// Map a type id to its variant. Unknown ids become `Custom`.
    pub fn from_zid(zid: &str) -> Self {
        BUILTINS
            .iter()
            .find(|(id, _)| *id == zid)
            .map(|(_, ty)| ty.clone())
            .unwrap_or_else(|| ZType::Custom(zid.to_string()))
    }

    /// Like `from_zid`, but rejects anything that is not an id
    pub fn parse(zid: &str) -> CommonResult<Self> {
        if is_reference(zid) {
            Ok(ZType::from_zid(zid))
        } else {
            Err(CommonError::InvalidZid(zid.to_string()))
        }
    }

    pub fn zid(&self) -> &str {
        match self {
            ZType::Custom(zid) => zid,
            builtin => BUILTINS
                .iter()
                .find(|(_, ty)| ty == builtin)
                .map(|(id, _)| *id)
                .unwrap_or_default(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, ZType::Custom(_))
    }

    /// String and reference records are the terminals of the data model
    pub fn is_terminal(&self) -> bool {
        matches!(self, ZType::String | ZType::Reference)
    }
}

impl fmt::Display for ZType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.zid())
    }
}

impl From<ZType> for String {
    fn from(ty: ZType) -> Self {
        ty.zid().to_string()
    }
}

impl TryFrom<String> for ZType {
    type Error = CommonError;

    fn try_from(zid: String) -> Result<Self, CommonError> {
        ZType::parse(&zid)
    }
}
