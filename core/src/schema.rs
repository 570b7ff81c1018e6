//! Dataset schema: the fixed, ordered attribute set shared by every tuple.

use crate::{AttrId, DatasetError, DatasetResult, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Declared type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttrType {
    Int,
    Float,
    String,
    Date,
}

impl AttrType {
    /// The type a non-null value belongs to.
    pub fn of(value: &Value) -> Option<AttrType> {
        match value {
            Value::Null => None,
            Value::Int(_) => Some(AttrType::Int),
            Value::Float(_) => Some(AttrType::Float),
            Value::String(_) => Some(AttrType::String),
            Value::Date(_) => Some(AttrType::Date),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttrType::Int => "Int",
            AttrType::Float => "Float",
            AttrType::String => "String",
            AttrType::Date => "Date",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDef {
    pub name: String,
    pub attr_type: AttrType,
}

impl AttrDef {
    pub fn new(name: impl AsRef<str>, attr_type: AttrType) -> Self {
        Self {
            name: canonical_name(name.as_ref()),
            attr_type,
        }
    }
}

/// Canonical attribute name: surrounding whitespace trimmed, inner
/// whitespace runs replaced by a single underscore. Constraint text and
/// dataset headers both go through this so they agree.
pub fn canonical_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Ordered attribute set with O(1) name lookup.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attrs: Vec<AttrDef>,
    by_name: HashMap<String, AttrId>,
}

impl Schema {
    /// Build a schema, rejecting names that collide after canonicalization.
    pub fn new(attrs: Vec<AttrDef>) -> DatasetResult<Self> {
        let mut by_name = HashMap::with_capacity(attrs.len());
        for (i, attr) in attrs.iter().enumerate() {
            if by_name.insert(attr.name.clone(), AttrId::new(i)).is_some() {
                return Err(DatasetError::duplicate_attribute(&attr.name));
            }
        }
        Ok(Self { attrs, by_name })
    }

    /// Look up an attribute by (canonical) name.
    pub fn attr_id(&self, name: &str) -> Option<AttrId> {
        self.by_name.get(name).copied()
    }

    pub fn attr(&self, id: AttrId) -> Option<&AttrDef> {
        self.attrs.get(id.index())
    }

    pub fn attrs(&self) -> &[AttrDef] {
        &self.attrs
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}
