//! Field selection specs and their compact wire syntax.
//!
//! The API accepts a `select` parameter listing the attributes to return:
//!
//! - siblings are comma separated: `id,name`
//! - a single nested attribute is dot qualified: `group.attr`
//! - several nested attributes are bracketed: `group[attr1,attr2]`
//! - nesting is arbitrary: `a[b[c,d],e.f]`
//!
//! [`SelectSpec`] models a selection as a tagged tree; [`stringify`] renders
//! it. The rendering is part of the wire contract and must stay byte-exact.
//!
//! ```rust
//! use flora_client::select::{stringify, SelectSpec};
//!
//! let spec = vec![
//!     SelectSpec::field("id"),
//!     SelectSpec::field("name"),
//!     SelectSpec::group("subGroup", [SelectSpec::field("attr1"), SelectSpec::field("attr2")]),
//!     SelectSpec::field("attr"),
//! ];
//! assert_eq!(stringify(&spec), "id,name,subGroup[attr1,attr2],attr");
//! ```

use std::fmt;

use serde_json::Value;

use crate::{Error, Result};

/// One entry of a field selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectSpec {
    /// Plain attribute, emitted literally.
    Field(String),
    /// Named group of nested entries: `name.child` for one child, `name[a,b]` otherwise.
    Group(String, Vec<SelectSpec>),
    /// Unnamed list whose entries are spliced into the parent without a prefix.
    Splice(Vec<SelectSpec>),
}

impl SelectSpec {
    pub fn field(name: impl Into<String>) -> Self {
        SelectSpec::Field(name.into())
    }

    pub fn group(name: impl Into<String>, children: impl IntoIterator<Item = SelectSpec>) -> Self {
        SelectSpec::Group(name.into(), children.into_iter().collect())
    }

    pub fn splice(children: impl IntoIterator<Item = SelectSpec>) -> Self {
        SelectSpec::Splice(children.into_iter().collect())
    }

    /// Convert the loose JSON form into a list of entries.
    ///
    /// Arrays hold strings (fields), nested arrays (spliced) and objects whose
    /// entries are `name -> string | array | object` groups. Object entries
    /// inside an array are merged into that array's list. Anything else fails
    /// with [`Error::InvalidInput`] naming the value.
    pub fn list_from_value(value: &Value) -> Result<Vec<SelectSpec>> {
        let mut items = Vec::new();
        match value {
            Value::Array(entries) => {
                for entry in entries {
                    match entry {
                        Value::String(s) => items.push(SelectSpec::Field(s.clone())),
                        Value::Array(_) => {
                            items.push(SelectSpec::Splice(Self::list_from_value(entry)?))
                        }
                        Value::Object(_) => items.extend(Self::list_from_value(entry)?),
                        other => return Err(not_stringifiable(other)),
                    }
                }
            }
            Value::Object(map) => {
                for (name, child) in map {
                    let children = match child {
                        Value::String(s) => vec![SelectSpec::Field(s.clone())],
                        Value::Array(_) | Value::Object(_) => Self::list_from_value(child)?,
                        other => return Err(not_stringifiable(other)),
                    };
                    items.push(SelectSpec::Group(name.clone(), children));
                }
            }
            other => return Err(not_stringifiable(other)),
        }
        Ok(items)
    }
}

impl fmt::Display for SelectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectSpec::Field(name) => f.write_str(name),
            SelectSpec::Group(name, children) if children.len() > 1 => {
                write!(f, "{}[{}]", name, stringify(children))
            }
            SelectSpec::Group(name, children) => write!(f, "{}.{}", name, stringify(children)),
            SelectSpec::Splice(children) => f.write_str(&stringify(children)),
        }
    }
}

/// Render a list of entries, comma separated.
pub fn stringify(spec: &[SelectSpec]) -> String {
    spec.iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the loose JSON form directly.
pub fn stringify_select(value: &Value) -> Result<String> {
    Ok(stringify(&SelectSpec::list_from_value(value)?))
}

fn not_stringifiable(value: &Value) -> Error {
    let shown = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Error::InvalidInput {
        message: format!(
            "Cannot handle given select specification. \"{}\" cannot be stringified",
            shown
        ),
    }
}

/// The `select` value of an operation: either already in wire syntax or a spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Select {
    Raw(String),
    Spec(Vec<SelectSpec>),
}

impl Select {
    /// Wire representation sent as the `select` parameter.
    pub fn to_param(&self) -> String {
        match self {
            Select::Raw(s) => s.clone(),
            Select::Spec(items) => stringify(items),
        }
    }

    /// Accept a JSON string verbatim, or convert an array/object spec.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Select::Raw(s.clone())),
            other => Ok(Select::Spec(SelectSpec::list_from_value(other)?)),
        }
    }
}

impl From<&str> for Select {
    fn from(s: &str) -> Self {
        Select::Raw(s.to_string())
    }
}

impl From<String> for Select {
    fn from(s: String) -> Self {
        Select::Raw(s)
    }
}

impl From<Vec<SelectSpec>> for Select {
    fn from(items: Vec<SelectSpec>) -> Self {
        Select::Spec(items)
    }
}
