//! Parameter values bound to template placeholders.
//!
//! [`Value`] is a closed set of shapes: scalars, ordered lists and keyed maps.
//! Placeholders dispatch on the variant to decide how a value is rendered.
//!
//! # Example
//! ```ignore
//! use sqltmpl::{Value, value};
//!
//! let params: Vec<Value> = vec![
//!     "Jack".into(),
//!     vec!["name", "email"].into(),
//!     value::map([("name", Value::from("Jack")), ("email", Value::Null)]),
//! ];
//! ```

/// A single placeholder parameter.
///
/// Equality is strict: the variants must match before payloads are compared,
/// so `Int(1) != Float(1.0)` and `Null != Bool(false)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Sequential list, rendered as `v1, v2, ...`.
    List(Vec<Value>),
    /// Keyed mapping in insertion order, rendered as `` `k` = v, ... ``.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value is a scalar (renderable by the generic placeholder).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    /// `true` for lists, and for maps whose keys are exactly `"0".."n-1"` in order.
    pub fn is_list_like(&self) -> bool {
        match self {
            Value::List(_) => true,
            Value::Map(entries) => entries
                .iter()
                .enumerate()
                .all(|(i, (key, _))| *key == i.to_string()),
            _ => false,
        }
    }

    /// Items of a list-like value, in order.
    pub(crate) fn list_items(&self) -> Option<Vec<&Value>> {
        if !self.is_list_like() {
            return None;
        }
        match self {
            Value::List(items) => Some(items.iter().collect()),
            Value::Map(entries) => Some(entries.iter().map(|(_, v)| v).collect()),
            _ => None,
        }
    }
}

/// Build a [`Value::Map`] from key/value pairs, keeping their order.
pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Value
where
    K: Into<String>,
    V: Into<Value>,
{
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
