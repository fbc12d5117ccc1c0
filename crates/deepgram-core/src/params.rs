//! Query-string encoding for request options.
//!
//! Options are flattened one level deep: scalars become a single
//! `key=value` pair, arrays become one pair per element under the same key,
//! and nested objects are sent as their JSON text. The assembled string is
//! lower-cased as a whole, percent escapes included (`%2F` is sent as
//! `%2f`). The API has always received parameters in that form, so the
//! behaviour is kept even where case would otherwise matter.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::{Number, Value};

use crate::{CoreError, Result};

/// Bytes left as-is in query values: ASCII alphanumerics plus `-_.!*()`.
///
/// Space is not in this set; [`form_encode`] maps it to `+` itself.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Value of a single option field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Absent value; the field is not sent.
    Null,
    /// A single value. Empty strings are not sent.
    Scalar(String),
    /// One pair per element. Elements are sent even when empty.
    List(Vec<String>),
}

impl ParamValue {
    /// Build a scalar from anything printable (numbers, flags, enums).
    pub fn scalar(value: impl fmt::Display) -> Self {
        Self::Scalar(value.to_string())
    }

    /// Whether the whole field is dropped before encoding.
    pub fn is_skipped(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Scalar(s) => s.is_empty(),
            Self::List(_) => false,
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Scalar(s),
            Value::Number(n) => Self::Scalar(number_text(&n)),
            Value::Array(items) => Self::List(items.into_iter().map(element_text).collect()),
            // bools and nested objects go out as JSON text
            other => Self::Scalar(other.to_string()),
        }
    }
}

fn element_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => number_text(&n),
        other => other.to_string(),
    }
}

/// Render a number the way `Display` renders the original field.
///
/// Integral floats lose their `.0`. serde widens `f32` to `f64`, so a value
/// that is exactly representable as `f32` is printed through `f32` to get
/// its shortest form (`0.1`, not `0.10000000149011612`).
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => {
            let narrow = f as f32;
            if f64::from(narrow) == f {
                narrow.to_string()
            } else {
                f.to_string()
            }
        }
        None => n.to_string(),
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    Self::scalar(value)
                }
            }
        )*
    };
}

scalar_from!(bool, i32, i64, u32, u64, f32, f64);

impl<T: Into<String>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A percent-encoded `key=value` pair, before lower-casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedParam<'a> {
    pub key: &'a str,
    pub value: String,
}

impl fmt::Display for EncodedParam<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered option fields destined for a query string.
///
/// Field order is kept as inserted; repeated names are neither merged nor
/// deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    fields: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Convert any serializable options value.
    ///
    /// The value must serialize to a map or to null (`None`, `()`); struct
    /// fields keep their declaration order.
    pub fn from_serialize<T: Serialize + ?Sized>(options: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(options)?)
    }

    /// Convert an already-built JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self {
                fields: map
                    .into_iter()
                    .map(|(name, value)| (name, ParamValue::from_json(value)))
                    .collect(),
            }),
            Value::Bool(_) => Err(CoreError::UnsupportedShape("bool")),
            Value::Number(_) => Err(CoreError::UnsupportedShape("number")),
            Value::String(_) => Err(CoreError::UnsupportedShape("string")),
            Value::Array(_) => Err(CoreError::UnsupportedShape("array")),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The pairs that will be sent, in emission order.
    pub fn encoded_pairs(&self) -> Vec<EncodedParam<'_>> {
        let mut pairs = Vec::new();
        for (key, value) in self.iter() {
            if value.is_skipped() {
                continue;
            }
            match value {
                ParamValue::List(items) => pairs.extend(items.iter().map(|item| EncodedParam {
                    key,
                    value: form_encode(item),
                })),
                ParamValue::Scalar(s) => pairs.push(EncodedParam {
                    key,
                    value: form_encode(s),
                }),
                ParamValue::Null => {}
            }
        }
        pairs
    }

    /// Render the query string (without a leading `?`).
    pub fn encode(&self) -> String {
        self.encoded_pairs()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("&")
            .to_lowercase()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Encode serializable options as a query string.
///
/// `None` (or any value serializing to null) yields an empty string.
pub fn encode_parameters<T: Serialize + ?Sized>(options: &T) -> Result<String> {
    Ok(QueryParams::from_serialize(options)?.encode())
}

/// Form-style percent-encoding: space becomes `+`.
fn form_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, chunk) in s.split(' ').enumerate() {
        if i > 0 {
            result.push('+');
        }
        result.extend(utf8_percent_encode(chunk, FORM_ENCODE_SET));
    }
    result
}
