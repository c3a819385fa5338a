//! Typed argument values and their wire encoding

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A typed action argument or result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Text sent on the wire, before XML escaping. Booleans travel as `1`/`0`.
    pub fn to_wire(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(true) => "1".to_string(),
            Value::Boolean(false) => "0".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

macro_rules! integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

integer_from!(i8, i16, i32, i64, u8, u16, u32);

/// The value space of a state variable, derived from its UPnP `dataType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Integer,
    Boolean,
}

impl DataType {
    /// Map a UPnP data type name. Types without a dedicated representation
    /// (`dateTime`, `uuid`, ...) are kept as strings, and so is `ui8`, whose
    /// range exceeds `i64`.
    pub fn from_upnp(name: &str) -> Self {
        match name.trim() {
            "ui1" | "ui2" | "ui4" | "i1" | "i2" | "i4" | "i8" | "int" => DataType::Integer,
            "boolean" => DataType::Boolean,
            _ => DataType::String,
        }
    }

    /// Decode a value received from the device.
    ///
    /// Returns `None` when the text does not belong to this type. Booleans
    /// accept only `0` and `1`.
    pub fn decode(&self, raw: &str) -> Option<Value> {
        match self {
            DataType::String => Some(Value::String(raw.to_string())),
            DataType::Integer => raw.trim().parse::<i64>().ok().map(Value::Integer),
            DataType::Boolean => match raw.trim() {
                "1" => Some(Value::Boolean(true)),
                "0" => Some(Value::Boolean(false)),
                _ => None,
            },
        }
    }

    /// Whether `value` can be sent for an argument of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (DataType::String, _) => true,
            (DataType::Integer, Value::Integer(_)) => true,
            (DataType::Integer, Value::String(s)) => s.trim().parse::<i64>().is_ok(),
            (DataType::Boolean, Value::Boolean(_)) => true,
            (DataType::Boolean, Value::Integer(i)) => *i == 0 || *i == 1,
            (DataType::Boolean, Value::String(s)) => matches!(s.trim(), "0" | "1"),
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::String => f.write_str("string"),
            DataType::Integer => f.write_str("integer"),
            DataType::Boolean => f.write_str("boolean"),
        }
    }
}

/// Named input arguments of an action call
///
/// An argument set is strict by default: names the action does not declare
/// are rejected. Lenient sets silently drop them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: BTreeMap<String, Value>,
    lenient: bool,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    fn into_lenient(mut self) -> Self {
        self.lenient = true;
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Arguments::new();
        for (name, value) in iter {
            arguments.insert(name, value);
        }
        arguments
    }
}

/// Arguments of a `call_action`: an explicit argument map and keyword
/// arguments.
///
/// The keywords are only used when the explicit map is empty, and unknown
/// keywords are ignored.
///
/// ```
/// use fritz_api::{Arguments, CallArguments, Value};
///
/// let call = CallArguments::new().keyword("NewIndex", 3);
/// let arguments = call.resolve();
/// assert_eq!(arguments.get("NewIndex"), Some(&Value::Integer(3)));
///
/// let call = CallArguments::from(Arguments::new().with("NewIndex", 1)).keyword("NewIndex", 3);
/// assert_eq!(call.resolve().get("NewIndex"), Some(&Value::Integer(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallArguments {
    arguments: Arguments,
    keywords: Arguments,
}

impl CallArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name, value);
        self
    }

    /// The argument set handed to the dispatcher
    pub fn resolve(self) -> Arguments {
        if self.arguments.is_empty() {
            self.keywords.into_lenient()
        } else {
            self.arguments
        }
    }
}

impl From<Arguments> for CallArguments {
    fn from(arguments: Arguments) -> Self {
        CallArguments::new().arguments(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ui1", DataType::Integer)]
    #[case("ui4", DataType::Integer)]
    #[case("i4", DataType::Integer)]
    #[case("boolean", DataType::Boolean)]
    #[case("string", DataType::String)]
    #[case("ui8", DataType::String)]
    #[case("dateTime", DataType::String)]
    #[case("uuid", DataType::String)]
    fn test_data_type_mapping(#[case] upnp: &str, #[case] expected: DataType) {
        assert_eq!(DataType::from_upnp(upnp), expected);
    }

    #[test]
    fn test_boolean_decoding() {
        assert_eq!(DataType::Boolean.decode("1"), Some(Value::Boolean(true)));
        assert_eq!(DataType::Boolean.decode("0"), Some(Value::Boolean(false)));
        assert_eq!(DataType::Boolean.decode("true"), None);
        assert_eq!(DataType::Boolean.decode("2"), None);
        assert_eq!(DataType::Boolean.decode(""), None);
    }

    #[test]
    fn test_ui8_keeps_full_range() {
        let counter = DataType::from_upnp("ui8").decode("18446744073709551615");
        assert_eq!(counter, Some(Value::String("18446744073709551615".to_string())));
    }

    #[test]
    fn test_integer_decoding() {
        assert_eq!(DataType::Integer.decode("86400"), Some(Value::Integer(86400)));
        assert_eq!(DataType::Integer.decode("-1"), Some(Value::Integer(-1)));
        assert_eq!(DataType::Integer.decode("abc"), None);
    }

    #[test]
    fn test_string_decoding_is_verbatim() {
        assert_eq!(
            DataType::String.decode(" 192.168.178.20 "),
            Some(Value::String(" 192.168.178.20 ".to_string()))
        );
    }

    #[test]
    fn test_wire_encoding() {
        assert_eq!(Value::from(true).to_wire(), "1");
        assert_eq!(Value::from(false).to_wire(), "0");
        assert_eq!(Value::from(42u16).to_wire(), "42");
        assert_eq!(Value::from("WLAN").to_wire(), "WLAN");
    }

    #[test]
    fn test_accepts() {
        assert!(DataType::Integer.accepts(&Value::from(3)));
        assert!(DataType::Integer.accepts(&Value::from("3")));
        assert!(!DataType::Integer.accepts(&Value::from("three")));
        assert!(!DataType::Integer.accepts(&Value::from(true)));
        assert!(DataType::Boolean.accepts(&Value::from(1)));
        assert!(!DataType::Boolean.accepts(&Value::from(2)));
        assert!(DataType::String.accepts(&Value::from(false)));
    }

    #[test]
    fn test_keywords_used_when_arguments_empty() {
        let arguments = CallArguments::new()
            .arguments(Arguments::new())
            .keyword("NewIndex", 3)
            .resolve();

        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments.get("NewIndex"), Some(&Value::Integer(3)));
        assert!(arguments.is_lenient());
    }

    #[test]
    fn test_keywords_ignored_when_arguments_given() {
        let arguments = CallArguments::from(Arguments::new().with("NewIndex", 1))
            .keyword("NewOther", 3)
            .resolve();

        assert_eq!(arguments.names().collect::<Vec<_>>(), vec!["NewIndex"]);
        assert!(!arguments.is_lenient());
    }

    #[test]
    fn test_arguments_from_iter() {
        let arguments: Arguments = vec![("NewEnable", true)].into_iter().collect();
        assert_eq!(arguments.get("NewEnable"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::from("a"),
            Value::from(1),
            Value::from(true),
        ])
        .unwrap();
        assert_eq!(json, r#"["a",1,true]"#);
    }
}
