use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped record returned by an upstream provider.
///
/// Provider payloads use different field names for the same attribute and
/// nest some of them (`location.name`, `company.website`). Lookups go through
/// the helpers below so every precedence rule is a plain list of paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; anything but an object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Collect the object entries of a JSON array, skipping everything else
    pub fn list_from_value(value: Option<&Value>) -> Vec<RawRecord> {
        match value {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| RawRecord::from_value(item.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dotted path (`"location.name"`) through nested objects
    pub fn path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Nested object at `path` as its own record
    pub fn sub_record(&self, path: &str) -> Option<RawRecord> {
        self.path(path)
            .and_then(|value| RawRecord::from_value(value.clone()))
    }

    /// First path whose value cleans to a non-empty string
    pub fn first_clean(&self, paths: &[&str]) -> Option<String> {
        paths
            .iter()
            .find_map(|path| self.path(path).and_then(clean_value))
    }

    /// Array at `path`, or an empty slice
    pub fn array(&self, path: &str) -> &[Value] {
        self.path(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The raw `email` field, as used for de-duplication.
    ///
    /// No trimming or case folding is applied; only a non-empty string counts.
    pub fn email(&self) -> Option<&str> {
        self.0
            .get("email")
            .and_then(Value::as_str)
            .filter(|email| !email.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Clean a scalar upstream value.
///
/// Null and booleans become `None`, strings are trimmed and dropped when
/// blank, numbers are stringified. Arrays and objects are not scalars.
pub fn clean_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}
