//! Current user record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use subtuber_core::StorageError;

/// Application-defined user record.
///
/// The backend decides the fields; the session only cares whether a user is
/// present, so the record is kept as a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, Value>);

impl User {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First of `name`, `username`, `email` that is a string
    pub fn display_name(&self) -> Option<&str> {
        ["name", "username", "email"]
            .iter()
            .find_map(|key| self.0.get(*key).and_then(Value::as_str))
    }

    /// Parse a persisted record; JSON `null` means no user
    pub fn from_json(raw: &str) -> Result<Option<Self>, StorageError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(Self(map))),
            other => Err(StorageError::corrupt(format!(
                "expected a user object, found {other}"
            ))),
        }
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for User {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_variants() {
        let user = User::from_json(r#"{"name":"alice"}"#).unwrap().unwrap();
        assert_eq!(user.get("name"), Some(&json!("alice")));

        assert_eq!(User::from_json("null").unwrap(), None);
        assert!(User::from_json("42").is_err());
        assert!(User::from_json("{broken").is_err());
    }

    #[test]
    fn test_json_is_stable() {
        let user = User::new().with("name", "alice").with("id", 7);
        let parsed = User::from_json(&user.to_json()).unwrap();
        assert_eq!(parsed, Some(user));
    }

    #[test]
    fn test_display_name_preference() {
        let user = User::new().with("email", "a@example.com").with("username", "al");
        assert_eq!(user.display_name(), Some("al"));
        assert_eq!(User::new().display_name(), None);
    }
}
