//! Field maps compared by the reconciler

use serde::Serialize;
use serde_json::{Map, Value};

/// Caller-supplied target configuration of one remote resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredState(Map<String, Value>);

/// Remote resource as last fetched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentState(Map<String, Value>);

macro_rules! field_map {
    ($name:ident) => {
        impl $name {
            /// Empty field map
            pub fn new() -> Self {
                Self(Map::new())
            }

            /// Build from any value that serializes to a JSON object
            pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
                match serde_json::to_value(value)? {
                    Value::Object(map) => Ok(Self(map)),
                    other => Err(serde::ser::Error::custom(format!(
                        "expected an object, got {}",
                        other
                    ))),
                }
            }

            /// Add or replace a field
            pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
                self.0.insert(field.into(), value.into());
                self
            }

            /// Value of `field`, if present
            pub fn get(&self, field: &str) -> Option<&Value> {
                self.0.get(field)
            }

            /// All fields, keyed by wire name
            pub fn fields(&self) -> &Map<String, Value> {
                &self.0
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(map: Map<String, Value>) -> Self {
                Self(map)
            }
        }
    };
}

field_map!(DesiredState);
field_map!(CurrentState);
