//! Mapping from the JSON data tree onto template engine values.
//!
//! Top-level fields are looked up with [`get_property`] when they are bound as
//! attributes. Nested objects stay wrapped in [`JsonObject`], which the engine
//! calls back into for property access, so the same rules apply at any depth:
//! `null` is an absent value and arrays become engine sequences.

use std::fmt;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use serde_json::{Map, Value as JsonValue};

/// The requested property does not exist, or no property name was given
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no such property '{}'", name.as_deref().unwrap_or("<none>"))]
pub struct NoSuchProperty {
    pub name: Option<String>,
}

/// Look up `property` in `object` and convert the result for the engine
pub fn get_property(
    object: &Map<String, JsonValue>,
    property: Option<&str>,
) -> Result<Value, NoSuchProperty> {
    let name = property.ok_or(NoSuchProperty { name: None })?;
    object
        .get(name)
        .map(convert)
        .ok_or_else(|| NoSuchProperty {
            name: Some(name.to_string()),
        })
}

/// Convert a JSON value into an engine value
pub fn convert(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::UNDEFINED,
        JsonValue::Bool(b) => Value::from(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                Value::from(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::from(s.as_str()),
        JsonValue::Array(items) => Value::from(items.iter().map(convert).collect::<Vec<_>>()),
        JsonValue::Object(map) => Value::from_object(JsonObject::new(map.clone())),
    }
}

/// A JSON object exposed to templates
#[derive(Debug, Clone)]
pub struct JsonObject {
    fields: Map<String, JsonValue>,
}

impl JsonObject {
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        Self { fields }
    }
}

impl Object for JsonObject {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        get_property(&self.fields, key.as_str()).ok()
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Values(self.fields.keys().map(|k| Value::from(k.as_str())).collect())
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
