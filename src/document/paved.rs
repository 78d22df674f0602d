use serde_json::Value;

use crate::document::fieldpath::{self, FieldPathError};
use crate::document::{DocumentReader, DocumentWriter};

/// JSON document addressed by field paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paved(Value);

impl Paved {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    pub fn get_value(&self, path: &str) -> Result<&Value, FieldPathError> {
        fieldpath::get_value(&self.0, path)
    }

    pub fn get_string(&self, path: &str) -> Result<&str, FieldPathError> {
        self.get_value(path)?
            .as_str()
            .ok_or_else(|| FieldPathError::wrong_type(path, "string"))
    }

    pub fn set_value(&mut self, path: &str, value: Value) -> Result<(), FieldPathError> {
        fieldpath::set_value(&mut self.0, path, value)
    }
}

impl From<Value> for Paved {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl DocumentReader for Paved {
    fn get_string_list(&self, path: &str) -> Result<Vec<String>, FieldPathError> {
        match self.get_value(path)? {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| FieldPathError::wrong_type(path, "array of strings"))
                })
                .collect(),
            _ => Err(FieldPathError::wrong_type(path, "array of strings")),
        }
    }
}

impl DocumentWriter for Paved {
    fn merge_string_list(&mut self, path: &str, values: Vec<String>) -> Result<(), FieldPathError> {
        self.set_value(path, Value::from(values))
    }
}
