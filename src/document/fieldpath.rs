use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldPathError {
    #[error("invalid field path {path}: {reason}")]
    Invalid { path: String, reason: &'static str },

    #[error("{path}: no such field")]
    NotFound { path: String },

    #[error("{path}: expected {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },
}

impl FieldPathError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FieldPathError::NotFound { .. })
    }

    pub(crate) fn wrong_type(path: &str, expected: &'static str) -> Self {
        FieldPathError::WrongType {
            path: path.to_owned(),
            expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

pub fn parse(path: &str) -> Result<Vec<Segment>, FieldPathError> {
    let invalid = |reason: &'static str| FieldPathError::Invalid {
        path: path.to_owned(),
        reason,
    };

    let mut segments = Vec::new();
    let mut field = String::new();
    // set right after a closing bracket; only '.', '[' or the end may follow
    let mut after_bracket = false;
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if field.is_empty() {
                    if !after_bracket {
                        return Err(invalid("empty field name"));
                    }
                } else {
                    segments.push(Segment::Field(std::mem::take(&mut field)));
                }
                after_bracket = false;
            }
            '[' => {
                if !field.is_empty() {
                    segments.push(Segment::Field(std::mem::take(&mut field)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err(invalid("unterminated '['"));
                }
                if inner.is_empty() {
                    return Err(invalid("empty brackets"));
                }
                segments.push(match inner.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Field(inner),
                });
                after_bracket = true;
            }
            _ if after_bracket => return Err(invalid("expected '.' or '[' after ']'")),
            _ => field.push(c),
        }
    }

    if !field.is_empty() {
        segments.push(Segment::Field(field));
    } else if !after_bracket {
        return Err(invalid("empty field name"));
    }
    Ok(segments)
}

pub fn get_value<'v>(root: &'v Value, path: &str) -> Result<&'v Value, FieldPathError> {
    let not_found = || FieldPathError::NotFound {
        path: path.to_owned(),
    };

    parse(path)?
        .iter()
        .try_fold(root, |current, segment| match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => map.get(name).ok_or_else(not_found),
            (Segment::Index(index), Value::Array(items)) => items.get(*index).ok_or_else(not_found),
            (_, Value::Null) => Err(not_found()),
            (Segment::Field(_), _) => Err(FieldPathError::wrong_type(path, "object")),
            (Segment::Index(_), _) => Err(FieldPathError::wrong_type(path, "array")),
        })
}

/// Sets `value` at `path`, creating missing objects and arrays on the way.
/// An index one past the end of an array appends; anything further is rejected.
pub fn set_value(root: &mut Value, path: &str, value: Value) -> Result<(), FieldPathError> {
    let segments = parse(path)?;
    let mut current = root;
    for segment in &segments {
        current = child_mut(current, segment, path)?;
    }
    *current = value;
    Ok(())
}

fn child_mut<'v>(value: &'v mut Value, segment: &Segment, path: &str) -> Result<&'v mut Value, FieldPathError> {
    match segment {
        Segment::Field(name) => {
            if value.is_null() {
                *value = Value::Object(Map::new());
            }
            match value {
                Value::Object(map) => Ok(map.entry(name.clone()).or_insert(Value::Null)),
                _ => Err(FieldPathError::wrong_type(path, "object")),
            }
        }
        Segment::Index(index) => {
            if value.is_null() {
                *value = Value::Array(Vec::new());
            }
            match value {
                // an index may address an element or append exactly one
                Value::Array(items) => {
                    if *index == items.len() {
                        items.push(Value::Null);
                    }
                    items.get_mut(*index).ok_or_else(|| FieldPathError::Invalid {
                        path: path.to_owned(),
                        reason: "array index out of range",
                    })
                }
                _ => Err(FieldPathError::wrong_type(path, "array")),
            }
        }
    }
}
