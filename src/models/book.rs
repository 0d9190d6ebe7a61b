//! Book model and its JSON transcoding rules

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Key used for errors that are not tied to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const REQUIRED: &str = "This field is required.";
const NULL: &str = "This field may not be null.";
const BLANK: &str = "This field may not be blank.";
const NOT_A_STRING: &str = "Not a valid string.";
const NUL_CHARACTER: &str = "Null characters are not allowed.";

/// Book record as stored and as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Book {
    /// Identifier assigned by the store
    pub id: i64,
    pub title: String,
    pub author: String,
}

/// Create / replace request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub title: String,
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub author: String,
}

/// Validation errors keyed by field name, in field declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, Vec<String>>);

impl FieldErrors {
    /// Errors for a payload that could not be read as an object at all
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl BookInput {
    /// Read and validate a request body.
    ///
    /// Every field is checked so the caller gets all problems at once.
    /// Keys other than `title` and `author` (including `id`) are ignored.
    pub fn from_json(data: &Value) -> Result<Self, FieldErrors> {
        let Some(object) = data.as_object() else {
            return Err(FieldErrors::non_field(format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_kind(data)
            )));
        };

        let title = read_string(object, "title");
        let author = read_string(object, "author");

        let candidate = BookInput {
            title: title.clone().unwrap_or_default(),
            author: author.clone().unwrap_or_default(),
        };
        let rule_errors = candidate.validate().err();

        let mut errors = FieldErrors::default();
        for (field, parsed) in [("title", &title), ("author", &author)] {
            if let Err(message) = parsed {
                errors.add(field, *message);
                continue;
            }
            let Some(rule_errors) = &rule_errors else {
                continue;
            };
            for (name, failures) in rule_errors.field_errors() {
                if name != field {
                    continue;
                }
                for failure in failures.iter() {
                    let message = failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string());
                    errors.add(field, message);
                }
            }
        }

        if errors.is_empty() {
            Ok(candidate)
        } else {
            Err(errors)
        }
    }
}

impl From<Book> for BookInput {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            author: book.author,
        }
    }
}

fn read_string(object: &Map<String, Value>, field: &str) -> Result<String, &'static str> {
    match object.get(field) {
        None => Err(REQUIRED),
        Some(Value::Null) => Err(NULL),
        Some(Value::String(raw)) if raw.contains('\0') => Err(NUL_CHARACTER),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(BLANK)
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(NOT_A_STRING),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
