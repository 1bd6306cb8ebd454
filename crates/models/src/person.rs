use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};

pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 120;

const REQUIRED: &str = "this field is required";

/// A stored person. Identity is `id`; two values with the same id are the
/// same logical entity regardless of the other fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub hobbies: Vec<String>,
}

impl Person {
    /// Construct with a fresh random identifier. Never fails; content
    /// validation belongs to `PersonInput`.
    pub fn new(name: impl Into<String>, age: i32, hobbies: Vec<String>) -> Self {
        Self { id: Uuid::new_v4(), name: name.into(), age, hobbies }
    }
}

/// Create/replace payload. Every field is optional at the wire level so
/// that a missing field surfaces as a field error instead of a decode error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonInput {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub hobbies: Option<Vec<String>>,
}

impl PersonInput {
    pub fn new(name: impl Into<String>, age: i32, hobbies: Vec<String>) -> Self {
        Self { name: Some(name.into()), age: Some(age), hobbies: Some(hobbies) }
    }

    /// Collect every field problem at once.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut errors = FieldErrors::new();

        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => {}
            _ => errors.add("name", REQUIRED),
        }

        match self.age {
            None => errors.add("age", REQUIRED),
            Some(age) if age < MIN_AGE => errors.add("age", format!("can not be less than {MIN_AGE}")),
            Some(age) if age > MAX_AGE => errors.add("age", format!("can not be greater than {MAX_AGE}")),
            Some(_) => {}
        }

        match &self.hobbies {
            None => errors.add("hobbies", REQUIRED),
            Some(hobbies) => {
                for (i, hobby) in hobbies.iter().enumerate() {
                    if hobby.trim().is_empty() {
                        errors.add(format!("hobbies[{i}]"), REQUIRED);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(errors))
        }
    }

    /// Validate and build a new person with a fresh identifier.
    pub fn into_person(self) -> Result<Person, ModelError> {
        self.into_person_with_id(Uuid::new_v4())
    }

    /// Validate and build the replacement record for an existing identifier.
    pub fn into_person_with_id(self, id: Uuid) -> Result<Person, ModelError> {
        self.validate()?;
        Ok(Person {
            id,
            name: self.name.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            hobbies: self.hobbies.unwrap_or_default(),
        })
    }
}
