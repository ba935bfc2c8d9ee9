//! Attribute validation, applied before any store I/O.

use chrono::{NaiveDate, NaiveTime};

use super::pet::NewPet;
use super::task::{DATE_FORMAT, NewTask, TIME_FORMAT};

/// A malformed input attribute, named by field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    const fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Pet names must be at least two characters of letters and spaces.
pub fn pet_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("name", "must not be empty"));
    }
    if trimmed.chars().count() < 2 {
        return Err(ValidationError::new("name", "must be at least 2 characters"));
    }
    if !trimmed.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(ValidationError::new(
            "name",
            "may only contain letters and spaces",
        ));
    }
    Ok(())
}

pub fn pet_breed(breed: &str) -> Result<(), ValidationError> {
    if breed.trim().is_empty() {
        return Err(ValidationError::new("breed", "must not be empty"));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(())
}

/// Validate the caller-editable pet fields, shared by create and update.
pub fn pet_fields(name: &str, breed: &str, age: f64, weight: f64) -> Result<(), ValidationError> {
    pet_name(name)?;
    pet_breed(breed)?;
    non_negative("age", age)?;
    non_negative("weight", weight)?;
    Ok(())
}

/// Validate all attributes of a pet create.
pub fn new_pet(pet: &NewPet) -> Result<(), ValidationError> {
    pet_fields(&pet.name, &pet.breed, pet.age, pet.weight)
}

pub fn task_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "must not be empty"));
    }
    Ok(())
}

/// Validate all attributes of a task create.
///
/// Time and date are already well-formed by construction; only textual
/// fields need checking here.
pub fn new_task(task: &NewTask) -> Result<(), ValidationError> {
    task_title(&task.title)
}

/// Parse an `HH:MM` form input into a task time.
pub fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map_err(|_| ValidationError::new("time", "must be HH:MM (24h)"))
}

/// Parse a `YYYY-MM-DD` form input into a task date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::new("date", "must be YYYY-MM-DD"))
}
