//! Input and output contracts shared by every storage backend.
//!
//! Validation is structural only: required strings must be non-empty. There is
//! no check that `location` is a served city or that `preferredDate` lies in
//! the future.

use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error as _, Unexpected};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A waste collection request as submitted by a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertWastePickup {
    pub full_name: String,
    pub location: String,
    pub waste_type: String,
    #[serde(default)]
    pub preferred_date: Option<String>,
}

/// A persisted waste collection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WastePickup {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub full_name: String,
    pub location: String,
    pub waste_type: String,
    pub preferred_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a waste pickup. Absent fields are left untouched.
///
/// `preferred_date` is doubly optional: `None` keeps the stored value,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWastePickup {
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertUser {
    pub username: String,
    pub password: String,
}

/// An account holder. The password is kept exactly as submitted; nothing in
/// this crate hashes it, so it is never serialized back out.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Present-but-null is rejected for fields that can never be null.
fn non_null<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(d)? {
        Some(s) => Ok(Some(s)),
        None => Err(D::Error::invalid_type(Unexpected::Unit, &"a string")),
    }
}

/// Present-but-null becomes `Some(None)`; `#[serde(default)]` covers absence.
fn nullable<'de, D>(d: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(d).map(Some)
}

/// Collects violations so a single response can name every bad field.
#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.0.push(format!("{field} must not be empty"));
        }
    }

    fn into_result(self) -> Result<(), ModelError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(self.0.join("; ")))
        }
    }
}

/// An empty preferred date means "no preference", never a stored `""`.
pub fn normalize_preferred_date(date: Option<String>) -> Option<String> {
    date.filter(|d| !d.is_empty())
}

impl InsertWastePickup {
    /// Check required fields and normalize `preferred_date`.
    pub fn validate(self) -> Result<Self, ModelError> {
        let mut v = Violations::default();
        v.require_non_empty("fullName", &self.full_name);
        v.require_non_empty("location", &self.location);
        v.require_non_empty("wasteType", &self.waste_type);
        v.into_result()?;
        Ok(Self { preferred_date: normalize_preferred_date(self.preferred_date), ..self })
    }
}

impl UpdateWastePickup {
    /// Check provided fields and normalize a provided `preferred_date`.
    pub fn validate(self) -> Result<Self, ModelError> {
        let mut v = Violations::default();
        if let Some(name) = &self.full_name {
            v.require_non_empty("fullName", name);
        }
        if let Some(location) = &self.location {
            v.require_non_empty("location", location);
        }
        if let Some(kind) = &self.waste_type {
            v.require_non_empty("wasteType", kind);
        }
        v.into_result()?;
        Ok(Self { preferred_date: self.preferred_date.map(normalize_preferred_date), ..self })
    }

    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.location.is_none()
            && self.waste_type.is_none()
            && self.preferred_date.is_none()
    }
}

impl InsertUser {
    pub fn validate(self) -> Result<Self, ModelError> {
        let mut v = Violations::default();
        v.require_non_empty("username", &self.username);
        v.require_non_empty("password", &self.password);
        v.into_result()?;
        Ok(self)
    }
}

impl WastePickup {
    /// Build a fresh record from validated input.
    pub fn new(id: String, input: InsertWastePickup, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name: input.full_name,
            location: input.location,
            waste_type: input.waste_type,
            preferred_date: normalize_preferred_date(input.preferred_date),
            created_at,
        }
    }

    /// Merge the provided fields in place. Identity and `created_at` never change.
    pub fn apply(&mut self, update: UpdateWastePickup) {
        if let Some(name) = update.full_name {
            self.full_name = name;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(kind) = update.waste_type {
            self.waste_type = kind;
        }
        if let Some(date) = update.preferred_date {
            self.preferred_date = normalize_preferred_date(date);
        }
    }
}
