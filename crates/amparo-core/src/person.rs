//! Person records: the single-table-inheritance identity hierarchy.
//!
//! A `persona` row is the base identity; `nna`, `familiar`, `tercero`, and
//! `personal` rows share its primary key and add role-specific fields. The
//! case cluster and the kinship graph reference these rows by id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Registered gender, as the civil registry records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  M,
  F,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// Base identity record shared by every specialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:      i64,
  /// National identity number (`cedula`). Unique when present; minors often
  /// have none.
  pub national_id:    Option<String>,
  pub given_name:     String,
  pub middle_name:    Option<String>,
  pub first_surname:  String,
  pub second_surname: Option<String>,
  pub gender:         Gender,
  pub address:        Option<String>,
  /// Unique when present.
  pub phone:          Option<String>,
  /// Soft-delete flag; base rows are never hard-deleted because the case
  /// cluster references them.
  pub active:         bool,
}

impl Person {
  /// Display name assembled from all non-empty name parts.
  pub fn full_name(&self) -> String {
    let mut name = self.given_name.clone();
    if let Some(middle) = &self.middle_name {
      name.push(' ');
      name.push_str(middle);
    }
    name.push(' ');
    name.push_str(&self.first_surname);
    if let Some(second) = &self.second_surname {
      name.push(' ');
      name.push_str(second);
    }
    name
  }
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to the directory `add_*` operations. `person_id` is
/// storage-assigned and new rows always start active.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub national_id:    Option<String>,
  pub given_name:     String,
  pub middle_name:    Option<String>,
  pub first_surname:  String,
  pub second_surname: Option<String>,
  pub gender:         Gender,
  pub address:        Option<String>,
  pub phone:          Option<String>,
}

impl NewPerson {
  /// Minimal constructor; optional fields default to absent.
  pub fn new(
    given_name: impl Into<String>,
    first_surname: impl Into<String>,
    gender: Gender,
  ) -> Self {
    Self {
      national_id:    None,
      given_name:     given_name.into(),
      middle_name:    None,
      first_surname:  first_surname.into(),
      second_surname: None,
      gender,
      address:        None,
      phone:          None,
    }
  }

  /// Required-field presence, checked before any SQL is built.
  pub fn validate(&self) -> Result<()> {
    if self.given_name.trim().is_empty() {
      return Err(Error::MissingField("primer_nombre"));
    }
    if self.first_surname.trim().is_empty() {
      return Err(Error::MissingField("primer_apellido"));
    }
    Ok(())
  }
}

// ─── Specialisations ─────────────────────────────────────────────────────────

/// A child or adolescent subject of protection (NNA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minor {
  pub person:     Person,
  pub birth_date: NaiveDate,
}

/// A relative of one or more minors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
  pub person:      Person,
  /// Whether this relative acts as a legal guardian.
  pub is_guardian: bool,
}

/// A person involved in a case who is neither a minor nor a relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdParty {
  pub person:            Person,
  /// Free-text category describing the link to the minor, e.g. "vecino".
  pub relation_category: String,
}

/// An agency staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
  pub person:      Person,
  /// Reference into the `cargo` position catalog.
  pub position_id: i64,
  /// Professional licence or registry number, when the position has one.
  pub credential:  Option<String>,
}

// ─── Catalogs ────────────────────────────────────────────────────────────────

/// A staff position from the `cargo` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
  pub position_id: i64,
  pub name:        String,
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// A minor's enrollment at a school for one academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
  pub enrollment_id: i64,
  pub minor_id:      i64,
  pub school_name:   String,
  pub grade:         String,
  pub academic_year: String,
  pub active:        bool,
}

/// Input to `add_enrollment`.
#[derive(Debug, Clone)]
pub struct NewEnrollment {
  pub minor_id:      i64,
  pub school_name:   String,
  pub grade:         String,
  pub academic_year: String,
}

impl NewEnrollment {
  pub fn validate(&self) -> Result<()> {
    if self.school_name.trim().is_empty() {
      return Err(Error::MissingField("institucion"));
    }
    Ok(())
  }
}
