//! Case (denuncia) records: the transactional heart of the store.
//!
//! A case is created atomically together with its dependent lists (involved
//! minors, complainants, accused persons). Later edits touch only the fields
//! named by [`CasePatch`]; follow-up entries and the closure record accumulate
//! independently over the case's lifetime.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Roles ───────────────────────────────────────────────────────────────────

/// How a minor participates in a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinorRole {
  Victim,
  Aggressor,
  Witness,
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// A formal complaint record.
///
/// `open` and the existence of a [`Closure`] are independent: registering a
/// closure does not flip the flag, and closing the flag does not create a
/// closure record. Callers decide policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
  pub case_id:      i64,
  /// The reporting counselor (`personal` reference).
  pub counselor_id: i64,
  /// Date the complaint was filed with the agency.
  pub filed_on:     NaiveDate,
  /// Date the reported incident occurred.
  pub occurred_on:  NaiveDate,
  pub description:  String,
  pub open:         bool,
}

// ─── NewCase ─────────────────────────────────────────────────────────────────

/// One minor's participation in a new case.
#[derive(Debug, Clone)]
pub struct NewInvolvedMinor {
  pub minor_id: i64,
  pub role:     MinorRole,
  pub detail:   String,
}

/// One complainant on a new case. `person_id` of `None` records an anonymous
/// reporter; the statement is mandatory either way.
#[derive(Debug, Clone)]
pub struct NewComplainant {
  pub person_id: Option<i64>,
  pub statement: String,
  pub injuries:  Option<String>,
}

/// One accused person on a new case.
#[derive(Debug, Clone)]
pub struct NewAccused {
  pub person_id: i64,
  pub measures:  Option<String>,
}

/// Input to `create_case`. The id is storage-assigned, status starts open,
/// and the filing date defaults to today when absent.
#[derive(Debug, Clone)]
pub struct NewCase {
  pub counselor_id:    i64,
  pub occurred_on:     NaiveDate,
  pub description:     String,
  pub filed_on:        Option<NaiveDate>,
  pub involved_minors: Vec<NewInvolvedMinor>,
  pub complainants:    Vec<NewComplainant>,
  pub accused:         Vec<NewAccused>,
}

impl NewCase {
  /// Convenience constructor with empty dependent lists.
  pub fn new(
    counselor_id: i64,
    occurred_on: NaiveDate,
    description: impl Into<String>,
  ) -> Self {
    Self {
      counselor_id,
      occurred_on,
      description: description.into(),
      filed_on: None,
      involved_minors: Vec::new(),
      complainants: Vec::new(),
      accused: Vec::new(),
    }
  }

  /// Required-field presence across the case and its dependent lists,
  /// checked before any SQL is built.
  pub fn validate(&self) -> Result<()> {
    if self.description.trim().is_empty() {
      return Err(Error::MissingField("descripcion"));
    }
    for complainant in &self.complainants {
      if complainant.statement.trim().is_empty() {
        return Err(Error::MissingField("declaracion"));
      }
    }
    Ok(())
  }
}

// ─── CasePatch ───────────────────────────────────────────────────────────────

/// The only case fields an edit is allowed to touch. Absent fields are left
/// as stored.
#[derive(Debug, Clone, Default)]
pub struct CasePatch {
  pub description: Option<String>,
  pub open:        Option<bool>,
}

impl CasePatch {
  pub fn is_empty(&self) -> bool {
    self.description.is_none() && self.open.is_none()
  }

  pub fn validate(&self) -> Result<()> {
    if let Some(description) = &self.description
      && description.trim().is_empty()
    {
      return Err(Error::MissingField("descripcion"));
    }
    Ok(())
  }
}

// ─── Row projections ─────────────────────────────────────────────────────────

/// Listing row: case fields denormalised with the counselor's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
  pub case_id:        i64,
  pub filed_on:       NaiveDate,
  pub occurred_on:    NaiveDate,
  pub description:    String,
  pub open:           bool,
  pub counselor_name: String,
}

/// An involved minor joined through `persona` and `nna` for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvolvedMinorRow {
  pub case_id:    i64,
  pub minor_id:   i64,
  pub minor_name: String,
  pub birth_date: NaiveDate,
  pub role:       MinorRole,
  pub detail:     String,
}

/// A complainant joined through `persona`. `person_name` is `None` exactly
/// when the reporter is anonymous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplainantRow {
  pub complainant_id: i64,
  pub case_id:        i64,
  pub person_id:      Option<i64>,
  pub person_name:    Option<String>,
  pub statement:      String,
  pub injuries:       Option<String>,
}

/// An accused person joined through `persona`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccusedRow {
  pub case_id:     i64,
  pub person_id:   i64,
  pub person_name: String,
  pub measures:    Option<String>,
}

// ─── Closure ─────────────────────────────────────────────────────────────────

/// The formal closure record. At most one per case, enforced by a UNIQUE
/// constraint on the case reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closure {
  pub closure_id:   i64,
  pub case_id:      i64,
  pub counselor_id: i64,
  pub closed_on:    NaiveDate,
  /// The closing act, the formal text ending the intervention.
  pub closing_act:  String,
}

/// Input to `register_closure`. The closure date defaults to today.
#[derive(Debug, Clone)]
pub struct NewClosure {
  pub case_id:      i64,
  pub counselor_id: i64,
  pub closed_on:    Option<NaiveDate>,
  pub closing_act:  String,
}

impl NewClosure {
  pub fn validate(&self) -> Result<()> {
    if self.closing_act.trim().is_empty() {
      return Err(Error::MissingField("acta"));
    }
    Ok(())
  }
}
