//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as ISO `YYYY-MM-DD` strings (which also compare
//! correctly as text), timestamps as RFC 3339 UTC strings, enums as their
//! fixed column spellings.

use amparo_core::{
  case::{Case, CaseSummary, Closure, InvolvedMinorRow, MinorRole},
  followup::FollowUp,
  person::{Enrollment, Gender, Person},
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result};

// ─── Dates and timestamps ────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

/// The store's civil date, used wherever a date defaults to "today".
pub fn today() -> NaiveDate {
  chrono::Local::now().date_naive()
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str {
  match g {
    Gender::M => "M",
    Gender::F => "F",
  }
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "M" => Ok(Gender::M),
    "F" => Ok(Gender::F),
    other => Err(Error::Decode(format!("unknown gender: {other:?}"))),
  }
}

// ─── MinorRole ───────────────────────────────────────────────────────────────

pub fn encode_role(r: MinorRole) -> &'static str {
  match r {
    MinorRole::Victim => "victima",
    MinorRole::Aggressor => "agresor",
    MinorRole::Witness => "testigo",
  }
}

pub fn decode_role(s: &str) -> Result<MinorRole> {
  match s {
    "victima" => Ok(MinorRole::Victim),
    "agresor" => Ok(MinorRole::Aggressor),
    "testigo" => Ok(MinorRole::Witness),
    other => Err(Error::Decode(format!("unknown involvement role: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `persona` row.
pub struct RawPerson {
  pub person_id:      i64,
  pub national_id:    Option<String>,
  pub given_name:     String,
  pub middle_name:    Option<String>,
  pub first_surname:  String,
  pub second_surname: Option<String>,
  pub gender:         String,
  pub address:        Option<String>,
  pub phone:          Option<String>,
  pub active:         bool,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:      self.person_id,
      national_id:    self.national_id,
      given_name:     self.given_name,
      middle_name:    self.middle_name,
      first_surname:  self.first_surname,
      second_surname: self.second_surname,
      gender:         decode_gender(&self.gender)?,
      address:        self.address,
      phone:          self.phone,
      active:         self.active,
    })
  }
}

/// Raw values read directly from a `denuncia` row.
pub struct RawCase {
  pub case_id:      i64,
  pub counselor_id: i64,
  pub filed_on:     String,
  pub occurred_on:  String,
  pub description:  String,
  pub open:         bool,
}

impl RawCase {
  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      case_id:      self.case_id,
      counselor_id: self.counselor_id,
      filed_on:     decode_date(&self.filed_on)?,
      occurred_on:  decode_date(&self.occurred_on)?,
      description:  self.description,
      open:         self.open,
    })
  }
}

/// Raw values for one listing row (`denuncia` joined with the counselor's
/// `persona` row).
pub struct RawCaseSummary {
  pub case_id:        i64,
  pub filed_on:       String,
  pub occurred_on:    String,
  pub description:    String,
  pub open:           bool,
  pub counselor_name: String,
}

impl RawCaseSummary {
  pub fn into_summary(self) -> Result<CaseSummary> {
    Ok(CaseSummary {
      case_id:        self.case_id,
      filed_on:       decode_date(&self.filed_on)?,
      occurred_on:    decode_date(&self.occurred_on)?,
      description:    self.description,
      open:           self.open,
      counselor_name: self.counselor_name,
    })
  }
}

/// Raw values for one involved-minor projection row.
pub struct RawInvolvedMinor {
  pub case_id:    i64,
  pub minor_id:   i64,
  pub minor_name: String,
  pub birth_date: String,
  pub role:       String,
  pub detail:     String,
}

impl RawInvolvedMinor {
  pub fn into_row(self) -> Result<InvolvedMinorRow> {
    Ok(InvolvedMinorRow {
      case_id:    self.case_id,
      minor_id:   self.minor_id,
      minor_name: self.minor_name,
      birth_date: decode_date(&self.birth_date)?,
      role:       decode_role(&self.role)?,
      detail:     self.detail,
    })
  }
}

/// Raw values read directly from a `seguimiento` row.
pub struct RawFollowUp {
  pub follow_up_id: i64,
  pub case_id:      i64,
  pub counselor_id: i64,
  pub entry_date:   String,
  pub recorded_at:  String,
  pub observation:  String,
}

impl RawFollowUp {
  pub fn into_follow_up(self) -> Result<FollowUp> {
    Ok(FollowUp {
      follow_up_id: self.follow_up_id,
      case_id:      self.case_id,
      counselor_id: self.counselor_id,
      entry_date:   decode_date(&self.entry_date)?,
      recorded_at:  decode_dt(&self.recorded_at)?,
      observation:  self.observation,
    })
  }
}

/// Raw values read directly from a `cierre` row.
pub struct RawClosure {
  pub closure_id:   i64,
  pub case_id:      i64,
  pub counselor_id: i64,
  pub closed_on:    String,
  pub closing_act:  String,
}

impl RawClosure {
  pub fn into_closure(self) -> Result<Closure> {
    Ok(Closure {
      closure_id:   self.closure_id,
      case_id:      self.case_id,
      counselor_id: self.counselor_id,
      closed_on:    decode_date(&self.closed_on)?,
      closing_act:  self.closing_act,
    })
  }
}

/// Raw values read directly from a `matricula_educativa` row. Nothing needs
/// decoding today; the type keeps the read path shaped like the others.
pub struct RawEnrollment {
  pub enrollment_id: i64,
  pub minor_id:      i64,
  pub school_name:   String,
  pub grade:         String,
  pub academic_year: String,
  pub active:        bool,
}

impl RawEnrollment {
  pub fn into_enrollment(self) -> Enrollment {
    Enrollment {
      enrollment_id: self.enrollment_id,
      minor_id:      self.minor_id,
      school_name:   self.school_name,
      grade:         self.grade,
      academic_year: self.academic_year,
      active:        self.active,
    }
  }
}
