//! Follow-up entries: timestamped progress notes appended to a case.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── FollowUp ────────────────────────────────────────────────────────────────

/// One progress note on a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
  pub follow_up_id: i64,
  pub case_id:      i64,
  pub counselor_id: i64,
  /// Civil date the noted activity belongs to; caller-supplied or defaulted
  /// to today at append time.
  pub entry_date:   NaiveDate,
  /// Store-assigned creation timestamp.
  pub recorded_at:  DateTime<Utc>,
  pub observation:  String,
}

// ─── NewFollowUp ─────────────────────────────────────────────────────────────

/// Input to `append_follow_up`. The entry date arrives as raw caller text:
/// blank or absent means "today", anything else must be ISO `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct NewFollowUp {
  pub case_id:      i64,
  pub counselor_id: i64,
  pub observation:  String,
  pub date:         Option<String>,
}

impl NewFollowUp {
  pub fn new(case_id: i64, counselor_id: i64, observation: impl Into<String>) -> Self {
    Self {
      case_id,
      counselor_id,
      observation: observation.into(),
      date: None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.observation.trim().is_empty() {
      return Err(Error::MissingField("observacion"));
    }
    Ok(())
  }

  /// Resolve the raw date text. `Ok(None)` means no date was given and the
  /// store should use today.
  pub fn entry_date(&self) -> Result<Option<NaiveDate>> {
    parse_optional_date(self.date.as_deref())
  }
}

// ─── Date-text parsing ───────────────────────────────────────────────────────

/// Parse ISO `YYYY-MM-DD` date text, strictly.
pub fn parse_iso_date(text: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(text, "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Parse optional date text as the follow-up filters accept it: absent or
/// blank means "no bound", anything else must be ISO.
pub fn parse_optional_date(text: Option<&str>) -> Result<Option<NaiveDate>> {
  match text.map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => parse_iso_date(s).map(Some),
  }
}
