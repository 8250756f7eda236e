//! Repository traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `amparo-store-sqlite`). Callers depend on these abstractions, not on any
//! concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  case::{
    AccusedRow, Case, CasePatch, CaseSummary, Closure, ComplainantRow,
    InvolvedMinorRow, NewCase, NewClosure,
  },
  followup::{FollowUp, NewFollowUp},
  kinship::{KinshipEdge, KinshipEdgeRow, RelationType},
  person::{
    Enrollment, FamilyMember, Minor, NewEnrollment, NewPerson, Person,
    Position, Staff, ThirdParty,
  },
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Case-status filter for [`CaseQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Open,
  Closed,
}

/// Parameters for [`CaseStore::list_cases`].
#[derive(Debug, Clone, Default)]
pub struct CaseQuery {
  /// Case-insensitive substring matched against the case id, the
  /// description, and the counselor's full name. Blank means no filter.
  pub text:   Option<String>,
  pub status: StatusFilter,
}

/// Parameters for [`FollowUpStore::list_follow_ups`]. All filters are
/// optional and composable; date bounds are inclusive and arrive as raw
/// ISO `YYYY-MM-DD` text, validated by the store.
#[derive(Debug, Clone, Default)]
pub struct FollowUpQuery {
  pub case_id:   Option<i64>,
  pub date_from: Option<String>,
  pub date_to:   Option<String>,
}

// ─── Case repository ─────────────────────────────────────────────────────────

/// The case-record cluster: creation, mutation, deletion, retrieval, and
/// closure of complaints.
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create a case together with its dependent lists as one atomic unit.
  /// On any failure the whole write rolls back; no partial state is ever
  /// visible. Returns the generated case id.
  fn create_case(
    &self,
    input: NewCase,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Apply a typed patch to a case. `Ok(false)` means no row was affected:
  /// a not-found signal, distinct from a storage error.
  fn update_case(
    &self,
    case_id: i64,
    patch: CasePatch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a case; the storage engine's cascade rules remove all dependent
  /// rows. `Ok(false)` when the case did not exist.
  fn delete_case(
    &self,
    case_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// List cases matching `query`, ordered by filing date descending.
  /// Returns an empty vec (never an error) when nothing matches.
  fn list_cases<'a>(
    &'a self,
    query: &'a CaseQuery,
  ) -> impl Future<Output = Result<Vec<CaseSummary>, Self::Error>> + Send + 'a;

  /// Detail fetch. `None` if the case does not exist.
  fn get_case(
    &self,
    case_id: i64,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  // ── Case-file projections (pure reads) ────────────────────────────────

  fn list_involved_minors(
    &self,
    case_id: i64,
  ) -> impl Future<Output = Result<Vec<InvolvedMinorRow>, Self::Error>> + Send + '_;

  fn list_complainants(
    &self,
    case_id: i64,
  ) -> impl Future<Output = Result<Vec<ComplainantRow>, Self::Error>> + Send + '_;

  fn list_accused(
    &self,
    case_id: i64,
  ) -> impl Future<Output = Result<Vec<AccusedRow>, Self::Error>> + Send + '_;

  // ── Closure ───────────────────────────────────────────────────────────

  /// Record the formal closure of a case. A second closure for the same
  /// case fails with the backend's integrity variant. Does not touch the
  /// case's open flag.
  fn register_closure(
    &self,
    input: NewClosure,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn get_closure(
    &self,
    case_id: i64,
  ) -> impl Future<Output = Result<Option<Closure>, Self::Error>> + Send + '_;
}

// ─── Follow-up repository ────────────────────────────────────────────────────

/// Timestamped progress notes appended to existing cases.
pub trait FollowUpStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append one note. The entry date defaults to today when the input text
  /// is blank or absent. Does not pre-check that the case exists; a fully
  /// dangling case id is left to the storage engine's foreign-key rules.
  fn append_follow_up(
    &self,
    input: NewFollowUp,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// List notes matching `query`, ordered by entry date descending and then
  /// creation timestamp descending. No filters means full history.
  fn list_follow_ups<'a>(
    &'a self,
    query: &'a FollowUpQuery,
  ) -> impl Future<Output = Result<Vec<FollowUp>, Self::Error>> + Send + 'a;
}

// ─── Kinship repository ──────────────────────────────────────────────────────

/// The NNA↔Familiar kinship graph and its relation-type catalog.
pub trait KinshipStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert one edge. Self-relations are rejected before storage is
  /// touched; duplicate edges and dangling references surface as the
  /// backend's integrity variant.
  fn create_kinship_edge(
    &self,
    edge: KinshipEdge,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Edges for one minor, joined for display. Storage failures are logged
  /// and surface as an empty vec.
  fn list_kinship_edges(
    &self,
    minor_id: i64,
  ) -> impl Future<Output = Result<Vec<KinshipEdgeRow>, Self::Error>> + Send + '_;

  fn list_relation_types(
    &self,
  ) -> impl Future<Output = Result<Vec<RelationType>, Self::Error>> + Send + '_;
}

// ─── Directory repository ────────────────────────────────────────────────────

/// The persona hierarchy and its single-row operations; everything the case
/// cluster joins through.
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a base identity row with no specialisation.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Insert a base row plus its `nna` specialisation, atomically.
  fn add_minor(
    &self,
    input: NewPerson,
    birth_date: NaiveDate,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn add_family_member(
    &self,
    input: NewPerson,
    is_guardian: bool,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn add_third_party(
    &self,
    input: NewPerson,
    relation_category: String,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn add_staff(
    &self,
    input: NewPerson,
    position_id: i64,
    credential: Option<String>,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  // ── Specialisation reads: `None` when the person does not exist or
  //    does not carry that role ─────────────────────────────────────────

  fn get_minor(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<Minor>, Self::Error>> + Send + '_;

  fn get_family_member(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<FamilyMember>, Self::Error>> + Send + '_;

  fn get_third_party(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<ThirdParty>, Self::Error>> + Send + '_;

  fn get_staff(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + '_;

  /// Flip the active flag off. `Ok(false)` when the person does not exist.
  /// Base rows are never hard-deleted; the case cluster references them.
  fn deactivate_person(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn add_enrollment(
    &self,
    input: NewEnrollment,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Enrollments for one minor, most recent academic year first.
  fn list_enrollments(
    &self,
    minor_id: i64,
  ) -> impl Future<Output = Result<Vec<Enrollment>, Self::Error>> + Send + '_;

  fn list_positions(
    &self,
  ) -> impl Future<Output = Result<Vec<Position>, Self::Error>> + Send + '_;
}
