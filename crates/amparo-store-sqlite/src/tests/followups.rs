//! Follow-up repository: date defaulting, ISO validation, composable
//! filters, ordering.

use amparo_core::{
  Error as CoreError,
  followup::NewFollowUp,
  store::{FollowUpQuery, FollowUpStore as _},
};

use super::{count, date, seed_case, seed_counselor, store};
use crate::Error;

#[tokio::test]
async fn append_defaults_the_entry_date_to_today() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_id = seed_case(&s, counselor, date(2024, 1, 5), "Report").await;

  s.append_follow_up(NewFollowUp::new(case_id, counselor, "Initial contact"))
    .await
    .unwrap();

  let rows = s
    .list_follow_ups(&FollowUpQuery { case_id: Some(case_id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].entry_date, chrono::Local::now().date_naive());
  assert_eq!(rows[0].observation, "Initial contact");
  assert_eq!(rows[0].counselor_id, counselor);
}

#[tokio::test]
async fn append_accepts_iso_date_text() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_id = seed_case(&s, counselor, date(2024, 1, 5), "Report").await;

  let mut input = NewFollowUp::new(case_id, counselor, "Home visit");
  input.date = Some("2024-06-05".into());
  s.append_follow_up(input).await.unwrap();

  let rows = s
    .list_follow_ups(&FollowUpQuery { case_id: Some(case_id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(rows[0].entry_date, date(2024, 6, 5));
}

#[tokio::test]
async fn blank_date_text_means_today() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_id = seed_case(&s, counselor, date(2024, 1, 5), "Report").await;

  let mut input = NewFollowUp::new(case_id, counselor, "Phone call");
  input.date = Some("   ".into());
  s.append_follow_up(input).await.unwrap();

  let rows = s
    .list_follow_ups(&FollowUpQuery { case_id: Some(case_id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(rows[0].entry_date, chrono::Local::now().date_naive());
}

#[tokio::test]
async fn malformed_date_text_is_rejected_before_insert() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_id = seed_case(&s, counselor, date(2024, 1, 5), "Report").await;

  let mut input = NewFollowUp::new(case_id, counselor, "Home visit");
  input.date = Some("05/06/2024".into());

  let err = s.append_follow_up(input).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::InvalidDate(_))));
  assert_eq!(count(&s, "seguimiento").await, 0);
}

#[tokio::test]
async fn blank_observation_is_rejected() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_id = seed_case(&s, counselor, date(2024, 1, 5), "Report").await;

  let err = s
    .append_follow_up(NewFollowUp::new(case_id, counselor, "  "))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::MissingField("observacion"))
  ));
}

#[tokio::test]
async fn append_to_an_unknown_case_hits_the_foreign_key() {
  // No existence pre-check is issued; the schema's FK does the rejecting.
  let s = store().await;
  let counselor = seed_counselor(&s).await;

  let err = s
    .append_follow_up(NewFollowUp::new(9999, counselor, "orphan note"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Integrity { table: "seguimiento", .. }));
}

#[tokio::test]
async fn filters_compose_and_bounds_are_inclusive() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_a = seed_case(&s, counselor, date(2024, 1, 5), "Case A").await;
  let case_b = seed_case(&s, counselor, date(2024, 1, 6), "Case B").await;

  for day in ["2024-01-01", "2024-06-15", "2024-12-31", "2025-01-05"] {
    let mut input = NewFollowUp::new(case_a, counselor, format!("note {day}"));
    input.date = Some(day.into());
    s.append_follow_up(input).await.unwrap();
  }
  let mut other = NewFollowUp::new(case_b, counselor, "unrelated");
  other.date = Some("2024-06-20".into());
  s.append_follow_up(other).await.unwrap();

  let rows = s
    .list_follow_ups(&FollowUpQuery {
      case_id:   Some(case_a),
      date_from: Some("2024-01-01".into()),
      date_to:   Some("2024-12-31".into()),
    })
    .await
    .unwrap();

  let dates: Vec<_> = rows.iter().map(|f| f.entry_date).collect();
  assert_eq!(dates, vec![date(2024, 12, 31), date(2024, 6, 15), date(2024, 1, 1)]);
  assert!(rows.iter().all(|f| f.case_id == case_a));
}

#[tokio::test]
async fn no_filters_means_full_history() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_a = seed_case(&s, counselor, date(2024, 1, 5), "Case A").await;
  let case_b = seed_case(&s, counselor, date(2024, 1, 6), "Case B").await;

  for (case_id, day) in [(case_a, "2024-02-01"), (case_b, "2024-03-01"), (case_a, "2024-04-01")] {
    let mut input = NewFollowUp::new(case_id, counselor, "note");
    input.date = Some(day.into());
    s.append_follow_up(input).await.unwrap();
  }

  let rows = s.list_follow_ups(&FollowUpQuery::default()).await.unwrap();
  assert_eq!(rows.len(), 3);
  assert!(rows.windows(2).all(|w| w[0].entry_date >= w[1].entry_date));
}

#[tokio::test]
async fn same_day_entries_order_by_creation_timestamp() {
  let s = store().await;
  let counselor = seed_counselor(&s).await;
  let case_id = seed_case(&s, counselor, date(2024, 1, 5), "Report").await;

  let mut first = NewFollowUp::new(case_id, counselor, "morning");
  first.date = Some("2024-05-10".into());
  s.append_follow_up(first).await.unwrap();

  let mut second = NewFollowUp::new(case_id, counselor, "afternoon");
  second.date = Some("2024-05-10".into());
  s.append_follow_up(second).await.unwrap();

  let rows = s
    .list_follow_ups(&FollowUpQuery { case_id: Some(case_id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(rows[0].observation, "afternoon");
  assert_eq!(rows[1].observation, "morning");
}

#[tokio::test]
async fn malformed_filter_bound_is_rejected() {
  let s = store().await;

  let err = s
    .list_follow_ups(&FollowUpQuery {
      case_id:   None,
      date_from: Some("next week".into()),
      date_to:   None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::InvalidDate(_))));
}
