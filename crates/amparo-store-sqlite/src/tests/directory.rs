//! Directory repository: the persona hierarchy and enrollments.

use amparo_core::{
  Error as CoreError,
  person::{Gender, NewEnrollment, NewPerson},
  store::DirectoryStore as _,
};

use super::{date, person, seed_minor, store};
use crate::Error;

#[tokio::test]
async fn add_person_and_get_roundtrip() {
  let s = store().await;

  let input = NewPerson {
    national_id:    Some("001-1234567-8".into()),
    given_name:     "Carmen".into(),
    middle_name:    Some("Julia".into()),
    first_surname:  "Silva".into(),
    second_surname: Some("Paredes".into()),
    gender:         Gender::F,
    address:        Some("Calle 4 #12".into()),
    phone:          Some("809-555-0101".into()),
  };
  let id = s.add_person(input).await.unwrap();

  let got = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(got.person_id, id);
  assert_eq!(got.national_id.as_deref(), Some("001-1234567-8"));
  assert_eq!(got.full_name(), "Carmen Julia Silva Paredes");
  assert_eq!(got.gender, Gender::F);
  assert!(got.active);
}

#[tokio::test]
async fn get_missing_person_returns_none() {
  let s = store().await;
  assert!(s.get_person(404).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_national_id_is_an_integrity_violation() {
  let s = store().await;

  let mut first = person("Carmen", "Silva");
  first.national_id = Some("001-1234567-8".into());
  s.add_person(first).await.unwrap();

  let mut second = person("Other", "Person");
  second.national_id = Some("001-1234567-8".into());
  let err = s.add_person(second).await.unwrap_err();
  assert!(matches!(err, Error::Integrity { table: "persona", .. }));
}

#[tokio::test]
async fn blank_given_name_is_rejected() {
  let s = store().await;
  let err = s.add_person(person(" ", "Silva")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::MissingField("primer_nombre"))
  ));
}

#[tokio::test]
async fn deactivate_flips_the_active_flag() {
  let s = store().await;
  let id = s.add_person(person("Carmen", "Silva")).await.unwrap();

  assert!(s.deactivate_person(id).await.unwrap());
  let got = s.get_person(id).await.unwrap().unwrap();
  assert!(!got.active);

  assert!(!s.deactivate_person(404).await.unwrap());
}

#[tokio::test]
async fn staff_requires_a_valid_position() {
  let s = store().await;

  let err = s
    .add_staff(person("Lucia", "Mendez"), 999, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Integrity { table: "personal", .. }));
  // The base row rolled back with the specialisation.
  assert!(s.get_person(1).await.unwrap().is_none());
}

#[tokio::test]
async fn position_catalog_is_seeded() {
  let s = store().await;
  let positions = s.list_positions().await.unwrap();
  assert!(positions.iter().any(|p| p.name == "Consejero"));
}

#[tokio::test]
async fn enrollments_list_most_recent_year_first() {
  let s = store().await;
  let minor = seed_minor(&s, "Ana").await;

  s.add_enrollment(NewEnrollment {
    minor_id:      minor,
    school_name:   "Escuela Central".into(),
    grade:         "4to".into(),
    academic_year: "2023-2024".into(),
  })
  .await
  .unwrap();
  s.add_enrollment(NewEnrollment {
    minor_id:      minor,
    school_name:   "Escuela Central".into(),
    grade:         "5to".into(),
    academic_year: "2024-2025".into(),
  })
  .await
  .unwrap();

  let rows = s.list_enrollments(minor).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].academic_year, "2024-2025");
  assert_eq!(rows[1].academic_year, "2023-2024");
  assert!(rows.iter().all(|e| e.active));
}

#[tokio::test]
async fn enrollment_for_an_unknown_minor_is_rejected() {
  let s = store().await;

  let err = s
    .add_enrollment(NewEnrollment {
      minor_id:      9999,
      school_name:   "Escuela Central".into(),
      grade:         "4to".into(),
      academic_year: "2024-2025".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Integrity { table: "matricula_educativa", .. }
  ));
}

#[tokio::test]
async fn specialisations_share_the_base_identity() {
  let s = store().await;

  let minor_id = s
    .add_minor(person("Ana", "Rojas"), date(2014, 5, 9))
    .await
    .unwrap();
  let relative_id = s.add_family_member(person("Rosa", "Diaz"), false).await.unwrap();
  let witness_id = s
    .add_third_party(person("Juan", "Perez"), "vecino".into())
    .await
    .unwrap();

  let minor = s.get_minor(minor_id).await.unwrap().unwrap();
  assert_eq!(minor.person.person_id, minor_id);
  assert_eq!(minor.birth_date, date(2014, 5, 9));

  let relative = s.get_family_member(relative_id).await.unwrap().unwrap();
  assert_eq!(relative.person.full_name(), "Rosa Diaz");
  assert!(!relative.is_guardian);

  let witness = s.get_third_party(witness_id).await.unwrap().unwrap();
  assert_eq!(witness.relation_category, "vecino");

  // A base person does not carry roles it was never given.
  assert!(s.get_minor(relative_id).await.unwrap().is_none());
  assert!(s.get_staff(minor_id).await.unwrap().is_none());
}

#[tokio::test]
async fn staff_read_exposes_position_and_credential() {
  let s = store().await;
  let positions = s.list_positions().await.unwrap();

  let id = s
    .add_staff(
      person("Lucia", "Mendez"),
      positions[0].position_id,
      Some("CP-1042".into()),
    )
    .await
    .unwrap();

  let staff = s.get_staff(id).await.unwrap().unwrap();
  assert_eq!(staff.position_id, positions[0].position_id);
  assert_eq!(staff.credential.as_deref(), Some("CP-1042"));
  assert_eq!(staff.person.full_name(), "Lucia Mendez");
}
