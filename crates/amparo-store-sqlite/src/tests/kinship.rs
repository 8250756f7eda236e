//! Kinship repository: self-relation rejection, edge listing, catalog.

use amparo_core::{
  Error as CoreError,
  kinship::KinshipEdge,
  store::{DirectoryStore as _, KinshipStore as _},
};

use super::{count, person, seed_minor, store};
use crate::Error;

#[tokio::test]
async fn self_relation_is_rejected_before_storage() {
  let s = store().await;

  let err = s
    .create_kinship_edge(KinshipEdge {
      minor_id:         7,
      family_member_id: 7,
      relation_type_id: 1,
      cohabits:         true,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::SelfKinship(7))));
  assert_eq!(count(&s, "relacion_nna").await, 0);
}

#[tokio::test]
async fn create_and_list_edges() {
  let s = store().await;
  let minor = seed_minor(&s, "Ana").await;
  let mother = s
    .add_family_member(person("Rosa", "Diaz"), true)
    .await
    .unwrap();

  let types = s.list_relation_types().await.unwrap();
  let madre = types.iter().find(|t| t.name == "Madre").unwrap();

  s.create_kinship_edge(KinshipEdge {
    minor_id:         minor,
    family_member_id: mother,
    relation_type_id: madre.relation_type_id,
    cohabits:         true,
  })
  .await
  .unwrap();

  let edges = s.list_kinship_edges(minor).await.unwrap();
  assert_eq!(edges.len(), 1);
  assert_eq!(edges[0].family_member_id, mother);
  assert_eq!(edges[0].family_member_name, "Rosa Diaz");
  assert!(edges[0].is_guardian);
  assert_eq!(edges[0].relation_type, "Madre");
  assert!(edges[0].cohabits);
}

#[tokio::test]
async fn a_minor_without_edges_lists_nothing() {
  let s = store().await;
  let minor = seed_minor(&s, "Ana").await;
  assert!(s.list_kinship_edges(minor).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_edge_is_an_integrity_violation() {
  let s = store().await;
  let minor = seed_minor(&s, "Ana").await;
  let aunt = s
    .add_family_member(person("Elena", "Diaz"), false)
    .await
    .unwrap();

  let edge = KinshipEdge {
    minor_id:         minor,
    family_member_id: aunt,
    relation_type_id: 1,
    cohabits:         false,
  };
  s.create_kinship_edge(edge).await.unwrap();

  let err = s.create_kinship_edge(edge).await.unwrap_err();
  assert!(matches!(err, Error::Integrity { table: "relacion_nna", .. }));
  assert_eq!(count(&s, "relacion_nna").await, 1);
}

#[tokio::test]
async fn dangling_family_member_is_an_integrity_violation() {
  let s = store().await;
  let minor = seed_minor(&s, "Ana").await;

  let err = s
    .create_kinship_edge(KinshipEdge {
      minor_id:         minor,
      family_member_id: 9999,
      relation_type_id: 1,
      cohabits:         false,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Integrity { table: "relacion_nna", .. }));
}

#[tokio::test]
async fn relation_type_catalog_is_seeded_and_ordered() {
  let s = store().await;
  let types = s.list_relation_types().await.unwrap();

  assert!(!types.is_empty());
  assert!(types.iter().any(|t| t.name == "Madre"));
  assert!(
    types
      .windows(2)
      .all(|w| w[0].relation_type_id < w[1].relation_type_id)
  );
}
