//! Kinship edges: the NNA↔Familiar relationship graph.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A typed relationship link between a minor and a family member. All three
/// ids together form the edge's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinshipEdge {
  pub minor_id:         i64,
  pub family_member_id: i64,
  /// Reference into the `parentesco` catalog.
  pub relation_type_id: i64,
  pub cohabits:         bool,
}

impl KinshipEdge {
  /// A minor cannot be its own relative; checked before touching storage.
  pub fn validate(&self) -> Result<()> {
    if self.minor_id == self.family_member_id {
      return Err(Error::SelfKinship(self.minor_id));
    }
    Ok(())
  }
}

/// An edge joined through to the family member's name and the relation-type
/// label, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinshipEdgeRow {
  pub minor_id:           i64,
  pub family_member_id:   i64,
  pub family_member_name: String,
  pub is_guardian:        bool,
  pub relation_type_id:   i64,
  pub relation_type:      String,
  pub cohabits:           bool,
}

/// A kinship-relation type from the `parentesco` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationType {
  pub relation_type_id: i64,
  pub name:             String,
}
