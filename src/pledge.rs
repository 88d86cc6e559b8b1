//! Pledge records
//!
//! Three shapes of the same entity:
//! - [`CanonicalPledge`]: validated and normalized, not yet stored
//! - [`StoredPledge`]: persisted, with identity and creation time
//! - [`PublicPledgeView`]: what the public pledge wall may see

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::taxonomy::{Commitment, ProfileType};

/// Opaque pledge identifier assigned by the store (24 hex digits)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PledgeId(String);

impl PledgeId {
    /// Allocate a fresh identifier
    pub fn generate() -> Self {
        Self(ObjectId::new().to_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ObjectId> for PledgeId {
    fn from(oid: ObjectId) -> Self {
        Self(oid.to_hex())
    }
}

impl fmt::Display for PledgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pledge after validation, ready to be stored
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPledge {
    pub name: String,
    /// Trimmed and lower-cased
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub state: String,
    pub profile_type: ProfileType,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    #[serde(default)]
    pub message: String,
}

/// A persisted pledge. Never updated after insertion.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPledge {
    pub id: PledgeId,
    #[serde(flatten)]
    pub pledge: CanonicalPledge,
    pub created_at: DateTime<Utc>,
}

impl StoredPledge {
    pub fn new(id: PledgeId, pledge: CanonicalPledge, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            pledge,
            created_at,
        }
    }

    /// Project to the public view, dropping contact fields
    pub fn to_public(&self) -> PublicPledgeView {
        PublicPledgeView {
            id: self.id.clone(),
            name: self.pledge.name.clone(),
            state: self.pledge.state.clone(),
            profile_type: self.pledge.profile_type,
            commitments: self.pledge.commitments.clone(),
            message: self.pledge.message.clone(),
            created_at: self.created_at,
        }
    }
}

/// Pledge projection safe for public display (no email, no mobile)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicPledgeView {
    pub id: PledgeId,
    pub name: String,
    pub state: String,
    pub profile_type: ProfileType,
    pub commitments: Vec<Commitment>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredPledge {
        StoredPledge::new(
            PledgeId::generate(),
            CanonicalPledge {
                name: "Diya Gupta".into(),
                email: "diya@example.com".into(),
                mobile: "7654321098".into(),
                state: "Karnataka".into(),
                profile_type: ProfileType::WorkshopParticipant,
                commitments: vec![Commitment::Energy, Commitment::Consumption],
                message: String::new(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_generated_ids_are_unique_hex() {
        let a = PledgeId::generate();
        let b = PledgeId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 24);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_public_view_has_no_contact_fields() {
        let view = serde_json::to_value(sample().to_public()).unwrap();
        let obj = view.as_object().unwrap();
        assert!(!obj.contains_key("email"));
        assert!(!obj.contains_key("mobile"));
        assert_eq!(obj["profileType"], "Workshop Participant");
        assert_eq!(obj["commitments"], serde_json::json!(["Energy", "Consumption"]));
    }

    #[test]
    fn test_stored_pledge_serializes_flat() {
        let stored = sample();
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["email"], "diya@example.com");
        assert!(value.get("pledge").is_none());

        let back: StoredPledge = serde_json::from_value(value).unwrap();
        assert_eq!(back, stored);
    }
}
