//! Pledge document schema
//!
//! Layout of the `pledges` collection:
//! `{_id, name, email, mobile, state, profileType, commitments, message, createdAt}`.
//! New fields must be optional so existing documents keep deserializing.

use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::pledge::{CanonicalPledge, PledgeId, PublicPledgeView};
use crate::taxonomy::{filter_commitments, Commitment, ProfileType};

/// Default collection name for pledges
pub const PLEDGE_COLLECTION: &str = "pledges";

/// Pledge document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PledgeDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,

    pub email: String,

    pub mobile: String,

    #[serde(default)]
    pub state: String,

    pub profile_type: ProfileType,

    #[serde(default)]
    pub commitments: Vec<Commitment>,

    #[serde(default)]
    pub message: String,

    /// Missing on documents written by the legacy backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

impl PledgeDoc {
    /// Stamp a canonical pledge for insertion
    pub fn new(pledge: CanonicalPledge) -> Self {
        Self {
            id: Some(ObjectId::new()),
            name: pledge.name,
            email: pledge.email,
            mobile: pledge.mobile,
            state: pledge.state,
            profile_type: pledge.profile_type,
            commitments: pledge.commitments,
            message: pledge.message,
            created_at: Some(DateTime::now()),
        }
    }
}

impl IntoIndexes for PledgeDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Newest-first listing for the pledge wall
            (
                doc! { "createdAt": -1, "_id": -1 },
                Some(
                    IndexOptions::builder()
                        .name("created_at_desc".to_string())
                        .build(),
                ),
            ),
            // Per-profile KPI counts
            (
                doc! { "profileType": 1 },
                Some(
                    IndexOptions::builder()
                        .name("profile_type_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

/// Public projection of a pledge document (contact fields excluded).
///
/// Older writers stored `profileType` and `commitments` unchecked, so both
/// are read loosely and mapped onto the taxonomy in [`Self::into_view`].
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicPledgeDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub profile_type: String,

    #[serde(default)]
    pub commitments: Bson,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub created_at: Option<DateTime>,
}

impl PublicPledgeDoc {
    /// Projection document that drops contact fields server-side
    pub fn projection() -> Document {
        doc! { "email": 0, "mobile": 0 }
    }

    /// Map onto the public view, or None when the profile label is unknown.
    ///
    /// Unknown or non-string commitment tags are dropped.
    pub fn into_view(self) -> Option<PublicPledgeView> {
        let profile_type = ProfileType::from_label(&self.profile_type)?;
        let commitments = match &self.commitments {
            Bson::Array(items) => filter_commitments(items.iter().filter_map(Bson::as_str)),
            _ => Vec::new(),
        };

        // Legacy documents fall back to the time encoded in their ObjectId
        let created_at = self.created_at.unwrap_or_else(|| self.id.timestamp());
        Some(PublicPledgeView {
            id: PledgeId::from(self.id),
            name: self.name,
            state: self.state,
            profile_type,
            commitments,
            message: self.message,
            created_at: created_at.to_chrono(),
        })
    }
}

/// Filter matching documents whose profile label is in the taxonomy
pub fn known_profile_filter() -> Document {
    let mut labels = ProfileType::labels();
    labels.push("Workshops");
    doc! { "profileType": { "$in": labels } }
}

/// Filter matching every stored spelling of a profile type
pub fn profile_type_filter(profile_type: ProfileType) -> Document {
    match profile_type {
        ProfileType::WorkshopParticipant => doc! {
            "profileType": { "$in": [profile_type.label(), "Workshops"] }
        },
        _ => doc! { "profileType": profile_type.label() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> CanonicalPledge {
        CanonicalPledge {
            name: "Janice Fernandes".into(),
            email: "janice@example.com".into(),
            mobile: "1234567890".into(),
            state: "Maharashtra".into(),
            profile_type: ProfileType::WorkingProfessional,
            commitments: vec![Commitment::Energy, Commitment::Transportation],
            message: String::new(),
        }
    }

    #[test]
    fn test_document_layout() {
        let doc = bson::to_document(&PledgeDoc::new(canonical())).unwrap();
        assert!(doc.get_object_id("_id").is_ok());
        assert_eq!(doc.get_str("profileType").unwrap(), "Working Professional");
        assert!(doc.get_datetime("createdAt").is_ok());
        assert_eq!(doc.get_array("commitments").unwrap().len(), 2);
    }

    #[test]
    fn test_legacy_document_reads_with_oid_timestamp() {
        let oid = ObjectId::new();
        let legacy = doc! {
            "_id": oid,
            "name": "Diya Gupta",
            "state": "Karnataka",
            "profileType": "Workshops",
            "commitments": ["Energy", "Transportation", "Consumption"],
            "date": "19-07-2025",
        };

        let parsed: PublicPledgeDoc = bson::from_document(legacy).unwrap();
        let view = parsed.into_view().unwrap();
        assert_eq!(view.profile_type, ProfileType::WorkshopParticipant);
        assert_eq!(view.created_at, oid.timestamp().to_chrono());
        assert_eq!(view.message, "");
    }

    #[test]
    fn test_unknown_commitment_tags_dropped_on_read() {
        let stored = doc! {
            "_id": ObjectId::new(),
            "name": "Asha",
            "profileType": "Student",
            "commitments": ["Energy", "Bogus", 7, "Energy"],
            "createdAt": DateTime::now(),
        };

        let parsed: PublicPledgeDoc = bson::from_document(stored).unwrap();
        let view = parsed.into_view().unwrap();
        assert_eq!(view.profile_type, ProfileType::Student);
        assert_eq!(view.commitments, vec![Commitment::Energy]);
    }

    #[test]
    fn test_unknown_profile_label_reads_but_is_skipped() {
        let stored = doc! {
            "_id": ObjectId::new(),
            "name": "Ravi",
            "profileType": "Teacher",
            "commitments": "Energy",
            "createdAt": DateTime::now(),
        };

        let parsed: PublicPledgeDoc = bson::from_document(stored).unwrap();
        assert_eq!(parsed.profile_type, "Teacher");
        assert!(parsed.into_view().is_none());
    }

    #[test]
    fn test_known_profile_filter_lists_every_label() {
        let filter = known_profile_filter();
        let labels: Vec<&str> = filter
            .get_document("profileType")
            .unwrap()
            .get_array("$in")
            .unwrap()
            .iter()
            .filter_map(Bson::as_str)
            .collect();
        assert_eq!(
            labels,
            vec!["Student", "Working Professional", "Workshop Participant", "Other", "Workshops"]
        );
    }

    #[test]
    fn test_workshop_filter_includes_legacy_label() {
        let filter = profile_type_filter(ProfileType::WorkshopParticipant);
        let labels = filter
            .get_document("profileType")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert_eq!(labels.len(), 2);

        let student = profile_type_filter(ProfileType::Student);
        assert_eq!(student.get_str("profileType").unwrap(), "Student");
    }
}
