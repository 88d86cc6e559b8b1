//! Pledge taxonomy
//!
//! The closed sets of profile-type labels and commitment tags a pledge may
//! carry. Both sets are versioned together; any change to a label or tag
//! must bump [`TAXONOMY_VERSION`] and stay additive for stored records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the label/tag sets below
pub const TAXONOMY_VERSION: &str = "2025.1";

/// Who is making the pledge
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProfileType {
    #[serde(rename = "Student")]
    Student,
    #[serde(rename = "Working Professional")]
    WorkingProfessional,
    /// Older campaign forms used "Workshops"
    #[serde(rename = "Workshop Participant", alias = "Workshops")]
    WorkshopParticipant,
    #[serde(rename = "Other")]
    Other,
}

impl ProfileType {
    pub const ALL: [ProfileType; 4] = [
        ProfileType::Student,
        ProfileType::WorkingProfessional,
        ProfileType::WorkshopParticipant,
        ProfileType::Other,
    ];

    /// Canonical display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::WorkingProfessional => "Working Professional",
            Self::WorkshopParticipant => "Workshop Participant",
            Self::Other => "Other",
        }
    }

    /// Parse a submitted label. Matching is exact after trimming, except for
    /// the legacy "Workshops" spelling.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Student" => Some(Self::Student),
            "Working Professional" => Some(Self::WorkingProfessional),
            "Workshop Participant" | "Workshops" => Some(Self::WorkshopParticipant),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.label()).collect()
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Commitment theme a pledge signs up for
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Commitment {
    Energy,
    Transportation,
    Consumption,
}

impl Commitment {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Transportation => "Transportation",
            Self::Consumption => "Consumption",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "Energy" => Some(Self::Energy),
            "Transportation" => Some(Self::Transportation),
            "Consumption" => Some(Self::Consumption),
            _ => None,
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Keep only recognized tags, dropping duplicates and preserving the order
/// in which they were first seen.
pub fn filter_commitments<'a, I>(tags: I) -> Vec<Commitment>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut kept = Vec::new();
    for commitment in tags.into_iter().filter_map(Commitment::from_tag) {
        if !kept.contains(&commitment) {
            kept.push(commitment);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_labels_round_trip() {
        for profile in ProfileType::ALL {
            assert_eq!(ProfileType::from_label(profile.label()), Some(profile));
        }
        assert_eq!(ProfileType::labels().len(), 4);
    }

    #[test]
    fn test_legacy_workshop_spelling() {
        assert_eq!(
            ProfileType::from_label("Workshops"),
            Some(ProfileType::WorkshopParticipant)
        );

        let parsed: ProfileType = serde_json::from_str("\"Workshops\"").unwrap();
        assert_eq!(parsed, ProfileType::WorkshopParticipant);
        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            "\"Workshop Participant\""
        );
    }

    #[test]
    fn test_unknown_profile_rejected() {
        assert_eq!(ProfileType::from_label("Astronaut"), None);
        assert_eq!(ProfileType::from_label("student"), None);
        assert_eq!(ProfileType::from_label(""), None);
    }

    #[test]
    fn test_filter_commitments_drops_unknown_and_duplicates() {
        let kept = filter_commitments(["Consumption", "Bogus", "Energy", "Consumption"]);
        assert_eq!(kept, vec![Commitment::Consumption, Commitment::Energy]);
    }
}
