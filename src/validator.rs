//! Pledge validation
//!
//! Turns a raw JSON submission into a [`CanonicalPledge`] or explains why it
//! was rejected. Pure: nothing here touches the store.

use serde_json::{Map, Value};

use crate::pledge::CanonicalPledge;
use crate::taxonomy::{filter_commitments, ProfileType};
use crate::types::{PledgeError, Result};

/// Required fields, in the order they are reported when missing
pub const REQUIRED_FIELDS: [&str; 5] = ["name", "email", "mobile", "profileType", "commitments"];

/// Validate and normalize a raw submission.
///
/// Every missing required field is reported at once. A present but
/// unrecognized `profileType` is only reported when nothing is missing.
pub fn validate(raw: &Value) -> Result<CanonicalPledge> {
    let Some(fields) = raw.as_object() else {
        return Err(PledgeError::BadRequest(
            "Pledge submission must be a JSON object".to_string(),
        ));
    };

    let name = text_field(fields, "name");
    let email = text_field(fields, "email");
    let mobile = text_field(fields, "mobile");
    let profile_type = text_field(fields, "profileType");
    let commitments = fields.get("commitments").filter(|v| is_present(v));

    let missing: Vec<String> = [
        ("name", name.is_some()),
        ("email", email.is_some()),
        ("mobile", mobile.is_some()),
        ("profileType", profile_type.is_some()),
        ("commitments", commitments.is_some()),
    ]
    .into_iter()
    .filter(|(_, present)| !present)
    .map(|(field, _)| field.to_string())
    .collect();

    let (Some(name), Some(email), Some(mobile), Some(profile_label), Some(commitments)) =
        (name, email, mobile, profile_type, commitments)
    else {
        return Err(PledgeError::MissingFields(missing));
    };

    let profile_type =
        ProfileType::from_label(&profile_label).ok_or_else(|| PledgeError::InvalidEnum {
            field: "profileType".to_string(),
            value: profile_label.clone(),
            allowed: ProfileType::labels(),
        })?;

    // Anything other than an array of strings is treated as no commitments
    let commitments = match commitments {
        Value::Array(items) => filter_commitments(items.iter().filter_map(Value::as_str)),
        _ => Vec::new(),
    };

    Ok(CanonicalPledge {
        name,
        email: email.to_lowercase(),
        mobile,
        state: text_field(fields, "state").unwrap_or_default(),
        profile_type,
        commitments,
        message: text_field(fields, "message").unwrap_or_default(),
    })
}

/// Trimmed text of a scalar field, or None when absent, null, blank, or not
/// a string/integer.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match fields.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}
