// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const CLAIM_SUBJECT: &str = "subject_id";
pub const CLAIM_EXPIRY: &str = "exp";
pub const CLAIM_TYPE: &str = "type";

/// Kind of token. Access tokens authenticate requests; refresh tokens can
/// only be exchanged for a new pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the claims map carried inside a token.
///
/// The subject id is serialized as a decimal string.
pub fn build_claims(subject_id: i64, expires_at: DateTime<Utc>, kind: TokenKind) -> Map<String, Value> {
    let mut claims = Map::new();
    claims.insert(CLAIM_SUBJECT.into(), Value::String(subject_id.to_string()));
    claims.insert(CLAIM_EXPIRY.into(), Value::from(expires_at.timestamp()));
    claims.insert(CLAIM_TYPE.into(), Value::String(kind.as_str().into()));
    claims
}

/// Reasons a decrypted claims map is rejected. Only used for logging;
/// callers see a single invalid-token failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsRejection {
    KindMismatch,
    MissingExpiry,
    InvalidExpiry,
    Expired,
    InvalidSubject,
}

/// Check a claims map against the expected kind and the current time, and
/// return the subject id.
///
/// Expiry is exclusive: a token whose `exp` equals `now` is expired.
pub fn check_claims(
    claims: &Map<String, Value>,
    expected: TokenKind,
    now: DateTime<Utc>,
) -> Result<i64, ClaimsRejection> {
    match claims.get(CLAIM_TYPE).and_then(Value::as_str) {
        Some(kind) if kind == expected.as_str() => {}
        _ => return Err(ClaimsRejection::KindMismatch),
    }

    let exp = claims
        .get(CLAIM_EXPIRY)
        .ok_or(ClaimsRejection::MissingExpiry)?;
    let exp = match exp {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or(ClaimsRejection::InvalidExpiry)?,
        _ => return Err(ClaimsRejection::InvalidExpiry),
    };
    if exp <= now.timestamp() {
        return Err(ClaimsRejection::Expired);
    }

    claims
        .get(CLAIM_SUBJECT)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(ClaimsRejection::InvalidSubject)
}

/// Authenticated principal attached to a request by the authentication
/// middleware.
///
/// Holds the subject id in its string form, as carried in the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    pub fn new(subject_id: i64) -> Self {
        Self(subject_id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the principal back into an administrator id.
    pub fn admin_id(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Principal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn claims(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn build_claims_uses_string_subject() {
        let exp = Utc::now() + Duration::minutes(5);
        let built = build_claims(7, exp, TokenKind::Refresh);
        assert_eq!(built[CLAIM_SUBJECT], json!("7"));
        assert_eq!(built[CLAIM_EXPIRY], json!(exp.timestamp()));
        assert_eq!(built[CLAIM_TYPE], json!("refresh"));
    }

    #[test]
    fn check_claims_accepts_valid_map() {
        let now = Utc::now();
        let map = build_claims(42, now + Duration::seconds(1), TokenKind::Access);
        assert_eq!(check_claims(&map, TokenKind::Access, now), Ok(42));
    }

    #[test]
    fn check_claims_accepts_float_expiry() {
        let now = Utc::now();
        let exp = (now.timestamp() + 60) as f64 + 0.5;
        let map = claims(json!({ "subject_id": "3", "exp": exp, "type": "access" }));
        assert_eq!(check_claims(&map, TokenKind::Access, now), Ok(3));
    }

    #[test]
    fn check_claims_rejects_each_defect() {
        let now = Utc::now();
        let future = now.timestamp() + 60;
        let cases = [
            (json!({ "subject_id": "1", "exp": future }), ClaimsRejection::KindMismatch),
            (json!({ "subject_id": "1", "exp": future, "type": "refresh" }), ClaimsRejection::KindMismatch),
            (json!({ "subject_id": "1", "exp": future, "type": 5 }), ClaimsRejection::KindMismatch),
            (json!({ "subject_id": "1", "type": "access" }), ClaimsRejection::MissingExpiry),
            (json!({ "subject_id": "1", "exp": "soon", "type": "access" }), ClaimsRejection::InvalidExpiry),
            (json!({ "subject_id": "1", "exp": now.timestamp(), "type": "access" }), ClaimsRejection::Expired),
            (json!({ "exp": future, "type": "access" }), ClaimsRejection::InvalidSubject),
            (json!({ "subject_id": 1, "exp": future, "type": "access" }), ClaimsRejection::InvalidSubject),
            (json!({ "subject_id": "abc", "exp": future, "type": "access" }), ClaimsRejection::InvalidSubject),
        ];

        for (value, expected) in cases {
            let map = claims(value.clone());
            assert_eq!(
                check_claims(&map, TokenKind::Access, now),
                Err(expected),
                "claims {value}"
            );
        }
    }

    #[test]
    fn principal_round_trips_admin_id() {
        let principal = Principal::new(99);
        assert_eq!(principal.as_str(), "99");
        assert_eq!(principal.admin_id(), Some(99));
        assert!(!principal.is_empty());

        let broken = Principal::from("x".to_string());
        assert_eq!(broken.admin_id(), None);
    }
}
