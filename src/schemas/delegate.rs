use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::delegate::{Delegate, DelegateChanges, NewDelegate};
use super::Merge;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DelegateResponse {
    pub id: i64,
    pub assignment: Option<i64>,
    pub school: i64,
    pub name: String,
    pub email: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl From<Delegate> for DelegateResponse {
    fn from(d: Delegate) -> Self {
        DelegateResponse {
            id: d.id,
            assignment: d.assignment_id,
            school: d.school_id,
            name: d.name,
            email: d.email,
            summary: d.summary,
            created_at: d.created_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct DelegateCreateRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub assignment: Option<i64>,
    pub school: i64,
}

impl From<DelegateCreateRequest> for NewDelegate {
    fn from(r: DelegateCreateRequest) -> Self {
        NewDelegate {
            name: r.name.trim().to_string(),
            email: r.email.trim().to_string(),
            summary: r.summary,
            assignment_id: r.assignment,
            school_id: r.school,
        }
    }
}

/// PUT body. Fields left out fall back to their defaults, not to the stored values.
#[derive(Deserialize, Debug)]
pub struct DelegateReplaceRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub assignment: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DelegatePatchRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub summary: Option<String>,
    pub assignment: Option<i64>,
}

impl Merge<Delegate> for DelegateReplaceRequest {
    type Output = DelegateChanges;

    fn merge(self, _current: &Delegate) -> DelegateChanges {
        DelegateChanges {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            summary: self.summary,
            assignment_id: self.assignment,
        }
    }
}

impl Merge<Delegate> for DelegatePatchRequest {
    type Output = DelegateChanges;

    fn merge(self, current: &Delegate) -> DelegateChanges {
        let mut changes = DelegateChanges::from(current);
        if let Some(name) = self.name {
            changes.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            changes.email = email.trim().to_string();
        }
        if let Some(summary) = self.summary {
            changes.summary = summary;
        }
        if self.assignment.is_some() {
            changes.assignment_id = self.assignment;
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Update;

    fn stored() -> Delegate {
        Delegate {
            id: 4,
            name: "Old Name".to_string(),
            email: "old@example.com".to_string(),
            summary: "Quiet.".to_string(),
            assignment_id: Some(9),
            school_id: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_update_keeps_omitted_fields() {
        let patch = DelegatePatchRequest {
            summary: Some("He did awful!".to_string()),
            ..Default::default()
        };
        let changes = Update::<DelegateReplaceRequest, _>::Partial(patch).apply(&stored());
        assert_eq!(changes.name, "Old Name");
        assert_eq!(changes.email, "old@example.com");
        assert_eq!(changes.summary, "He did awful!");
        assert_eq!(changes.assignment_id, Some(9));
    }

    #[test]
    fn test_full_update_resets_omitted_fields() {
        let body: DelegateReplaceRequest =
            serde_json::from_str(r#"{"name": "Trevor Dowds", "email": "tdowds@hotmail.org"}"#).unwrap();
        let changes = Update::<_, DelegatePatchRequest>::Full(body).apply(&stored());
        assert_eq!(changes.summary, "");
        assert_eq!(changes.assignment_id, None);
    }

    #[test]
    fn test_server_fields_in_body_are_ignored() {
        let body: DelegatePatchRequest = serde_json::from_str(
            r#"{"school": 99, "created_at": "2001-01-01T00:00:00Z", "id": 7}"#,
        )
        .unwrap();
        let changes = Update::<DelegateReplaceRequest, _>::Partial(body).apply(&stored());
        assert_eq!(changes, DelegateChanges::from(&stored()));
    }

    #[test]
    fn test_response_uses_foreign_key_names() {
        let json = serde_json::to_value(DelegateResponse::from(stored())).unwrap();
        assert_eq!(json["assignment"], 9);
        assert_eq!(json["school"], 2);
        assert!(json.get("school_id").is_none());
        assert!(json.get("created_at").is_some());
    }
}
