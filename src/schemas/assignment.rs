use serde::{Deserialize, Serialize};

use crate::models::assignment::{Assignment, AssignmentChanges, NewAssignment};
use super::Merge;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AssignmentResponse {
    pub id: i64,
    pub committee: String,
    pub country: String,
    pub school: i64,
    pub rejected: bool,
}

impl From<Assignment> for AssignmentResponse {
    fn from(a: Assignment) -> Self {
        AssignmentResponse {
            id: a.id,
            committee: a.committee,
            country: a.country,
            school: a.school_id,
            rejected: a.rejected,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AssignmentCreateRequest {
    pub committee: String,
    pub country: String,
    pub school: i64,
    #[serde(default)]
    pub rejected: bool,
}

impl From<AssignmentCreateRequest> for NewAssignment {
    fn from(r: AssignmentCreateRequest) -> Self {
        NewAssignment {
            committee: r.committee.trim().to_string(),
            country: r.country.trim().to_string(),
            school_id: r.school,
            rejected: r.rejected,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AssignmentReplaceRequest {
    pub committee: String,
    pub country: String,
    #[serde(default)]
    pub rejected: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct AssignmentPatchRequest {
    pub committee: Option<String>,
    pub country: Option<String>,
    pub rejected: Option<bool>,
}

impl Merge<Assignment> for AssignmentReplaceRequest {
    type Output = AssignmentChanges;

    fn merge(self, _current: &Assignment) -> AssignmentChanges {
        AssignmentChanges {
            committee: self.committee.trim().to_string(),
            country: self.country.trim().to_string(),
            rejected: self.rejected,
        }
    }
}

impl Merge<Assignment> for AssignmentPatchRequest {
    type Output = AssignmentChanges;

    fn merge(self, current: &Assignment) -> AssignmentChanges {
        AssignmentChanges {
            committee: self
                .committee
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| current.committee.clone()),
            country: self
                .country
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| current.country.clone()),
            rejected: self.rejected.unwrap_or(current.rejected),
        }
    }
}
