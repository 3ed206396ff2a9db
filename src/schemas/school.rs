use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::school::{School, SchoolFields};
use super::Merge;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SchoolResponse {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub advisor: i64,
    pub registered_at: DateTime<Utc>,
}

impl From<School> for SchoolResponse {
    fn from(s: School) -> Self {
        SchoolResponse {
            id: s.id,
            name: s.name,
            address: s.address,
            city: s.city,
            country: s.country,
            advisor: s.advisor_id,
            registered_at: s.registered_at,
        }
    }
}

/// Body for `POST /schools` and `PUT /schools/{id}`.
#[derive(Deserialize, Debug)]
pub struct SchoolRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl From<SchoolRequest> for SchoolFields {
    fn from(r: SchoolRequest) -> Self {
        SchoolFields {
            name: r.name.trim().to_string(),
            address: r.address.trim().to_string(),
            city: r.city.trim().to_string(),
            country: r.country.trim().to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct SchoolPatchRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Merge<School> for SchoolRequest {
    type Output = SchoolFields;

    fn merge(self, _current: &School) -> SchoolFields {
        self.into()
    }
}

impl Merge<School> for SchoolPatchRequest {
    type Output = SchoolFields;

    fn merge(self, current: &School) -> SchoolFields {
        let pick = |new: Option<String>, old: &str| new.map(|s| s.trim().to_string()).unwrap_or_else(|| old.to_string());
        SchoolFields {
            name: pick(self.name, &current.name),
            address: pick(self.address, &current.address),
            city: pick(self.city, &current.city),
            country: pick(self.country, &current.country),
        }
    }
}
