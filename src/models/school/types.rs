use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub advisor_id: i64,
    pub registered_at: DateTime<Utc>,
}

pub struct SchoolPage {
    pub schools: Vec<School>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
}

/// Writable school fields. Used for both creation and updates; the advisor
/// is fixed when the school is registered.
#[derive(Debug, Clone)]
pub struct SchoolFields {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
}
