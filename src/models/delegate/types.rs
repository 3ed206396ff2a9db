use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Delegate {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub summary: String,
    pub assignment_id: Option<i64>,
    pub school_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Delegate joined with the advisor of its school, for ownership checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedDelegate {
    #[sqlx(flatten)]
    pub delegate: Delegate,
    pub advisor_id: i64,
}

pub struct DelegatePage {
    pub delegates: Vec<Delegate>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
}

pub struct NewDelegate {
    pub name: String,
    pub email: String,
    pub summary: String,
    pub assignment_id: Option<i64>,
    pub school_id: i64,
}

/// Fields a delegate update may touch. `school_id` and `created_at` are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegateChanges {
    pub name: String,
    pub email: String,
    pub summary: String,
    pub assignment_id: Option<i64>,
}

impl From<&Delegate> for DelegateChanges {
    fn from(d: &Delegate) -> Self {
        DelegateChanges {
            name: d.name.clone(),
            email: d.email.clone(),
            summary: d.summary.clone(),
            assignment_id: d.assignment_id,
        }
    }
}
