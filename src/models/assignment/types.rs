#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Assignment {
    pub id: i64,
    pub committee: String,
    pub country: String,
    pub school_id: i64,
    pub rejected: bool,
}

/// Assignment joined with the advisor of its school, for ownership checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedAssignment {
    #[sqlx(flatten)]
    pub assignment: Assignment,
    pub advisor_id: i64,
}

pub struct AssignmentPage {
    pub assignments: Vec<Assignment>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
}

pub struct NewAssignment {
    pub committee: String,
    pub country: String,
    pub school_id: i64,
    pub rejected: bool,
}

#[derive(Debug, Clone)]
pub struct AssignmentChanges {
    pub committee: String,
    pub country: String,
    pub rejected: bool,
}
