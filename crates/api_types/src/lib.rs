use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod project {
    use super::*;

    /// Request body for creating a project.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
        pub description: String,
        /// Amount to collect, in minor units. Must be > 0.
        pub target_amount: i64,
    }

    /// Request body for partially updating an open project.
    ///
    /// Absent fields are left untouched. `target_amount` may not drop below
    /// the amount already collected.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProjectUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub target_amount: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub target_amount: i64,
        pub allocated_amount: i64,
        pub fully_funded: bool,
        pub opened_at: DateTime<Utc>,
        pub closed_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectsResponse {
        pub projects: Vec<ProjectView>,
    }
}

pub mod donation {
    use super::*;

    /// Request body for creating a donation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationNew {
        /// Donated amount, in minor units. Must be > 0.
        pub target_amount: i64,
        pub comment: Option<String>,
    }

    /// Full donation record, including the allocation bookkeeping.
    ///
    /// Only superusers see this shape.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationView {
        pub id: Uuid,
        pub user_id: String,
        pub comment: Option<String>,
        pub target_amount: i64,
        pub allocated_amount: i64,
        pub fully_funded: bool,
        pub opened_at: DateTime<Utc>,
        pub closed_at: Option<DateTime<Utc>>,
    }

    /// What a donor sees of their own donation: no allocation bookkeeping.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationOwnerView {
        pub id: Uuid,
        pub target_amount: i64,
        pub comment: Option<String>,
        pub opened_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationsResponse {
        pub donations: Vec<DonationView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OwnDonationsResponse {
        pub donations: Vec<DonationOwnerView>,
    }
}
