//! Admin dashboard

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `GET /admin/dashboard` range; both ends YYYY-MM-DD, default last 30 days
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// department name -> employee count
    pub total_employees_per_dept: BTreeMap<String, i64>,
    /// departments whose `updated_at` falls in the range
    pub total_updated_depts: i64,
    /// profiles created today (business time zone)
    pub total_today_registrations: i64,
    pub start_date: String,
    pub end_date: String,
}
