use serde::{Deserialize, Serialize};

/// Point-in-time aggregate counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub total_attendance_records: u64,
    pub present_today: u64,
    pub absent_today: u64,
}

impl DashboardStats {
    /// Employees with no attendance marked for today.
    pub fn unmarked_today(&self) -> u64 {
        self.total_employees
            .saturating_sub(self.present_today.saturating_add(self.absent_today))
    }
}
