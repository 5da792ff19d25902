use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An employee as the server returns it. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Server-assigned opaque id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// User-assigned identity, unique across employees.
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    #[serde(with = "super::timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

impl EmployeeCreate {
    /// Trimmed copy with the identity upper-cased, matching how the server stores it.
    pub fn normalized(&self) -> Self {
        Self {
            employee_id: self.employee_id.trim().to_uppercase(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
        }
    }
}
