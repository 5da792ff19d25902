use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::page::PageRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One day's attendance mark for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Identity of the employee, not an owning reference.
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(with = "super::timestamp")]
    pub created_at: NaiveDateTime,
}

/// Present and Absent totals over a set of listed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub present: usize,
    pub absent: usize,
}

impl StatusCounts {
    pub fn of(records: &[Attendance]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut counts, record| {
                match record.status {
                    AttendanceStatus::Present => counts.present += 1,
                    AttendanceStatus::Absent => counts.absent += 1,
                }
                counts
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCreate {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceCreate {
    pub fn normalized(&self) -> Self {
        Self {
            employee_id: self.employee_id.trim().to_uppercase(),
            ..self.clone()
        }
    }
}

/// Restrictions for the attendance list. Every unset dimension is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub paging: PageRequest,
}

impl AttendanceFilter {
    pub fn employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn paging(mut self, paging: PageRequest) -> Self {
        self.paging = paging;
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(employee_id) = &self.employee_id {
            pairs.push(("employee_id", employee_id.clone()));
        }
        if let Some(date) = self.date {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        pairs.extend(self.paging.query_pairs());
        pairs
    }
}
