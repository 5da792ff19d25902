use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use super::transport::HttpTransport;
use crate::{
    dashboard::StatsSource,
    error::ApiError,
    model::{Attendance, AttendanceCreate, AttendanceFilter, DashboardStats, Listing, PageRequest},
    utils::{
        normalize::{decode_list, decode_one},
        validation::Validate,
    },
};

const ATTENDANCE: &str = "attendance";

/// Typed operations on `/attendance`, including the dashboard statistics.
#[derive(Debug, Clone)]
pub struct AttendanceClient {
    transport: HttpTransport,
}

impl AttendanceClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Unset filter fields are not sent, so `AttendanceFilter::default()`
    /// lists every record.
    #[instrument(skip(self, cancel))]
    pub async fn list_all(
        &self,
        filter: &AttendanceFilter,
        cancel: &CancellationToken,
    ) -> Result<Listing<Attendance>, ApiError> {
        let raw = self
            .transport
            .get(&[ATTENDANCE], &filter.query_pairs(), cancel)
            .await?;
        decode_list(raw)
    }

    pub async fn list_by_employee(
        &self,
        employee_id: &str,
        paging: PageRequest,
        cancel: &CancellationToken,
    ) -> Result<Listing<Attendance>, ApiError> {
        let raw = self
            .transport
            .get(&[ATTENDANCE, "employee", employee_id], &paging.query_pairs(), cancel)
            .await?;
        decode_list(raw)
    }

    pub async fn get_one(&self, attendance_id: &str, cancel: &CancellationToken) -> Result<Attendance, ApiError> {
        let raw = self
            .transport
            .get(&[ATTENDANCE, attendance_id], &[], cancel)
            .await?;
        decode_one(raw)
    }

    #[instrument(skip_all, fields(employee_id = %payload.employee_id, date = %payload.date))]
    pub async fn create(&self, payload: &AttendanceCreate, cancel: &CancellationToken) -> Result<Attendance, ApiError> {
        payload.validate()?;
        let raw = self
            .transport
            .post(&[ATTENDANCE], &payload.normalized(), cancel)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to mark attendance"))?;

        let record: Attendance = decode_one(raw)?;
        info!(id = %record.id, status = %record.status, "Attendance marked");
        Ok(record)
    }

    pub async fn delete(&self, attendance_id: &str, cancel: &CancellationToken) -> Result<(), ApiError> {
        self.transport
            .delete(&[ATTENDANCE, attendance_id], cancel)
            .await
            .inspect_err(|e| error!(error = %e, attendance_id, "Failed to delete attendance"))?;
        info!(attendance_id, "Attendance deleted");
        Ok(())
    }

    pub async fn dashboard_stats(&self, cancel: &CancellationToken) -> Result<DashboardStats, ApiError> {
        let raw = self
            .transport
            .get(&[ATTENDANCE, "stats", "dashboard"], &[], cancel)
            .await?;
        decode_one(raw)
    }
}

#[async_trait]
impl StatsSource for AttendanceClient {
    async fn fetch_stats(&self, cancel: &CancellationToken) -> Result<DashboardStats, ApiError> {
        self.dashboard_stats(cancel).await
    }
}
