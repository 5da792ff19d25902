use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use super::transport::HttpTransport;
use crate::{
    error::ApiError,
    model::{Employee, EmployeeCreate, Listing, PageRequest},
    utils::{
        normalize::{decode_list, decode_one},
        validation::Validate,
    },
};

const EMPLOYEES: &str = "employees";

/// Typed operations on `/employees`.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    transport: HttpTransport,
}

impl EmployeeClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn list_all(&self, cancel: &CancellationToken) -> Result<Listing<Employee>, ApiError> {
        self.list_page(PageRequest::default(), cancel).await
    }

    #[instrument(skip(self, cancel))]
    pub async fn list_page(
        &self,
        paging: PageRequest,
        cancel: &CancellationToken,
    ) -> Result<Listing<Employee>, ApiError> {
        let raw = self
            .transport
            .get(&[EMPLOYEES], &paging.query_pairs(), cancel)
            .await?;
        decode_list(raw)
    }

    pub async fn get_one(&self, employee_id: &str, cancel: &CancellationToken) -> Result<Employee, ApiError> {
        let raw = self.transport.get(&[EMPLOYEES, employee_id], &[], cancel).await?;
        decode_one(raw)
    }

    /// Validates locally first; a server rejection keeps its detail text.
    #[instrument(skip_all, fields(employee_id = %payload.employee_id))]
    pub async fn create(&self, payload: &EmployeeCreate, cancel: &CancellationToken) -> Result<Employee, ApiError> {
        payload.validate()?;
        let raw = self
            .transport
            .post(&[EMPLOYEES], &payload.normalized(), cancel)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create employee"))?;

        let employee: Employee = decode_one(raw)?;
        info!(id = %employee.id, "Employee created");
        Ok(employee)
    }

    /// No retry; the caller re-fetches the list afterwards.
    pub async fn delete(&self, employee_id: &str, cancel: &CancellationToken) -> Result<(), ApiError> {
        self.transport
            .delete(&[EMPLOYEES, employee_id], cancel)
            .await
            .inspect_err(|e| error!(error = %e, employee_id, "Failed to delete employee"))?;
        info!(employee_id, "Employee deleted");
        Ok(())
    }
}
