pub mod attendance;
pub mod employee;
pub mod transport;

pub use attendance::AttendanceClient;
pub use employee::EmployeeClient;
pub use transport::HttpTransport;

use crate::{config::Config, error::ApiError};

/// Both resource clients over one shared transport.
#[derive(Debug, Clone)]
pub struct HrmsClient {
    pub employees: EmployeeClient,
    pub attendance: AttendanceClient,
}

impl HrmsClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            employees: EmployeeClient::new(transport.clone()),
            attendance: AttendanceClient::new(transport),
        })
    }
}
