//! HTTP API module for the bar payroll service.
//!
//! This module exposes the payroll workspace, salary calculation and
//! payroll history as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AddEmployeeRequest, PeriodKeyQuery, UpdateEmployeeRequest};
pub use response::{
    ApiError, ApiErrorResponse, DeletePeriodResponse, SalariesResponse, SavePayrollResponse,
};
pub use state::AppState;
