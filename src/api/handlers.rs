//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.
//! Store access is blocking, so every store call runs on the blocking pool.

use std::collections::HashSet;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{aggregate_by_employee, aggregate_by_period};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Employee, EmployeeStats, FormulaConfig, HistoryFilter, PayrollHistoryRecord, PayrollPeriod,
    SavedPeriod,
};
use crate::workspace::PayrollWorkspace;

use super::request::{AddEmployeeRequest, PeriodKeyQuery, UpdateEmployeeRequest};
use super::response::{
    ApiError, ApiErrorResponse, DeletePeriodResponse, SalariesResponse, SavePayrollResponse,
};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/formula", get(get_formula_handler).put(put_formula_handler))
        .route(
            "/employees",
            get(list_employees_handler)
                .put(replace_employees_handler)
                .post(add_employee_handler),
        )
        .route(
            "/employees/:id",
            patch(update_employee_handler).delete(remove_employee_handler),
        )
        .route("/period", get(get_period_handler).put(put_period_handler))
        .route("/salaries", get(salaries_handler))
        .route("/payroll/save", post(save_payroll_handler))
        .route("/history", get(history_handler))
        .route("/history/employees", get(employee_stats_handler))
        .route(
            "/history/periods",
            get(saved_periods_handler).delete(delete_period_handler),
        )
        .with_state(state)
}

/// Runs a blocking store operation off the async workers.
async fn run_blocking<T, F>(operation: F) -> PayrollResult<T>
where
    F: FnOnce() -> PayrollResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|err| PayrollError::storage("worker", err.to_string()))?
}

async fn load_workspace(state: &AppState) -> PayrollResult<PayrollWorkspace> {
    let store = state.store();
    let default_formula = state.config().default_formula().clone();
    run_blocking(move || PayrollWorkspace::load(store.as_ref(), &default_formula)).await
}

/// Loads the workspace, applies `edit` and saves the result.
///
/// The workspace lock is held throughout, so concurrent edits never
/// overwrite each other. Nothing is saved when `edit` fails.
async fn update_workspace<T, F>(state: &AppState, edit: F) -> PayrollResult<T>
where
    F: FnOnce(&mut PayrollWorkspace) -> PayrollResult<T> + Send + 'static,
    T: Send + 'static,
{
    let _guard = state.lock_workspace().await;
    let store = state.store();
    let default_formula = state.config().default_formula().clone();
    run_blocking(move || {
        let mut workspace = PayrollWorkspace::load(store.as_ref(), &default_formula)?;
        let value = edit(&mut workspace)?;
        workspace.save(store.as_ref())?;
        Ok(value)
    })
    .await
}

/// Logs a failed request and converts the error for the response.
fn failure(correlation_id: Uuid, err: PayrollError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    err.into()
}

fn body_or_reject<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse::bad_request(error))
        }
    }
}

fn query_or_reject<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> ApiResult<T> {
    query.map(|Query(params)| params).map_err(|rejection| {
        let body_text = rejection.body_text();
        warn!(
            correlation_id = %correlation_id,
            error = %body_text,
            "Invalid query string"
        );
        ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
    })
}

/// Handler for GET /formula.
async fn get_formula_handler(State(state): State<AppState>) -> ApiResult<Json<FormulaConfig>> {
    let correlation_id = Uuid::new_v4();
    let workspace = load_workspace(&state)
        .await
        .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(workspace.formula))
}

/// Handler for PUT /formula.
///
/// Unparseable amounts in the body are stored as zero.
async fn put_formula_handler(
    State(state): State<AppState>,
    payload: Result<Json<FormulaConfig>, JsonRejection>,
) -> ApiResult<Json<FormulaConfig>> {
    let correlation_id = Uuid::new_v4();
    let formula = body_or_reject(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        shift_rate = %formula.shift_rate,
        bar_percentage = %formula.bar_percentage,
        "Saving formula"
    );

    let formula = update_workspace(&state, move |workspace| {
        workspace.formula = formula;
        Ok(workspace.formula.clone())
    })
    .await
    .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(formula))
}

/// Handler for GET /employees.
async fn list_employees_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let correlation_id = Uuid::new_v4();
    let workspace = load_workspace(&state)
        .await
        .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(workspace.employees))
}

/// Handler for PUT /employees.
///
/// Replaces the whole roster. Ids must be unique.
async fn replace_employees_handler(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Employee>>, JsonRejection>,
) -> ApiResult<Json<Vec<Employee>>> {
    let correlation_id = Uuid::new_v4();
    let employees = body_or_reject(correlation_id, payload)?;

    let mut seen = HashSet::new();
    if let Some(duplicate) = employees.iter().find(|e| !seen.insert(e.id.as_str())) {
        warn!(
            correlation_id = %correlation_id,
            employee_id = %duplicate.id,
            "Duplicate employee id"
        );
        return Err(ApiErrorResponse::bad_request(ApiError::validation_error(
            format!("Duplicate employee id: {}", duplicate.id),
        )));
    }

    info!(
        correlation_id = %correlation_id,
        employees = employees.len(),
        "Replacing roster"
    );
    let employees = update_workspace(&state, move |workspace| {
        workspace.employees = employees;
        Ok(workspace.employees.clone())
    })
    .await
    .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(employees))
}

/// Handler for POST /employees.
async fn add_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddEmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let request = body_or_reject(correlation_id, payload)?;

    let employee = update_workspace(&state, move |workspace| {
        Ok(workspace.add_employee(request.name).clone())
    })
    .await
    .map_err(|err| failure(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        "Added employee"
    );
    Ok(Json(employee))
}

/// Handler for PATCH /employees/:id.
///
/// Sets one field from user text; numeric fields fall back to zero on
/// unparseable input.
async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let request = body_or_reject(correlation_id, payload)?;

    let field = request.field;
    let value = request.value_text();
    let employee = update_workspace(&state, move |workspace| {
        workspace.update_employee(&id, field, &value).cloned()
    })
    .await
    .map_err(|err| failure(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee.id,
        field = ?field,
        "Updated employee"
    );
    Ok(Json(employee))
}

/// Handler for DELETE /employees/:id.
async fn remove_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let removed = update_workspace(&state, move |workspace| workspace.remove_employee(&id))
        .await
        .map_err(|err| failure(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %removed.id,
        "Removed employee"
    );
    Ok(Json(removed))
}

/// Handler for GET /period.
async fn get_period_handler(State(state): State<AppState>) -> ApiResult<Json<PayrollPeriod>> {
    let correlation_id = Uuid::new_v4();
    let workspace = load_workspace(&state)
        .await
        .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(workspace.period))
}

/// Handler for PUT /period.
async fn put_period_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollPeriod>, JsonRejection>,
) -> ApiResult<Json<PayrollPeriod>> {
    let correlation_id = Uuid::new_v4();
    let period = body_or_reject(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        period_start = %period.start_date,
        period_end = %period.end_date,
        "Saving period"
    );

    let period = update_workspace(&state, move |workspace| {
        workspace.period = period;
        Ok(workspace.period)
    })
    .await
    .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(period))
}

/// Handler for GET /salaries.
///
/// Computes every salary from the saved workspace without persisting
/// anything.
async fn salaries_handler(State(state): State<AppState>) -> ApiResult<Response> {
    let correlation_id = Uuid::new_v4();
    let workspace = load_workspace(&state)
        .await
        .map_err(|err| failure(correlation_id, err))?;

    let start_time = Instant::now();
    let salaries = workspace.salaries();
    let total = crate::calculation::payroll_total(&salaries);
    info!(
        correlation_id = %correlation_id,
        employees = salaries.len(),
        total_payroll = %total,
        duration_us = start_time.elapsed().as_micros(),
        "Calculated salaries"
    );

    let response = SalariesResponse::new(workspace.period, &workspace.formula, salaries, total);
    Ok(Json(response).into_response())
}

/// Handler for POST /payroll/save.
///
/// Appends one history record per employee. A second save while one is
/// running is refused with `409 Conflict`.
async fn save_payroll_handler(State(state): State<AppState>) -> ApiResult<Json<SavePayrollResponse>> {
    let correlation_id = Uuid::new_v4();
    let _guard = state
        .begin_save()
        .map_err(|err| failure(correlation_id, err))?;
    info!(correlation_id = %correlation_id, "Saving payroll to history");

    let start_time = Instant::now();
    let workspace = {
        let _workspace_guard = state.lock_workspace().await;
        load_workspace(&state)
            .await
            .map_err(|err| failure(correlation_id, err))?
    };
    let records = workspace.history_snapshot(Utc::now());
    let response = SavePayrollResponse {
        period: workspace.period,
        records_saved: records.len(),
        total_payroll: workspace.total_payroll(),
    };

    let store = state.store();
    run_blocking(move || store.append_history_records(&records))
        .await
        .map_err(|err| failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        records = response.records_saved,
        total_payroll = %response.total_payroll,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll saved"
    );
    Ok(Json(response))
}

/// Handler for GET /history.
///
/// Accepts `period_start`, `period_end` and `employee_name` query filters.
async fn history_handler(
    State(state): State<AppState>,
    query: Result<Query<HistoryFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<PayrollHistoryRecord>>> {
    let correlation_id = Uuid::new_v4();
    let filter = query_or_reject(correlation_id, query)?;

    let store = state.store();
    let records = run_blocking(move || store.load_history_records(&filter))
        .await
        .map_err(|err| failure(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        records = records.len(),
        "Loaded history"
    );
    Ok(Json(records))
}

async fn load_all_history(state: &AppState) -> PayrollResult<Vec<PayrollHistoryRecord>> {
    let store = state.store();
    run_blocking(move || store.load_history_records(&HistoryFilter::default())).await
}

/// Handler for GET /history/employees.
async fn employee_stats_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EmployeeStats>>> {
    let correlation_id = Uuid::new_v4();
    let records = load_all_history(&state)
        .await
        .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(aggregate_by_employee(&records)))
}

/// Handler for GET /history/periods.
async fn saved_periods_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SavedPeriod>>> {
    let correlation_id = Uuid::new_v4();
    let records = load_all_history(&state)
        .await
        .map_err(|err| failure(correlation_id, err))?;
    Ok(Json(aggregate_by_period(&records)))
}

/// Handler for DELETE /history/periods?start=..&end=..
async fn delete_period_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodKeyQuery>, QueryRejection>,
) -> ApiResult<Json<DeletePeriodResponse>> {
    let correlation_id = Uuid::new_v4();
    let key = query_or_reject(correlation_id, query)?;

    let store = state.store();
    let removed = run_blocking(move || store.delete_history_records(key.start, key.end))
        .await
        .map_err(|err| failure(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        period_start = %key.start,
        period_end = %key.end,
        removed,
        "Deleted saved period"
    );
    Ok(Json(DeletePeriodResponse { removed }))
}
