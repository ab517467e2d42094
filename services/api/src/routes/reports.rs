//! Water report handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use crate::{
    authz::{Action, Identity, authorize, report_scope},
    error::{ApiError, ApiResult},
    extract::{ApiJson, parse_id},
    models::report::{CreateReportRequest, ReportScope, UpdateReportRequest},
    repositories::RECENT_REPORTS_LIMIT,
    state::AppState,
    validation::{parse_report_changes, validate_new_report},
};

fn report_not_found() -> ApiError {
    ApiError::NotFound("Report not found".to_string())
}

/// Reports visible to the caller: everything for admins, own reports otherwise
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::ListReports)?;

    let reports = state
        .reports
        .list(report_scope(&identity))
        .await
        .map_err(ApiError::internal("Failed to fetch reports"))?;

    Ok(Json(reports))
}

/// The caller's own reports, regardless of role
pub async fn list_own_reports(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::ListReports)?;

    let reports = state
        .reports
        .list(ReportScope::OwnedBy(identity.id))
        .await
        .map_err(ApiError::internal("Failed to fetch user reports"))?;

    Ok(Json(reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "report")?;

    let report = state
        .reports
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to fetch report"))?
        .ok_or_else(report_not_found)?;

    authorize(
        &identity,
        Action::ReadReport {
            owner: report.user_id,
        },
    )?;

    Ok(Json(report))
}

/// Submit a report owned by the caller; it starts out `PENDING`
pub async fn create_report(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(payload): ApiJson<CreateReportRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::CreateReport)?;

    let new_report = validate_new_report(payload, identity.id).map_err(ApiError::BadRequest)?;

    let report = state
        .reports
        .create(&new_report)
        .await
        .map_err(ApiError::internal("Failed to create report"))?;

    info!("User {} submitted report {}", identity.email, report.id);
    Ok((StatusCode::CREATED, Json(report)))
}

/// Change status and/or assignee, notifying the owner of a status change
pub async fn update_report(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateReportRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::UpdateReport)?;

    let id = parse_id(&id, "report")?;
    let changes = parse_report_changes(payload).map_err(ApiError::BadRequest)?;

    let update = state
        .reports
        .update(id, &changes)
        .await
        .map_err(ApiError::internal("Failed to update report"))?
        .ok_or_else(report_not_found)?;
    let report = update.report;

    info!("Report {} updated by {}", report.id, identity.email);

    if report.status != update.previous_status {
        state
            .notifier
            .report_status_changed(&report, update.previous_status)
            .await;
    }

    Ok(Json(report))
}

pub async fn delete_report(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::DeleteReport)?;

    let id = parse_id(&id, "report")?;

    let deleted = state
        .reports
        .delete(id)
        .await
        .map_err(ApiError::internal("Failed to delete report"))?;
    if !deleted {
        return Err(report_not_found());
    }

    info!("Report {} deleted by {}", id, identity.email);
    Ok(Json(json!({ "message": "Report deleted successfully" })))
}

/// Dashboard aggregates
pub async fn report_stats(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::ViewReportStats)?;

    let stats = state
        .reports
        .stats(RECENT_REPORTS_LIMIT)
        .await
        .map_err(ApiError::internal("Failed to compute report statistics"))?;

    Ok(Json(stats))
}
