//! HTTP handler functions for the safe-route API.

use actix_web::{HttpResponse, web};
use safe_route_grid_models::Cell;
use safe_route_incident_models::{IncidentCategory, NewIncidentReport};
use safe_route_route::{RouteError, find_safest_path};
use safe_route_server_models::{
    ApiCategory, ApiError, ApiGrid, ApiHealth, ApiReports, ApiRoute, ApiStatus, RouteQueryParams,
};

use crate::{AppState, now};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/categories`
///
/// Returns every incident category with the weight currently applied to it.
pub async fn categories(state: web::Data<AppState>) -> HttpResponse {
    let categories: Vec<ApiCategory> = IncidentCategory::all()
        .iter()
        .map(|c| ApiCategory {
            name: *c,
            weight: state.model.weight(*c),
        })
        .collect();

    HttpResponse::Ok().json(categories)
}

/// `GET /api/reports`
pub async fn list_reports(state: web::Data<AppState>) -> HttpResponse {
    match state.store.snapshot() {
        Ok(reports) => HttpResponse::Ok().json(ApiReports { reports }),
        Err(e) => {
            log::error!("Failed to read reports: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to read reports"))
        }
    }
}

/// `POST /api/reports`
///
/// Stores a new report stamped with the current time. Reports outside the
/// grid are rejected here so the store only ever holds placeable reports.
pub async fn create_report(
    state: web::Data<AppState>,
    body: web::Json<NewIncidentReport>,
) -> HttpResponse {
    let report = body.into_inner();
    let cell = Cell::new(report.x, report.y);

    if !state.contains(cell) {
        log::debug!("Rejecting report at {cell}: outside grid");
        return HttpResponse::BadRequest().json(ApiError::new("invalid grid location"));
    }

    match state.store.append(report, now()) {
        Ok(stored) => {
            log::info!(
                "Stored report {} ({} severity {}) at {cell}",
                stored.id,
                stored.category,
                stored.severity.value()
            );
            HttpResponse::Ok().json(ApiStatus::new("ok"))
        }
        Err(e) => {
            log::error!("Failed to store report: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to store report"))
        }
    }
}

/// `GET /api/grid`
pub async fn grid(state: web::Data<AppState>) -> HttpResponse {
    match state.build_grid(now()) {
        Ok(grid) => HttpResponse::Ok().json(ApiGrid::from(&grid)),
        Err(e) => {
            log::error!("Failed to build risk grid: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to build risk grid"))
        }
    }
}

/// `GET /api/route?sx=&sy=&ex=&ey=`
///
/// Finds the safest path over a freshly built risk grid.
pub async fn route(
    state: web::Data<AppState>,
    params: web::Query<RouteQueryParams>,
) -> HttpResponse {
    let Some((start, end)) = params.endpoints() else {
        return HttpResponse::BadRequest().json(ApiError::new("Missing sx,sy,ex,ey"));
    };

    let grid = match state.build_grid(now()) {
        Ok(grid) => grid,
        Err(e) => {
            log::error!("Failed to build risk grid: {e}");
            return HttpResponse::InternalServerError()
                .json(ApiError::new("Failed to build risk grid"));
        }
    };

    match find_safest_path(&grid, start, end) {
        Ok(result) => HttpResponse::Ok().json(ApiRoute::from(result)),
        Err(e @ RouteError::OutOfBounds { .. }) => {
            HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
        }
        Err(e @ RouteError::Unreachable { .. }) => {
            log::warn!("{e}");
            HttpResponse::NotFound().json(ApiError::new("no path found"))
        }
    }
}

/// `POST /api/clear`
///
/// Deletes every stored report.
pub async fn clear(state: web::Data<AppState>) -> HttpResponse {
    match state.store.clear() {
        Ok(removed) => {
            log::info!("Cleared {removed} reports");
            HttpResponse::Ok().json(ApiStatus::new("cleared"))
        }
        Err(e) => {
            log::error!("Failed to clear reports: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to clear reports"))
        }
    }
}
