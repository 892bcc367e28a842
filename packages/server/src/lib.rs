#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for safe-route.
//!
//! Accepts incident reports, serves the current risk grid, and answers
//! safest-route queries. Every grid and route request reads a fresh
//! snapshot of the report store and recomputes the grid from it, decayed
//! against a single `now` captured at the start of the request.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error, middleware, web};
use safe_route_grid_models::{Cell, RiskGrid};
use safe_route_risk::{RiskModel, RiskModelError};
use safe_route_server_models::ApiError;
use safe_route_store::{JsonFileReportStore, MemoryReportStore, ReportStore, StoreError};

pub use config::ServerConfig;

/// Errors that can occur while configuring or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The HTTP server failed to bind or crashed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report store could not be opened.
    #[error("Report store error: {0}")]
    Store(#[from] StoreError),

    /// The risk model file could not be loaded.
    #[error("Risk model error: {0}")]
    RiskModel(#[from] RiskModelError),

    /// An environment variable held an unparseable value.
    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A grid dimension was zero.
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
}

/// Shared application state.
pub struct AppState {
    /// Report store.
    pub store: Arc<dyn ReportStore>,
    /// Risk model used to score reports.
    pub model: RiskModel,
    /// Grid columns.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
}

impl AppState {
    /// Creates state over an existing store.
    #[must_use]
    pub fn new(store: Arc<dyn ReportStore>, model: RiskModel, width: usize, height: usize) -> Self {
        Self {
            store,
            model,
            width,
            height,
        }
    }

    /// Opens the store and risk model named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the store file or risk model file cannot
    /// be loaded.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let store: Arc<dyn ReportStore> = match &config.reports_path {
            Some(path) => {
                log::info!("Opening report store at {}", path.display());
                Arc::new(JsonFileReportStore::open(path)?)
            }
            None => {
                log::info!("Using in-memory report store");
                Arc::new(MemoryReportStore::new())
            }
        };

        let model = match &config.risk_model_path {
            Some(path) => RiskModel::load(path)?,
            None => RiskModel::default(),
        };

        Ok(Self::new(store, model, config.width, config.height))
    }

    /// Whether `cell` lies on the configured grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        usize::try_from(cell.x).is_ok_and(|x| x < self.width)
            && usize::try_from(cell.y).is_ok_and(|y| y < self.height)
    }

    /// Recomputes the risk grid from a fresh store snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be read.
    pub fn build_grid(&self, now: i64) -> Result<RiskGrid, StoreError> {
        let reports = self.store.snapshot()?;
        Ok(self.model.build_grid(&reports, self.width, self.height, now))
    }
}

/// Current time in Unix seconds.
#[must_use]
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected request body: {err}");
        let response = HttpResponse::BadRequest().json(ApiError::new(err.to_string()));
        error::InternalError::from_response(err, response).into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/categories", web::get().to(handlers::categories))
            .route("/reports", web::get().to(handlers::list_reports))
            .route("/reports", web::post().to(handlers::create_report))
            .route("/grid", web::get().to(handlers::grid))
            .route("/route", web::get().to(handlers::route))
            .route("/clear", web::post().to(handlers::clear)),
    );
}

/// Starts the safe-route API server.
///
/// This is a regular async function. The caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the store or risk model cannot be loaded, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = web::Data::new(AppState::from_config(&config)?);

    log::info!(
        "Starting server on {}:{} with a {}x{} grid",
        config.bind_addr,
        config.port,
        config.width,
        config.height
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
