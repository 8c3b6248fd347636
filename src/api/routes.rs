//! API route handlers.
//!
//! All endpoints speak JSON. State is shared via `Arc<ApiState>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::engine::ledger::{CreditTransaction, MemoryLedger, WalletLedger};
use crate::engine::settlement::{SettlementReport, Settler};
use crate::strategy::ValueEngine;
use crate::types::{BetAnalysis, BetOutcome, EngineError};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub engine: ValueEngine,
    pub ledger: Arc<MemoryLedger>,
}

impl ApiState {
    pub fn new(engine: ValueEngine, ledger: Arc<MemoryLedger>) -> Self {
        Self { engine, ledger }
    }
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error returned by a handler, rendered as `{ "error", "message" }`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request data.
    Validation(String),
    /// Odds the engine refuses to price.
    Engine(EngineError),
    /// Ledger or other internal failure.
    Internal(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match self {
            ApiError::Validation(msg) => ("validation_error", msg),
            ApiError::Engine(e) => ("invalid_odds", e.to_string()),
            ApiError::Internal(msg) => ("internal_error", msg),
        };
        (
            status,
            Json(ErrorResponse {
                error: code.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

fn require_finite(name: &str, value: f64) -> Result<(), ApiError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("{name} must be a finite number")))
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeBetRequest {
    pub user_id: String,
    #[serde(default)]
    pub match_id: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub selection: String,
    pub odds: f64,
    pub p_model: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeBetResponse {
    pub match_id: String,
    pub market: String,
    pub selection: String,
    /// Bankroll the stake was sized against.
    pub bankroll: Decimal,
    #[serde(flatten)]
    pub analysis: BetAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResultRequest {
    pub user_id: String,
    pub bet_amount: Decimal,
    pub status: String,
    #[serde(default)]
    pub is_daily_gold_pick: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletResponse {
    pub user_id: String,
    pub balance: Decimal,
    pub credits: Vec<CreditTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/analyze-bet (also /analyze-bet)
pub async fn analyze_bet(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeBetRequest>,
) -> Result<Json<AnalyzeBetResponse>, ApiError> {
    require_finite("odds", req.odds)?;
    require_finite("p_model", req.p_model)?;

    let bankroll = state.ledger.balance(&req.user_id).await.map_err(|e| {
        error!(user_id = %req.user_id, error = %e, "Bankroll lookup failed");
        ApiError::Internal(format!("{e:#}"))
    })?;

    let analysis = state
        .engine
        .analyze(bankroll, req.p_model, req.odds)
        .map_err(|e| {
            warn!(user_id = %req.user_id, odds = req.odds, error = %e, "Analysis rejected");
            ApiError::from(e)
        })?;

    info!(
        user_id = %req.user_id,
        match_id = %req.match_id,
        edge = format!("{:+.2}%", analysis.edge_percent),
        recommendation = %analysis.recommendation,
        elite = analysis.is_elite_alert,
        "Bet analysed"
    );

    Ok(Json(AnalyzeBetResponse {
        match_id: req.match_id,
        market: req.market,
        selection: req.selection,
        bankroll,
        analysis,
    }))
}

/// POST /api/process-result (also /process-result)
pub async fn process_result(
    State(state): State<AppState>,
    Json(req): Json<ProcessResultRequest>,
) -> Result<Json<SettlementReport>, ApiError> {
    let outcome = BetOutcome::new(req.bet_amount, &req.status, req.is_daily_gold_pick);
    let report = Settler::settle(&state.engine, state.ledger.as_ref(), &req.user_id, &outcome)
        .await
        .map_err(|e| {
            error!(user_id = %req.user_id, error = %e, "Settlement failed");
            ApiError::Internal(format!("{e:#}"))
        })?;
    Ok(Json(report))
}

/// GET /api/wallet/:user_id
pub async fn get_wallet(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<WalletResponse> {
    let wallet = state.ledger.wallet(&user_id).await;
    Json(WalletResponse {
        user_id: wallet.user_id,
        balance: wallet.balance,
        credits: wallet.credits,
    })
}
