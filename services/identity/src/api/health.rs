//! 健康检查端点

use axum::Json;
use axum::extract::State;
use signet_telemetry::HealthStatus;

use super::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let mut status = HealthStatus::new();
    status.add_check(
        "verification_store",
        true,
        Some(format!("{} pending codes", state.verification.pending())),
    );

    Json(status)
}
