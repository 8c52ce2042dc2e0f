//! Health check endpoint

use axum::Json;
use serde::Serialize;

use crate::consts::{SERVICE_NAME, VERSION};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        service: SERVICE_NAME,
    })
}
