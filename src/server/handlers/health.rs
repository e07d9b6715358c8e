use axum::extract::Json;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Status {
    status: String,
    message: String,
}

pub async fn check() -> Json<Status> {
    Json(Status {
        status: "ok".into(),
        message: "API is running".into(),
    })
}
