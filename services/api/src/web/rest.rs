//! services/api/src/web/rest.rs
//!
//! The keep-alive endpoint and the master definition for the OpenAPI
//! specification.

use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::confirm_handler,
        crate::web::auth::login_handler,
        crate::web::auth::refresh_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::me_handler,
        crate::web::diary::diary_handler,
        crate::web::diary::diary_send_handler,
        crate::web::diary::diary_append_handler,
        crate::web::diary::diary_edit_handler,
        ping_handler,
    ),
    components(schemas(
        crate::web::auth::RegisterRequest,
        crate::web::auth::LoginRequest,
        crate::web::auth::MessageResponse,
        crate::web::auth::PublicUser,
        crate::web::auth::MeResponse,
        crate::web::diary::DiarySendRequest,
        crate::web::diary::DiaryAppendRequest,
        crate::web::diary::DiaryEditRequest,
        crate::web::diary::DiaryResponse,
        crate::web::diary::DiaryEnvelope,
        PingResponse,
    )),
    tags(
        (name = "Diary API", description = "Registration, session, and diary endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Keep-alive
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct PingResponse {
    pub status: String,
}

/// GET /api/ping - Keep-alive probe for external uptime pingers.
#[utoipa::path(
    get,
    path = "/api/ping",
    responses((status = 200, description = "The service is up", body = PingResponse))
)]
pub async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
    })
}
