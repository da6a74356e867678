/// Device token registration handlers
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::debug;

use super::{required, JsonBody};
use crate::error::Result;
use crate::models::{TokenCountResponse, TokenPayload};
use crate::services::TokenStore;

/// Register a device token
///
/// POST /register-token
pub async fn register_token(
    store: web::Data<Arc<dyn TokenStore>>,
    req: JsonBody<TokenPayload>,
) -> Result<HttpResponse> {
    let token = required(req.into_inner().token, "token required")?;
    let tokens_count = store.add(token).await;
    debug!(tokens_count, "Registered device token");

    Ok(HttpResponse::Ok().json(TokenCountResponse {
        success: true,
        tokens_count,
    }))
}

/// Unregister a device token. Unknown tokens are not an error.
///
/// POST /unregister-token
pub async fn unregister_token(
    store: web::Data<Arc<dyn TokenStore>>,
    req: JsonBody<TokenPayload>,
) -> Result<HttpResponse> {
    let token = required(req.into_inner().token, "token required")?;
    let tokens_count = store.remove(&token).await;
    debug!(tokens_count, "Unregistered device token");

    Ok(HttpResponse::Ok().json(TokenCountResponse {
        success: true,
        tokens_count,
    }))
}
