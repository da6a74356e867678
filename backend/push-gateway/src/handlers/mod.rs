/// HTTP handlers for the push gateway API
pub mod messaging;
pub mod tokens;

pub use messaging::*;
pub use tokens::*;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::metrics;

/// JSON body extractor where a missing body reads as the payload's default.
///
/// Required-field checks then report their own message instead of a parser
/// error. Bodies that are present but malformed are still rejected.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for JsonBody<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            let bytes = body.await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(JsonBody(T::default()));
            }

            serde_json::from_slice::<T>(&bytes)
                .map(JsonBody)
                .map_err(|e| {
                    actix_web::Error::from(AppError::Validation(format!(
                        "Json deserialize error: {}",
                        e
                    )))
                })
        })
    }
}

/// A field counts as present only when it is non-empty
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

pub async fn health() -> &'static str {
    "OK"
}

/// Register routes
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/register-token", web::post().to(register_token))
        .route("/unregister-token", web::post().to(unregister_token))
        .route("/send", web::post().to(send))
        .route("/send-multi", web::post().to(send_multi))
        .route("/send-topic", web::post().to(send_topic))
        .route("/subscribe", web::post().to(subscribe));
}
