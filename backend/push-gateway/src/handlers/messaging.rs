/// Push delivery handlers
use actix_web::{web, HttpResponse};
use fcm_shared::FcmError;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

use super::{required, JsonBody};
use crate::error::{AppError, Result};
use crate::metrics::observe_provider_call;
use crate::models::{MulticastPayload, ProviderResponse, SendPayload, SubscribePayload, TopicPayload};
use crate::services::{device_message, multicast_message, topic_message, PushProvider, TokenStore};

/// Send a display + data notification to one device
///
/// POST /send
pub async fn send(
    provider: web::Data<Arc<dyn PushProvider>>,
    req: JsonBody<SendPayload>,
) -> Result<HttpResponse> {
    let payload = req.into_inner();
    let token = required(payload.token, "token required")?;

    let message = device_message(token, payload.notification.as_ref(), payload.data.as_ref());
    let resp = call_provider("send", provider.send_to_token(message)).await?;

    Ok(HttpResponse::Ok().json(ProviderResponse::ok(resp)))
}

/// Send to the listed tokens, or to every registered token when none are listed
///
/// POST /send-multi
pub async fn send_multi(
    provider: web::Data<Arc<dyn PushProvider>>,
    store: web::Data<Arc<dyn TokenStore>>,
    req: JsonBody<MulticastPayload>,
) -> Result<HttpResponse> {
    let payload = req.into_inner();

    let targets = match payload.tokens {
        Some(tokens) if !tokens.is_empty() => tokens,
        _ => store.list().await,
    };
    if targets.is_empty() {
        return Err(AppError::Validation("no target tokens".to_string()));
    }

    info!(targets = targets.len(), "Sending multicast notification");

    let message = multicast_message(
        targets,
        payload.title.as_deref(),
        payload.body.as_deref(),
        payload.data.as_ref(),
    );
    let resp = call_provider("multicast", provider.send_multicast(message)).await?;

    Ok(HttpResponse::Ok().json(ProviderResponse::ok(resp)))
}

/// Send to every subscriber of a topic
///
/// POST /send-topic
pub async fn send_topic(
    provider: web::Data<Arc<dyn PushProvider>>,
    req: JsonBody<TopicPayload>,
) -> Result<HttpResponse> {
    let payload = req.into_inner();
    let topic = required(payload.topic, "topic required")?;

    let message = topic_message(
        topic,
        payload.title.as_deref(),
        payload.body.as_deref(),
        payload.data.as_ref(),
    );
    let resp = call_provider("topic send", provider.send_to_topic(message)).await?;

    Ok(HttpResponse::Ok().json(ProviderResponse::ok(resp)))
}

/// Subscribe device tokens to a topic
///
/// POST /subscribe
pub async fn subscribe(
    provider: web::Data<Arc<dyn PushProvider>>,
    req: JsonBody<SubscribePayload>,
) -> Result<HttpResponse> {
    let payload = req.into_inner();

    let (topic, tokens) = match (payload.topic, payload.tokens) {
        (Some(topic), Some(tokens)) if !topic.is_empty() && !tokens.is_empty() => (topic, tokens),
        _ => return Err(AppError::Validation("topic and tokens required".to_string())),
    };

    let resp = call_provider("subscribe", provider.subscribe_to_topic(&tokens, &topic)).await?;

    Ok(HttpResponse::Ok().json(ProviderResponse::ok(resp)))
}

async fn call_provider<T, F>(operation: &str, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, FcmError>>,
{
    match call.await {
        Ok(resp) => {
            observe_provider_call(operation, true);
            Ok(resp)
        }
        Err(e) => {
            error!(
                operation,
                provider_status = ?e.provider_status(),
                "{} error: {}",
                operation,
                e
            );
            observe_provider_call(operation, false);
            Err(AppError::Provider(e))
        }
    }
}
