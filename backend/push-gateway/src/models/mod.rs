/// Request and response bodies of the gateway HTTP API
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{token}` body of `/register-token` and `/unregister-token`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenPayload {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFields {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Body of `/send`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendPayload {
    pub token: Option<String>,
    pub notification: Option<NotificationFields>,
    pub data: Option<Map<String, Value>>,
}

/// Body of `/send-multi`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MulticastPayload {
    pub tokens: Option<Vec<String>>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<Map<String, Value>>,
}

/// Body of `/send-topic`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicPayload {
    pub topic: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<Map<String, Value>>,
}

/// Body of `/subscribe`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribePayload {
    pub topic: Option<String>,
    pub tokens: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCountResponse {
    pub success: bool,
    pub tokens_count: usize,
}

/// Success wrapper around the provider's response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderResponse<T> {
    pub success: bool,
    pub resp: T,
}

impl<T: Serialize> ProviderResponse<T> {
    pub fn ok(resp: T) -> Self {
        Self {
            success: true,
            resp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
