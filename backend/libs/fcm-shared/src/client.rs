use chrono::{Duration, Utc};
use futures::future::join_all;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::errors::FcmError;
use crate::models::*;

const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const MAX_MULTICAST_TOKENS: usize = 500;
const MAX_TOPIC_MANAGEMENT_TOKENS: usize = 1000;

/// Base URLs of the Google APIs the client talks to.
#[derive(Debug, Clone)]
pub struct FcmEndpoints {
    pub fcm_base: String,
    pub iid_base: String,
}

impl Default for FcmEndpoints {
    fn default() -> Self {
        Self {
            fcm_base: "https://fcm.googleapis.com".to_string(),
            iid_base: "https://iid.googleapis.com".to_string(),
        }
    }
}

/// Firebase Cloud Messaging Client
///
/// Manages OAuth2 token generation, caching, and message delivery through
/// the FCM HTTP v1 API.
pub struct FcmClient {
    pub project_id: String,
    pub credentials: Arc<ServiceAccountKey>,
    endpoints: FcmEndpoints,
    token_cache: Arc<Mutex<Option<TokenCache>>>,
    http_client: reqwest::Client,
}

impl FcmClient {
    /// Create new FCM client for the project named in the service account key
    pub fn new(credentials: ServiceAccountKey) -> Self {
        Self {
            project_id: credentials.project_id.clone(),
            credentials: Arc::new(credentials),
            endpoints: FcmEndpoints::default(),
            token_cache: Arc::new(Mutex::new(None)),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_service_account_file(path: impl AsRef<Path>) -> Result<Self, FcmError> {
        Ok(Self::new(ServiceAccountKey::from_file(path)?))
    }

    pub fn with_endpoints(mut self, endpoints: FcmEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Send a message to a single device token or a topic.
    ///
    /// Returns the provider-assigned message name
    /// (`projects/{project}/messages/{id}`).
    pub async fn send(&self, message: Message) -> Result<String, FcmError> {
        let message = prepare_message(message)?;
        let access_token = self.get_access_token().await?;
        self.send_with_token(&access_token, &message).await
    }

    /// Send the same message to up to 500 device tokens.
    ///
    /// Individual delivery failures are reported in the returned batch and
    /// never fail the call as a whole.
    pub async fn send_multicast(&self, message: MulticastMessage) -> Result<BatchResponse, FcmError> {
        if message.tokens.is_empty() {
            return Err(FcmError::InvalidArgument(
                "tokens must be a non-empty array".to_string(),
            ));
        }
        if message.tokens.len() > MAX_MULTICAST_TOKENS {
            return Err(FcmError::InvalidArgument(format!(
                "tokens list must not contain more than {} items",
                MAX_MULTICAST_TOKENS
            )));
        }

        let access_token = self.get_access_token().await?;

        let sends = message.tokens.iter().map(|device_token| {
            let single = message.for_token(device_token);
            let access_token = access_token.as_str();
            async move { self.send_with_token(access_token, &single).await }
        });

        let responses = join_all(sends)
            .await
            .into_iter()
            .map(|result| match result {
                Ok(name) => SendResponse {
                    success: true,
                    message_id: Some(name),
                    error: None,
                },
                Err(e) => SendResponse {
                    success: false,
                    message_id: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        Ok(BatchResponse::from_responses(responses))
    }

    /// Subscribe device tokens to a topic
    pub async fn subscribe_to_topic(
        &self,
        device_tokens: &[String],
        topic: &str,
    ) -> Result<TopicManagementResponse, FcmError> {
        if device_tokens.is_empty() {
            return Err(FcmError::InvalidArgument(
                "tokens must be a non-empty array".to_string(),
            ));
        }
        if device_tokens.len() > MAX_TOPIC_MANAGEMENT_TOKENS {
            return Err(FcmError::InvalidArgument(format!(
                "tokens list must not contain more than {} items",
                MAX_TOPIC_MANAGEMENT_TOKENS
            )));
        }

        let topic = normalize_topic(topic)?;
        let access_token = self.get_access_token().await?;

        let url = format!("{}/iid/v1:batchAdd", self.endpoints.iid_base);
        let request = IidBatchRequest {
            to: format!("/topics/{}", topic),
            registration_tokens: device_tokens,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&access_token)
            .header("access_token_auth", "true")
            .json(&request)
            .send()
            .await
            .map_err(|e| FcmError::SendRequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let batch: IidBatchResponse = response
            .json()
            .await
            .map_err(|e| FcmError::ResponseParseError(e.to_string()))?;

        let errors: Vec<TopicManagementError> = batch
            .results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| {
                result
                    .error
                    .map(|error| TopicManagementError { index, error })
            })
            .collect();

        Ok(TopicManagementResponse {
            success_count: device_tokens.len().saturating_sub(errors.len()),
            failure_count: errors.len(),
            errors,
        })
    }

    /// Get access token from service account (with caching)
    pub async fn get_access_token(&self) -> Result<String, FcmError> {
        {
            let cache = self.token_cache.lock().map_err(|_| FcmError::Internal)?;
            if let Some(cached) = cache.as_ref() {
                // Reuse while valid for at least 60 more seconds
                if cached.expires_at > Utc::now().timestamp() + 60 {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: MESSAGING_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| FcmError::KeyParseError(e.to_string()))?;

        let mut header = Header::new(Algorithm::RS256);
        if !self.credentials.private_key_id.is_empty() {
            header.kid = Some(self.credentials.private_key_id.clone());
        }

        let assertion = encode(&header, &claims, &encoding_key)
            .map_err(|e| FcmError::JwtEncodeError(e.to_string()))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| FcmError::TokenError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FcmError::TokenRequestFailed(response.status().to_string()));
        }

        let token_response: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| FcmError::TokenParseError(e.to_string()))?;

        debug!(
            expires_in = token_response.expires_in,
            "Obtained FCM access token"
        );

        let expires_at = Utc::now().timestamp() + token_response.expires_in;
        {
            let mut cache = self.token_cache.lock().map_err(|_| FcmError::Internal)?;
            *cache = Some(TokenCache {
                access_token: token_response.access_token.clone(),
                expires_at,
            });
        }

        Ok(token_response.access_token)
    }

    async fn send_with_token(&self, access_token: &str, message: &Message) -> Result<String, FcmError> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoints.fcm_base, self.project_id
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&FcmSendRequest { message })
            .send()
            .await
            .map_err(|e| FcmError::SendRequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let fcm_response: FcmApiResponse = response
            .json()
            .await
            .map_err(|e| FcmError::ResponseParseError(e.to_string()))?;

        fcm_response
            .name
            .ok_or_else(|| FcmError::ResponseParseError("missing message name".to_string()))
    }
}

/// Strip an optional `/topics/` prefix and check the topic name charset.
pub fn normalize_topic(topic: &str) -> Result<String, FcmError> {
    let name = topic.strip_prefix("/topics/").unwrap_or(topic);
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%'));

    if valid {
        Ok(name.to_string())
    } else {
        Err(FcmError::InvalidArgument(format!(
            "Topic provided to sendToTopic() must be a string which matches the format \"/topics/[a-zA-Z0-9-_.~%]+\": {}",
            topic
        )))
    }
}

fn prepare_message(mut message: Message) -> Result<Message, FcmError> {
    if message.token.is_some() == message.topic.is_some() {
        return Err(FcmError::InvalidArgument(
            "Exactly one of token or topic must be specified".to_string(),
        ));
    }

    if let Some(topic) = message.topic.take() {
        message.topic = Some(normalize_topic(&topic)?);
    }

    Ok(message)
}

async fn api_error(response: reqwest::Response) -> FcmError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<GoogleErrorEnvelope>(&text)
        .ok()
        .and_then(|envelope| match envelope.error {
            GoogleErrorBody::Detailed { message } => message,
            GoogleErrorBody::Plain(message) => Some(message),
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.is_empty() {
                format!("FCM API error: {}", status)
            } else {
                text
            }
        });

    FcmError::ApiError {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> ServiceAccountKey {
        ServiceAccountKey {
            project_id: "test-project".to_string(),
            private_key_id: "key-id".to_string(),
            private_key: "private-key".to_string(),
            client_email: "test@test.iam.gserviceaccount.com".to_string(),
            client_id: "123456".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
        }
    }

    #[test]
    fn test_fcm_client_creation() {
        let client = FcmClient::new(test_credentials());
        assert_eq!(client.project_id, "test-project");
        assert_eq!(client.endpoints.fcm_base, "https://fcm.googleapis.com");
    }

    #[test]
    fn test_normalize_topic() {
        assert_eq!(normalize_topic("news").unwrap(), "news");
        assert_eq!(normalize_topic("/topics/news").unwrap(), "news");
        assert_eq!(normalize_topic("a-b_c.d~e%20").unwrap(), "a-b_c.d~e%20");

        assert!(normalize_topic("").is_err());
        assert!(normalize_topic("/topics/").is_err());
        assert!(normalize_topic("bad topic").is_err());
    }

    #[test]
    fn test_prepare_message_requires_single_target() {
        assert!(prepare_message(Message::default()).is_err());

        let both = Message {
            token: Some("t".to_string()),
            topic: Some("news".to_string()),
            ..Default::default()
        };
        assert!(prepare_message(both).is_err());

        let topic = Message {
            topic: Some("/topics/news".to_string()),
            ..Default::default()
        };
        assert_eq!(prepare_message(topic).unwrap().topic.as_deref(), Some("news"));
    }

    #[tokio::test]
    async fn test_multicast_rejects_empty_and_oversized() {
        let client = FcmClient::new(test_credentials());

        let err = client
            .send_multicast(MulticastMessage::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FcmError::InvalidArgument(_)));

        let oversized = MulticastMessage {
            tokens: (0..501).map(|i| format!("token-{}", i)).collect(),
            ..Default::default()
        };
        let err = client.send_multicast(oversized).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_invalid_private_key_is_reported() {
        let client = FcmClient::new(test_credentials());
        let err = client.get_access_token().await.unwrap_err();
        assert!(matches!(err, FcmError::KeyParseError(_)));
    }
}
