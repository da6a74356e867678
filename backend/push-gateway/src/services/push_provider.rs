/// Push provider port
///
/// The narrow set of provider operations the gateway needs. `FcmClient`
/// is the production adapter; tests substitute their own implementation.
use async_trait::async_trait;
use fcm_shared::{
    BatchResponse, FcmClient, FcmError, Message, MulticastMessage, TopicManagementResponse,
};

#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Deliver to one device token; returns the provider message name
    async fn send_to_token(&self, message: Message) -> Result<String, FcmError>;

    async fn send_multicast(&self, message: MulticastMessage) -> Result<BatchResponse, FcmError>;

    /// Deliver to every subscriber of a topic; returns the provider message name
    async fn send_to_topic(&self, message: Message) -> Result<String, FcmError>;

    async fn subscribe_to_topic(
        &self,
        tokens: &[String],
        topic: &str,
    ) -> Result<TopicManagementResponse, FcmError>;
}

#[async_trait]
impl PushProvider for FcmClient {
    async fn send_to_token(&self, message: Message) -> Result<String, FcmError> {
        self.send(message).await
    }

    async fn send_multicast(&self, message: MulticastMessage) -> Result<BatchResponse, FcmError> {
        FcmClient::send_multicast(self, message).await
    }

    async fn send_to_topic(&self, message: Message) -> Result<String, FcmError> {
        self.send(message).await
    }

    async fn subscribe_to_topic(
        &self,
        tokens: &[String],
        topic: &str,
    ) -> Result<TopicManagementResponse, FcmError> {
        FcmClient::subscribe_to_topic(self, tokens, topic).await
    }
}
