/// FCM Shared Library
///
/// Firebase Cloud Messaging (FCM) client used by the push gateway to deliver
/// notifications to Android, iOS and Web devices.
///
/// It handles:
/// - Service account loading
/// - OAuth2 token generation with caching and refresh
/// - Single-device, multicast and topic message delivery
/// - Topic subscriptions through the Instance ID batch API

pub mod client;
pub mod errors;
pub mod models;

pub use client::{normalize_topic, FcmClient, FcmEndpoints};
pub use errors::FcmError;
pub use models::{
    AndroidConfig, AndroidNotification, AndroidPriority, ApnsConfig, ApnsPayload, Aps, ApsAlert,
    BatchResponse, Message, MulticastMessage, Notification, SendResponse, ServiceAccountKey,
    TopicManagementError, TopicManagementResponse,
};
