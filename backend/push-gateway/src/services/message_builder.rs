/// Builds provider messages from gateway request fields
use std::collections::BTreeMap;

use fcm_shared::{
    AndroidConfig, AndroidNotification, AndroidPriority, ApnsConfig, ApnsPayload, Aps, ApsAlert,
    Message, MulticastMessage, Notification,
};
use serde_json::{Map, Value};

use crate::models::NotificationFields;

/// Data key and Android click action the mobile app routes on
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
pub const ANDROID_CHANNEL_ID: &str = "basic_channel";

const DEFAULT_DEVICE_TITLE: &str = "New Notification";
const DEFAULT_DEVICE_BODY: &str = "Tap to open";
const DEFAULT_MULTICAST_TITLE: &str = "Bulk";
const DEFAULT_MULTICAST_BODY: &str = "Bulk message";
const DEFAULT_TOPIC_TITLE: &str = "Topic Msg";
const DEFAULT_TOPIC_BODY: &str = "Hello";

/// FCM data payloads only carry strings.
///
/// Scalars use their plain text and `null` becomes `"null"`. Arrays and
/// objects are sent as compact JSON (`[1,"a"]`, `{"id":7}`) rather than the
/// lossy `1,a` / `[object Object]` forms a JavaScript `String(v)` gives, so
/// existing JS clients reading nested values will see JSON text instead.
pub fn coerce_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

pub fn coerce_data(data: Option<&Map<String, Value>>) -> BTreeMap<String, String> {
    data.map(|data| {
        data.iter()
            .map(|(key, value)| (key.clone(), coerce_value(value)))
            .collect()
    })
    .unwrap_or_default()
}

/// Display + data message for a single device.
///
/// Empty title/body fall back to the defaults, and the navigation marker
/// always wins over a caller-supplied `click_action` key.
pub fn device_message(
    token: String,
    notification: Option<&NotificationFields>,
    data: Option<&Map<String, Value>>,
) -> Message {
    let pick = |field: Option<&String>, default: &str| {
        field
            .filter(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };
    let title = pick(notification.and_then(|n| n.title.as_ref()), DEFAULT_DEVICE_TITLE);
    let body = pick(notification.and_then(|n| n.body.as_ref()), DEFAULT_DEVICE_BODY);

    let mut data = coerce_data(data);
    data.insert("click_action".to_string(), CLICK_ACTION.to_string());

    Message {
        token: Some(token),
        topic: None,
        notification: Some(Notification {
            title: title.clone(),
            body: body.clone(),
        }),
        data,
        android: Some(AndroidConfig {
            priority: Some(AndroidPriority::High),
            notification: Some(AndroidNotification {
                click_action: Some(CLICK_ACTION.to_string()),
                channel_id: Some(ANDROID_CHANNEL_ID.to_string()),
            }),
        }),
        apns: Some(ApnsConfig {
            payload: ApnsPayload {
                aps: Aps {
                    alert: Some(ApsAlert { title, body }),
                    sound: Some("default".to_string()),
                },
            },
        }),
    }
}

/// Data-only message fanned out to `tokens`
pub fn multicast_message(
    tokens: Vec<String>,
    title: Option<&str>,
    body: Option<&str>,
    data: Option<&Map<String, Value>>,
) -> MulticastMessage {
    MulticastMessage {
        tokens,
        data: data_with_text(
            data,
            title.unwrap_or(DEFAULT_MULTICAST_TITLE),
            body.unwrap_or(DEFAULT_MULTICAST_BODY),
        ),
        ..Default::default()
    }
}

/// Data-only message for every subscriber of `topic`
pub fn topic_message(
    topic: String,
    title: Option<&str>,
    body: Option<&str>,
    data: Option<&Map<String, Value>>,
) -> Message {
    Message {
        topic: Some(topic),
        data: data_with_text(
            data,
            title.unwrap_or(DEFAULT_TOPIC_TITLE),
            body.unwrap_or(DEFAULT_TOPIC_BODY),
        ),
        ..Default::default()
    }
}

fn data_with_text(data: Option<&Map<String, Value>>, title: &str, body: &str) -> BTreeMap<String, String> {
    let mut data = coerce_data(data);
    data.insert("title".to_string(), title.to_string());
    data.insert("body".to_string(), body.to_string());
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value(&json!("text")), "text");
        assert_eq!(coerce_value(&json!(42)), "42");
        assert_eq!(coerce_value(&json!(2.5)), "2.5");
        assert_eq!(coerce_value(&json!(true)), "true");
        assert_eq!(coerce_value(&json!(null)), "null");
        assert_eq!(coerce_value(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(coerce_value(&json!({"id": 7})), r#"{"id":7}"#);
    }

    #[test]
    fn test_device_message_defaults() {
        let message = device_message("abc".to_string(), None, None);

        let notification = message.notification.unwrap();
        assert_eq!(notification.title, "New Notification");
        assert_eq!(notification.body, "Tap to open");
        assert_eq!(message.data.len(), 1);
        assert_eq!(message.data["click_action"], CLICK_ACTION);

        let aps = message.apns.unwrap().payload.aps;
        assert_eq!(aps.sound.as_deref(), Some("default"));
        assert_eq!(aps.alert.unwrap().title, "New Notification");
    }

    #[test]
    fn test_device_message_empty_title_falls_back() {
        let fields = NotificationFields {
            title: Some(String::new()),
            body: Some("Your order shipped".to_string()),
        };
        let message = device_message("abc".to_string(), Some(&fields), None);

        let notification = message.notification.unwrap();
        assert_eq!(notification.title, "New Notification");
        assert_eq!(notification.body, "Your order shipped");
    }

    #[test]
    fn test_device_message_marker_overrides_caller_key() {
        let data = object(json!({ "click_action": "OTHER", "orderId": 12 }));
        let message = device_message("abc".to_string(), None, Some(&data));

        assert_eq!(message.data["click_action"], CLICK_ACTION);
        assert_eq!(message.data["orderId"], "12");
    }

    #[test]
    fn test_device_message_android_hints() {
        let message = device_message("abc".to_string(), None, None);
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["android"]["priority"], "high");
        assert_eq!(json["android"]["notification"]["channel_id"], ANDROID_CHANNEL_ID);
        assert_eq!(json["android"]["notification"]["click_action"], CLICK_ACTION);
    }

    #[test]
    fn test_multicast_message_is_data_only() {
        let data = object(json!({ "title": "ignored", "count": 3 }));
        let message = multicast_message(vec!["a".to_string()], None, None, Some(&data));

        assert!(message.notification.is_none());
        assert_eq!(message.data["title"], "Bulk");
        assert_eq!(message.data["body"], "Bulk message");
        assert_eq!(message.data["count"], "3");
    }

    #[test]
    fn test_topic_message_keeps_explicit_text() {
        let message = topic_message("news".to_string(), Some("Breaking"), Some(""), None);

        assert_eq!(message.topic.as_deref(), Some("news"));
        assert_eq!(message.data["title"], "Breaking");
        assert_eq!(message.data["body"], "");
    }
}
