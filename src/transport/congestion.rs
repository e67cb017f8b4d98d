use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransportError;
use super::device::WireDevice;
use crate::domain::{Congestion, CongestionSubscriptionParams, DeviceIdentity};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSubscriptionRequest {
    device: WireDevice,
    webhook: WireWebhook,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_expire_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWebhook {
    notification_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notification_auth_token: Option<String>,
}

/// Build the congestion-insights `POST subscriptions` payload.
pub fn encode_congestion_subscription(params: &CongestionSubscriptionParams) -> serde_json::Value {
    let request = CreateSubscriptionRequest {
        device: WireDevice::from(params.device()),
        webhook: WireWebhook {
            notification_url: params.notification_channel().url().as_str().to_owned(),
            notification_auth_token: params
                .notification_channel()
                .auth_token()
                .map(str::to_owned),
        },
        subscription_expire_time: params.expire_time(),
    };
    serde_json::to_value(request).expect("subscription request serialization is infallible")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionResponse {
    subscription_id: String,
    #[serde(default)]
    device: Option<WireDevice>,
    #[serde(default)]
    starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// A deserialized congestion subscription, before binding to its client.
#[derive(Debug, Clone, PartialEq)]
pub struct CongestionSubscriptionData {
    pub id: String,
    pub device: Option<DeviceIdentity>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SubscriptionResponse {
    fn into_data(self) -> Result<CongestionSubscriptionData, TransportError> {
        Ok(CongestionSubscriptionData {
            id: self.subscription_id,
            device: self.device.map(WireDevice::into_identity).transpose()?,
            starts_at: self.starts_at,
            expires_at: self.expires_at,
        })
    }
}

/// Decode a single congestion subscription payload.
pub fn decode_congestion_subscription(
    json: &str,
) -> Result<CongestionSubscriptionData, TransportError> {
    let parsed: SubscriptionResponse = serde_json::from_str(json)?;
    parsed.into_data()
}

/// Decode a congestion subscription list payload.
pub fn decode_congestion_subscriptions(
    json: &str,
) -> Result<Vec<CongestionSubscriptionData>, TransportError> {
    let parsed: Vec<SubscriptionResponse> = serde_json::from_str(json)?;
    parsed
        .into_iter()
        .map(SubscriptionResponse::into_data)
        .collect()
}

#[derive(Debug, Serialize)]
struct CongestionQuery {
    device: WireDevice,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<DateTime<Utc>>,
}

/// Build the body for a congestion level query over an optional time window.
pub fn encode_congestion_query(
    device: &DeviceIdentity,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> serde_json::Value {
    let query = CongestionQuery {
        device: WireDevice::from(device),
        start,
        end,
    };
    serde_json::to_value(query).expect("congestion query serialization is infallible")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CongestionReading {
    time_interval_start: DateTime<Utc>,
    time_interval_end: DateTime<Utc>,
    congestion_level: String,
    #[serde(default)]
    confidence_level: Option<u8>,
}

/// Decode an array of congestion readings.
pub fn decode_congestion_readings(json: &str) -> Result<Vec<Congestion>, TransportError> {
    let parsed: Vec<CongestionReading> = serde_json::from_str(json)?;
    parsed
        .into_iter()
        .map(|reading| {
            let level = reading.congestion_level.parse().map_err(|_| {
                TransportError::InvalidField {
                    field: "congestionLevel",
                    value: reading.congestion_level.clone(),
                }
            })?;
            Ok(Congestion {
                level,
                confidence: reading.confidence_level,
                start: reading.time_interval_start,
                stop: reading.time_interval_end,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{CongestionLevel, NotificationChannel};

    fn device() -> DeviceIdentity {
        DeviceIdentity::builder()
            .phone_number("+358311234567".parse().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn minimal_subscription_request_omits_expiry() {
        let params = CongestionSubscriptionParams::new(
            device(),
            NotificationChannel::new("https://example.com/notify", None).unwrap(),
        );
        assert_eq!(
            encode_congestion_subscription(&params),
            json!({
                "device": {"phoneNumber": "+358311234567"},
                "webhook": {"notificationUrl": "https://example.com/notify"}
            })
        );
    }

    #[test]
    fn subscription_response_decodes() {
        let data = decode_congestion_subscription(
            r#"{
                "subscriptionId": "cong-1",
                "device": {"phoneNumber": "+358311234567"},
                "startsAt": "2024-06-01T12:00:00Z",
                "expiresAt": "2024-06-08T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(data.id, "cong-1");
        assert!(data.device.is_some());
        assert!(data.expires_at.unwrap() > data.starts_at.unwrap());
    }

    #[test]
    fn query_with_window_includes_bounds() {
        let start = "2024-06-01T00:00:00Z".parse().unwrap();
        let end = "2024-06-02T00:00:00Z".parse().unwrap();
        let payload = encode_congestion_query(&device(), Some(start), Some(end));
        assert_eq!(payload["start"], serde_json::to_value(start).unwrap());
        assert_eq!(payload["end"], serde_json::to_value(end).unwrap());

        let payload = encode_congestion_query(&device(), None, None);
        assert_eq!(
            payload,
            json!({"device": {"phoneNumber": "+358311234567"}})
        );
    }

    #[test]
    fn readings_decode_and_reject_unknown_levels() {
        let readings = decode_congestion_readings(
            r#"[{
                "timeIntervalStart": "2024-06-01T12:00:00Z",
                "timeIntervalEnd": "2024-06-01T13:00:00Z",
                "congestionLevel": "MEDIUM",
                "confidenceLevel": 74
            }]"#,
        )
        .unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].level, CongestionLevel::Medium);
        assert_eq!(readings[0].confidence, Some(74));

        let err = decode_congestion_readings(
            r#"[{
                "timeIntervalStart": "2024-06-01T12:00:00Z",
                "timeIntervalEnd": "2024-06-01T13:00:00Z",
                "congestionLevel": "EXTREME"
            }]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidField {
                field: "congestionLevel",
                ..
            }
        ));
    }

    #[test]
    fn empty_readings_are_ok() {
        assert!(decode_congestion_readings("[]").unwrap().is_empty());
    }
}
