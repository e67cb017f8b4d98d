use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransportError;
use super::device::WireDevice;
use crate::domain::{
    ConnectivityEventType, ConnectivityStatus, ConnectivitySubscriptionParams, DeviceIdentity,
    RoamingStatus,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSubscriptionRequest {
    subscription_detail: WireSubscriptionDetail,
    webhook: WireWebhook,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_number_of_reports: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_expire_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSubscriptionDetail {
    device: WireDevice,
    event_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWebhook {
    notification_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notification_auth_token: Option<String>,
}

/// Build the `POST event-subscriptions` payload.
pub fn encode_connectivity_subscription(
    params: &ConnectivitySubscriptionParams,
) -> serde_json::Value {
    let request = CreateSubscriptionRequest {
        subscription_detail: WireSubscriptionDetail {
            device: WireDevice::from(params.device()),
            event_type: params.event_type().as_str().to_owned(),
        },
        webhook: WireWebhook {
            notification_url: params.notification_channel().url().as_str().to_owned(),
            notification_auth_token: params
                .notification_channel()
                .auth_token()
                .map(str::to_owned),
        },
        max_number_of_reports: params.reports_limit(),
        subscription_expire_time: params.expire_time(),
    };
    serde_json::to_value(request).expect("subscription request serialization is infallible")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionResponse {
    subscription_id: String,
    #[serde(default)]
    subscription_detail: Option<WireSubscriptionDetail>,
    #[serde(default)]
    starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// A deserialized device-status subscription, before binding to its client.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivitySubscriptionData {
    pub id: String,
    pub device: Option<DeviceIdentity>,
    pub event_type: Option<ConnectivityEventType>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SubscriptionResponse {
    fn into_data(self) -> Result<ConnectivitySubscriptionData, TransportError> {
        let (device, event_type) = match self.subscription_detail {
            Some(detail) => {
                let event_type = detail.event_type.parse::<ConnectivityEventType>().map_err(
                    |_| TransportError::InvalidField {
                        field: "eventType",
                        value: detail.event_type.clone(),
                    },
                )?;
                (Some(detail.device.into_identity()?), Some(event_type))
            }
            None => (None, None),
        };
        Ok(ConnectivitySubscriptionData {
            id: self.subscription_id,
            device,
            event_type,
            starts_at: self.starts_at,
            expires_at: self.expires_at,
        })
    }
}

/// Decode a single subscription payload.
pub fn decode_connectivity_subscription(
    json: &str,
) -> Result<ConnectivitySubscriptionData, TransportError> {
    let parsed: SubscriptionResponse = serde_json::from_str(json)?;
    parsed.into_data()
}

/// Decode a subscription list payload.
pub fn decode_connectivity_subscriptions(
    json: &str,
) -> Result<Vec<ConnectivitySubscriptionData>, TransportError> {
    let parsed: Vec<SubscriptionResponse> = serde_json::from_str(json)?;
    parsed
        .into_iter()
        .map(SubscriptionResponse::into_data)
        .collect()
}

/// Build the body for direct connectivity/roaming status queries.
pub fn encode_status_query(device: &DeviceIdentity) -> serde_json::Value {
    serde_json::json!({ "device": WireDevice::from(device) })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectivityStatusResponse {
    connectivity_status: String,
}

/// Decode a connectivity status payload.
pub fn decode_connectivity_status(json: &str) -> Result<ConnectivityStatus, TransportError> {
    let parsed: ConnectivityStatusResponse = serde_json::from_str(json)?;
    parsed
        .connectivity_status
        .parse()
        .map_err(|_| TransportError::InvalidField {
            field: "connectivityStatus",
            value: parsed.connectivity_status,
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoamingStatusResponse {
    roaming: bool,
    #[serde(default)]
    country_code: Option<u32>,
    #[serde(default)]
    country_name: Vec<String>,
}

/// Decode a roaming status payload.
pub fn decode_roaming_status(json: &str) -> Result<RoamingStatus, TransportError> {
    let parsed: RoamingStatusResponse = serde_json::from_str(json)?;
    Ok(RoamingStatus {
        roaming: parsed.roaming,
        country_code: parsed.country_code,
        country_names: parsed.country_name,
    })
}
