use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransportError;
use super::device::WireDevice;
use crate::domain::{
    DeviceIdentity, GeofencingEventType, GeofencingSubscriptionParams, SinkCredential,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSubscriptionRequest {
    protocol: &'static str,
    sink: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sink_credential: Option<WireSinkCredential>,
    types: Vec<String>,
    config: WireConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "credentialType")]
enum WireSinkCredential {
    #[serde(rename = "ACCESSTOKEN", rename_all = "camelCase")]
    AccessToken {
        access_token: String,
        access_token_type: String,
        access_token_expires_utc: DateTime<Utc>,
    },
    #[serde(rename = "PLAIN", rename_all = "camelCase")]
    Plain { identifier: String, secret: String },
}

impl From<&SinkCredential> for WireSinkCredential {
    fn from(credential: &SinkCredential) -> Self {
        match credential {
            SinkCredential::AccessToken {
                access_token,
                expires_at,
            } => Self::AccessToken {
                access_token: access_token.clone(),
                access_token_type: "bearer".to_owned(),
                access_token_expires_utc: *expires_at,
            },
            SinkCredential::Plain { identifier, secret } => Self::Plain {
                identifier: identifier.clone(),
                secret: secret.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireConfig {
    subscription_detail: WireSubscriptionDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_expire_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscription_max_events: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_event: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSubscriptionDetail {
    device: WireDevice,
    area: WireArea,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireArea {
    area_type: &'static str,
    center: WireCenter,
    radius: f64,
}

#[derive(Debug, Serialize)]
struct WireCenter {
    latitude: f64,
    longitude: f64,
}

/// Build the geofencing `POST subscriptions` payload.
pub fn encode_geofencing_subscription(params: &GeofencingSubscriptionParams) -> serde_json::Value {
    let request = CreateSubscriptionRequest {
        protocol: "HTTP",
        sink: params.sink().as_str().to_owned(),
        sink_credential: params.credential().map(WireSinkCredential::from),
        types: params
            .types()
            .iter()
            .map(|event| event.as_str().to_owned())
            .collect(),
        config: WireConfig {
            subscription_detail: WireSubscriptionDetail {
                device: WireDevice::from(params.device()),
                area: WireArea {
                    area_type: "CIRCLE",
                    center: WireCenter {
                        latitude: params.area().center().latitude(),
                        longitude: params.area().center().longitude(),
                    },
                    radius: params.area().radius(),
                },
            },
            subscription_expire_time: params.expire_time(),
            subscription_max_events: params.max_events(),
            initial_event: params.initial_event_requested(),
        },
    };
    serde_json::to_value(request).expect("subscription request serialization is infallible")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionResponse {
    id: String,
    #[serde(default)]
    sink: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    config: Option<ResponseConfig>,
    #[serde(default)]
    starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseConfig {
    #[serde(default)]
    subscription_detail: Option<ResponseDetail>,
}

#[derive(Debug, Deserialize)]
struct ResponseDetail {
    #[serde(default)]
    device: Option<WireDevice>,
}

/// A deserialized geofencing subscription, before binding to its client.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofencingSubscriptionData {
    pub id: String,
    pub device: Option<DeviceIdentity>,
    pub sink: Option<String>,
    pub types: Vec<GeofencingEventType>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SubscriptionResponse {
    fn into_data(self) -> Result<GeofencingSubscriptionData, TransportError> {
        let types = self
            .types
            .iter()
            .map(|value| {
                value
                    .parse::<GeofencingEventType>()
                    .map_err(|_| TransportError::InvalidField {
                        field: "types",
                        value: value.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let device = self
            .config
            .and_then(|config| config.subscription_detail)
            .and_then(|detail| detail.device)
            .map(WireDevice::into_identity)
            .transpose()?;
        Ok(GeofencingSubscriptionData {
            id: self.id,
            device,
            sink: self.sink,
            types,
            starts_at: self.starts_at,
            expires_at: self.expires_at,
        })
    }
}

/// Decode a single geofencing subscription payload.
pub fn decode_geofencing_subscription(
    json: &str,
) -> Result<GeofencingSubscriptionData, TransportError> {
    let parsed: SubscriptionResponse = serde_json::from_str(json)?;
    parsed.into_data()
}

/// Decode a geofencing subscription list payload.
pub fn decode_geofencing_subscriptions(
    json: &str,
) -> Result<Vec<GeofencingSubscriptionData>, TransportError> {
    let parsed: Vec<SubscriptionResponse> = serde_json::from_str(json)?;
    parsed
        .into_iter()
        .map(SubscriptionResponse::into_data)
        .collect()
}
