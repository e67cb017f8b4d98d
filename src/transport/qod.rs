use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransportError;
use super::device::WireDevice;
use crate::domain::{
    DeviceIdentity, NotificationChannel, PortRange, PortsSpec, QosProfile, SessionParams,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    qos_profile: String,
    device: WireDevice,
    application_server: WireApplicationServer,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_ports: Option<WirePortsSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_server_ports: Option<WirePortsSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook: Option<WireWebhook>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireApplicationServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipv4_address: Option<Ipv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipv6_address: Option<Ipv6Addr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WirePortsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ports: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ranges: Option<Vec<WirePortRange>>,
}

/// Programmatic names are `start`/`end`; the wire renames them `from`/`to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct WirePortRange {
    #[serde(rename = "from")]
    start: u16,
    #[serde(rename = "to")]
    end: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWebhook {
    notification_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notification_auth_token: Option<String>,
}

impl From<&NotificationChannel> for WireWebhook {
    fn from(channel: &NotificationChannel) -> Self {
        Self {
            notification_url: channel.url().as_str().to_owned(),
            notification_auth_token: channel.auth_token().map(str::to_owned),
        }
    }
}

impl From<&PortsSpec> for WirePortsSpec {
    fn from(spec: &PortsSpec) -> Self {
        match spec {
            PortsSpec::Ports(ports) => Self {
                ports: Some(ports.clone()),
                ranges: None,
            },
            PortsSpec::Ranges(ranges) => Self {
                ports: None,
                ranges: Some(
                    ranges
                        .iter()
                        .map(|range| WirePortRange {
                            start: range.start(),
                            end: range.end(),
                        })
                        .collect(),
                ),
            },
        }
    }
}

impl WirePortsSpec {
    fn into_spec(self) -> Result<PortsSpec, TransportError> {
        match (self.ports, self.ranges) {
            (Some(_), Some(_)) => Err(TransportError::InvalidField {
                field: "ports",
                value: "both ports and ranges present".to_owned(),
            }),
            (Some(ports), None) => Ok(PortsSpec::Ports(ports)),
            (None, Some(ranges)) => ranges
                .into_iter()
                .map(|range| {
                    PortRange::new(range.start, range.end).map_err(|_| {
                        TransportError::InvalidField {
                            field: "ranges",
                            value: format!("{}..{}", range.start, range.end),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(PortsSpec::Ranges),
            (None, None) => Ok(PortsSpec::Ports(Vec::new())),
        }
    }
}

/// Build the `POST sessions` payload. Optional sub-objects are attached only
/// when the caller supplied a value.
pub fn encode_create_session(device: &DeviceIdentity, params: &SessionParams) -> serde_json::Value {
    let request = CreateSessionRequest {
        qos_profile: params.profile().as_str().to_owned(),
        device: WireDevice::from(device),
        application_server: WireApplicationServer {
            ipv4_address: params.service_ipv4_addr(),
            ipv6_address: params.service_ipv6_addr(),
        },
        device_ports: params.device_ports_spec().map(WirePortsSpec::from),
        application_server_ports: params.service_ports_spec().map(WirePortsSpec::from),
        duration: params.duration_secs(),
        webhook: params.notification_channel().map(WireWebhook::from),
    };
    serde_json::to_value(request).expect("session request serialization is infallible")
}

/// Build the `POST sessions/{id}/extend` payload.
pub fn encode_extend_session(additional_duration: u64) -> serde_json::Value {
    serde_json::json!({ "requestedAdditionalDuration": additional_duration })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    id: String,
    qos_profile: String,
    qos_status: String,
    #[serde(default)]
    device: Option<WireDevice>,
    #[serde(default)]
    application_server: Option<WireApplicationServer>,
    #[serde(default)]
    device_ports: Option<WirePortsSpec>,
    #[serde(default)]
    application_server_ports: Option<WirePortsSpec>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// A deserialized QoD session, before it is bound to its resource client.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub id: String,
    pub profile: QosProfile,
    pub status: String,
    pub device: Option<DeviceIdentity>,
    pub service_ipv4: Option<Ipv4Addr>,
    pub service_ipv6: Option<Ipv6Addr>,
    pub device_ports: Option<PortsSpec>,
    pub service_ports: Option<PortsSpec>,
    pub duration: Option<u64>,
    pub started_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionResponse {
    fn into_data(self) -> Result<SessionData, TransportError> {
        if let (Some(started_at), Some(expires_at)) = (self.started_at, self.expires_at) {
            if expires_at <= started_at {
                return Err(TransportError::ExpiryBeforeStart {
                    started_at,
                    expires_at,
                });
            }
        }

        let profile =
            QosProfile::new(&self.qos_profile).map_err(|_| TransportError::InvalidField {
                field: "qosProfile",
                value: self.qos_profile.clone(),
            })?;
        let device = self.device.map(WireDevice::into_identity).transpose()?;
        let (service_ipv4, service_ipv6) = match self.application_server {
            Some(server) => (server.ipv4_address, server.ipv6_address),
            None => (None, None),
        };

        Ok(SessionData {
            id: self.id,
            profile,
            status: self.qos_status,
            device,
            service_ipv4,
            service_ipv6,
            device_ports: self.device_ports.map(WirePortsSpec::into_spec).transpose()?,
            service_ports: self
                .application_server_ports
                .map(WirePortsSpec::into_spec)
                .transpose()?,
            duration: self.duration,
            started_at: self.started_at,
            expires_at: self.expires_at,
        })
    }
}

/// Decode a single session payload.
pub fn decode_session(json: &str) -> Result<SessionData, TransportError> {
    let parsed: SessionResponse = serde_json::from_str(json)?;
    parsed.into_data()
}

/// Decode a session list payload. An empty array is a valid, empty result.
pub fn decode_sessions(json: &str) -> Result<Vec<SessionData>, TransportError> {
    let parsed: Vec<SessionResponse> = serde_json::from_str(json)?;
    parsed
        .into_iter()
        .map(SessionResponse::into_data)
        .collect()
}
