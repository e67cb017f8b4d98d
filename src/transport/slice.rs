use serde::{Deserialize, Serialize};

use super::TransportError;
use super::device::WireDevice;
use crate::domain::{
    AreaOfService, DeviceIdentity, NetworkIdentifier, Point, SliceInfo, SliceParams, SliceState,
    Throughput,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSliceRequest {
    name: String,
    network_identifier: WireNetworkIdentifier,
    slice_info: WireSliceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    area_of_service: Option<WireAreaOfService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_data_connections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_devices: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slice_downlink_throughput: Option<WireThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slice_uplink_throughput: Option<WireThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_downlink_throughput: Option<WireThroughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_uplink_throughput: Option<WireThroughput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireNetworkIdentifier {
    mcc: String,
    mnc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSliceInfo {
    service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    differentiator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireAreaOfService {
    polygon: Vec<WirePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct WirePoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct WireThroughput {
    guaranteed: f64,
    maximum: f64,
}

impl From<Throughput> for WireThroughput {
    fn from(value: Throughput) -> Self {
        Self {
            guaranteed: value.guaranteed,
            maximum: value.maximum,
        }
    }
}

impl From<WireThroughput> for Throughput {
    fn from(value: WireThroughput) -> Self {
        Self {
            guaranteed: value.guaranteed,
            maximum: value.maximum,
        }
    }
}

impl From<&AreaOfService> for WireAreaOfService {
    fn from(area: &AreaOfService) -> Self {
        Self {
            polygon: area
                .polygon()
                .iter()
                .map(|point| WirePoint {
                    latitude: point.latitude(),
                    longitude: point.longitude(),
                })
                .collect(),
        }
    }
}

impl WireAreaOfService {
    fn into_area(self) -> Result<AreaOfService, TransportError> {
        let points = self
            .polygon
            .iter()
            .map(|point| {
                Point::new(point.latitude, point.longitude).map_err(|_| {
                    TransportError::InvalidField {
                        field: "polygon",
                        value: format!("({}, {})", point.latitude, point.longitude),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AreaOfService::new(points).map_err(|_| TransportError::InvalidField {
            field: "areaOfService",
            value: format!("{} points", self.polygon.len()),
        })
    }
}

/// Build the `POST slices` payload.
pub fn encode_create_slice(params: &SliceParams) -> serde_json::Value {
    let request = CreateSliceRequest {
        name: params.name().to_owned(),
        network_identifier: WireNetworkIdentifier {
            mcc: params.network_identifier().mcc().to_owned(),
            mnc: params.network_identifier().mnc().to_owned(),
        },
        slice_info: WireSliceInfo {
            service_type: params.slice_info().service_type().as_str().to_owned(),
            differentiator: params.slice_info().differentiator().map(str::to_owned),
        },
        notification_url: params
            .notification_channel()
            .map(|channel| channel.url().as_str().to_owned()),
        notification_auth_token: params
            .notification_channel()
            .and_then(|channel| channel.auth_token().map(str::to_owned)),
        area_of_service: params.area().map(WireAreaOfService::from),
        max_data_connections: params.max_data_connections_limit(),
        max_devices: params.max_devices_limit(),
        slice_downlink_throughput: params.slice_downlink().map(WireThroughput::from),
        slice_uplink_throughput: params.slice_uplink().map(WireThroughput::from),
        device_downlink_throughput: params.device_downlink().map(WireThroughput::from),
        device_uplink_throughput: params.device_uplink().map(WireThroughput::from),
    };
    serde_json::to_value(request).expect("slice request serialization is infallible")
}

/// Build the body for `POST slices/{id}/attach` and `.../detach`.
pub fn encode_attachment(device: &DeviceIdentity) -> serde_json::Value {
    serde_json::json!({ "device": WireDevice::from(device) })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SliceResponse {
    name: String,
    state: String,
    #[serde(default)]
    slice_id: Option<String>,
    #[serde(default)]
    network_identifier: Option<WireNetworkIdentifier>,
    #[serde(default)]
    slice_info: Option<WireSliceInfo>,
    #[serde(default)]
    area_of_service: Option<WireAreaOfService>,
    #[serde(default)]
    max_data_connections: Option<u64>,
    #[serde(default)]
    max_devices: Option<u64>,
}

/// A deserialized slice, before it is bound to its resource client.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceData {
    pub name: String,
    pub slice_id: Option<String>,
    pub state: SliceState,
    pub network_identifier: Option<NetworkIdentifier>,
    pub slice_info: Option<SliceInfo>,
    pub area_of_service: Option<AreaOfService>,
    pub max_data_connections: Option<u64>,
    pub max_devices: Option<u64>,
}

impl SliceResponse {
    fn into_data(self) -> Result<SliceData, TransportError> {
        let state = self
            .state
            .parse::<SliceState>()
            .map_err(|_| TransportError::InvalidField {
                field: "state",
                value: self.state.clone(),
            })?;
        let network_identifier = self
            .network_identifier
            .map(|net| {
                NetworkIdentifier::new(&net.mcc, &net.mnc).map_err(|_| {
                    TransportError::InvalidField {
                        field: "networkIdentifier",
                        value: format!("{}/{}", net.mcc, net.mnc),
                    }
                })
            })
            .transpose()?;
        let slice_info = self
            .slice_info
            .map(|info| {
                info.service_type
                    .parse()
                    .map(|service_type| SliceInfo::new(service_type, info.differentiator.clone()))
                    .map_err(|_| TransportError::InvalidField {
                        field: "serviceType",
                        value: info.service_type.clone(),
                    })
            })
            .transpose()?;

        Ok(SliceData {
            name: self.name,
            slice_id: self.slice_id,
            state,
            network_identifier,
            slice_info,
            area_of_service: self
                .area_of_service
                .map(WireAreaOfService::into_area)
                .transpose()?,
            max_data_connections: self.max_data_connections,
            max_devices: self.max_devices,
        })
    }
}

/// Decode a single slice payload.
pub fn decode_slice(json: &str) -> Result<SliceData, TransportError> {
    let parsed: SliceResponse = serde_json::from_str(json)?;
    parsed.into_data()
}

/// Decode a slice list payload.
pub fn decode_slices(json: &str) -> Result<Vec<SliceData>, TransportError> {
    let parsed: Vec<SliceResponse> = serde_json::from_str(json)?;
    parsed.into_iter().map(SliceResponse::into_data).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{NotificationChannel, ServiceType};

    fn minimal_params() -> SliceParams {
        SliceParams::new(
            "edge-1",
            NetworkIdentifier::new("236", "30").unwrap(),
            SliceInfo::new(ServiceType::EMbb, None),
        )
        .unwrap()
    }

    #[test]
    fn minimal_create_request_omits_optionals() {
        let payload = encode_create_slice(&minimal_params());
        assert_eq!(
            payload,
            json!({
                "name": "edge-1",
                "networkIdentifier": {"mcc": "236", "mnc": "30"},
                "sliceInfo": {"serviceType": "eMBB"}
            })
        );
    }

    #[test]
    fn populated_create_request() {
        let area = AreaOfService::new(vec![
            Point::new(47.0, 19.0).unwrap(),
            Point::new(47.1, 19.0).unwrap(),
            Point::new(47.1, 19.1).unwrap(),
        ])
        .unwrap();
        let params = SliceParams::new(
            "edge-2",
            NetworkIdentifier::new("236", "30").unwrap(),
            SliceInfo::new(ServiceType::Urllc, Some("444444".to_owned())),
        )
        .unwrap()
        .notification(
            NotificationChannel::new("https://example.com/notify", Some("token".to_owned()))
                .unwrap(),
        )
        .area_of_service(area)
        .max_devices(64)
        .slice_downlink_throughput(Throughput {
            guaranteed: 3.0,
            maximum: 10.0,
        });

        let payload = encode_create_slice(&params);
        assert_eq!(
            payload,
            json!({
                "name": "edge-2",
                "networkIdentifier": {"mcc": "236", "mnc": "30"},
                "sliceInfo": {"serviceType": "URLLC", "differentiator": "444444"},
                "notificationUrl": "https://example.com/notify",
                "notificationAuthToken": "token",
                "areaOfService": {"polygon": [
                    {"latitude": 47.0, "longitude": 19.0},
                    {"latitude": 47.1, "longitude": 19.0},
                    {"latitude": 47.1, "longitude": 19.1}
                ]},
                "maxDevices": 64,
                "sliceDownlinkThroughput": {"guaranteed": 3.0, "maximum": 10.0}
            })
        );
    }

    #[test]
    fn attachment_payload_wraps_the_device() {
        let device = DeviceIdentity::builder()
            .phone_number("+358311234567".parse().unwrap())
            .build()
            .unwrap();
        assert_eq!(
            encode_attachment(&device),
            json!({"device": {"phoneNumber": "+358311234567"}})
        );
    }

    #[test]
    fn slice_response_decodes_with_and_without_id() {
        let data = decode_slice(r#"{"name": "edge-1", "state": "PENDING", "sliceId": "s-1"}"#)
            .unwrap();
        assert_eq!(data.slice_id.as_deref(), Some("s-1"));
        assert_eq!(data.state, SliceState::Pending);

        let data = decode_slice(r#"{"name": "edge-1", "state": "NOT_SUBMITTED"}"#).unwrap();
        assert!(data.slice_id.is_none());
    }

    #[test]
    fn unknown_state_is_rejected() {
        let err = decode_slice(r#"{"name": "edge-1", "state": "EXPLODED"}"#).unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidField { field: "state", .. }
        ));
    }

    #[test]
    fn missing_state_is_a_decode_error() {
        let err = decode_slice(r#"{"name": "edge-1"}"#).unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }

    #[test]
    fn slice_list_decodes_echoed_fields() {
        let data = decode_slices(
            r#"[{
                "name": "edge-1",
                "state": "AVAILABLE",
                "sliceId": "s-1",
                "networkIdentifier": {"mcc": "236", "mnc": "30"},
                "sliceInfo": {"serviceType": "eMBB", "differentiator": "444444"},
                "maxDevices": 64
            }]"#,
        )
        .unwrap();
        assert_eq!(data.len(), 1);
        let slice = &data[0];
        assert_eq!(slice.state, SliceState::Available);
        assert_eq!(
            slice.slice_info.as_ref().map(|info| info.service_type()),
            Some(ServiceType::EMbb)
        );
        assert_eq!(slice.max_devices, Some(64));
    }
}
