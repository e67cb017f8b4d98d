use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::{DeviceIdentity, DeviceIpv4Addr, NetworkAccessIdentifier, PhoneNumber};

/// Device identity as it appears inside request and response payloads.
///
/// Every field is optional on the wire; unset fields are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    network_access_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipv4_address: Option<WireDeviceIpv4>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipv6_address: Option<Ipv6Addr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDeviceIpv4 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public_address: Option<Ipv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    private_address: Option<Ipv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public_port: Option<u16>,
}

impl From<&DeviceIdentity> for WireDevice {
    fn from(identity: &DeviceIdentity) -> Self {
        Self {
            phone_number: identity.phone_number().map(|p| p.e164().to_owned()),
            network_access_identifier: identity
                .network_access_identifier()
                .map(|nai| nai.as_str().to_owned()),
            ipv4_address: identity.ipv4_address().map(|spec| WireDeviceIpv4 {
                public_address: spec.public_address(),
                private_address: spec.private_address(),
                public_port: spec.public_port(),
            }),
            ipv6_address: identity.ipv6_address(),
        }
    }
}

impl WireDevice {
    /// Rebuild a validated [`DeviceIdentity`] from an echoed wire device.
    pub(super) fn into_identity(self) -> Result<DeviceIdentity, TransportError> {
        let mut builder = DeviceIdentity::builder();
        if let Some(phone) = self.phone_number {
            let parsed =
                PhoneNumber::parse(None, &phone).map_err(|_| TransportError::InvalidField {
                    field: "phoneNumber",
                    value: phone,
                })?;
            builder = builder.phone_number(parsed);
        }
        if let Some(nai) = self.network_access_identifier {
            let parsed = NetworkAccessIdentifier::new(&nai).map_err(|_| {
                TransportError::InvalidField {
                    field: "networkAccessIdentifier",
                    value: nai,
                }
            })?;
            builder = builder.network_access_identifier(parsed);
        }
        if let Some(ipv4) = self.ipv4_address {
            let spec = DeviceIpv4Addr::new(
                ipv4.public_address,
                ipv4.private_address,
                ipv4.public_port,
            )
            .map_err(|_| TransportError::InvalidField {
                field: "ipv4Address",
                value: "empty ipv4 spec".to_owned(),
            })?;
            builder = builder.ipv4_address(spec);
        }
        if let Some(ipv6) = self.ipv6_address {
            builder = builder.ipv6_address(ipv6);
        }
        builder
            .build()
            .map_err(|_| TransportError::InvalidField {
                field: "device",
                value: "no identifier present".to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode_device(json: &str) -> Result<DeviceIdentity, TransportError> {
        let wire: WireDevice = serde_json::from_str(json)?;
        wire.into_identity()
    }

    fn identity_with_everything() -> DeviceIdentity {
        DeviceIdentity::builder()
            .phone_number("+358311234567".parse().unwrap())
            .network_access_identifier("device@testcsp.net".parse().unwrap())
            .ipv4_address(
                DeviceIpv4Addr::new(Some("1.2.3.4".parse().unwrap()), None, Some(80)).unwrap(),
            )
            .ipv6_address("2001:db8::1".parse().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn unset_fields_are_omitted_entirely() {
        let identity = DeviceIdentity::builder()
            .phone_number("+358311234567".parse().unwrap())
            .build()
            .unwrap();
        let wire = WireDevice::from(&identity);
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({"phoneNumber": "+358311234567"})
        );
    }

    #[test]
    fn full_identity_round_trips() {
        let identity = identity_with_everything();
        let wire = WireDevice::from(&identity);
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            value,
            json!({
                "phoneNumber": "+358311234567",
                "networkAccessIdentifier": "device@testcsp.net",
                "ipv4Address": {"publicAddress": "1.2.3.4", "publicPort": 80},
                "ipv6Address": "2001:db8::1"
            })
        );

        let decoded = decode_device(&value.to_string()).unwrap();
        assert_eq!(decoded, identity);
    }

    #[test]
    fn device_without_identifiers_is_rejected() {
        let err = decode_device("{}").unwrap_err();
        assert!(matches!(err, TransportError::InvalidField { field: "device", .. }));
    }

    #[test]
    fn bad_phone_number_in_response_is_rejected() {
        let err = decode_device(r#"{"phoneNumber": "garbage"}"#).unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidField {
                field: "phoneNumber",
                ..
            }
        ));
    }
}
