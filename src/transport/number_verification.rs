use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::PhoneNumber;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationRequest<'a> {
    phone_number: &'a str,
    code: &'a str,
}

/// Build the `POST verify` payload from the phone number and the
/// authorization code obtained through the operator's OAuth flow.
pub fn encode_verification(phone_number: &PhoneNumber, code: &str) -> serde_json::Value {
    serde_json::to_value(VerificationRequest {
        phone_number: phone_number.e164(),
        code,
    })
    .expect("verification request serialization is infallible")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerificationResponse {
    device_phone_number_verified: bool,
}

/// Decode the verification verdict.
pub fn decode_verification(json: &str) -> Result<bool, TransportError> {
    let parsed: VerificationResponse = serde_json::from_str(json)?;
    Ok(parsed.device_phone_number_verified)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DevicePhoneNumberResponse {
    device_phone_number: String,
}

/// Decode the network-asserted phone number of the device.
pub fn decode_device_phone_number(json: &str) -> Result<PhoneNumber, TransportError> {
    let parsed: DevicePhoneNumberResponse = serde_json::from_str(json)?;
    PhoneNumber::parse(None, &parsed.device_phone_number).map_err(|_| {
        TransportError::InvalidField {
            field: "devicePhoneNumber",
            value: parsed.device_phone_number,
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn verification_request_carries_code_and_e164() {
        let phone: PhoneNumber = "+358311234567".parse().unwrap();
        assert_eq!(
            encode_verification(&phone, "auth-code-1"),
            json!({"phoneNumber": "+358311234567", "code": "auth-code-1"})
        );
    }

    #[test]
    fn verdict_and_phone_number_decode() {
        assert!(decode_verification(r#"{"devicePhoneNumberVerified": true}"#).unwrap());
        let phone =
            decode_device_phone_number(r#"{"devicePhoneNumber": "+358311234567"}"#).unwrap();
        assert_eq!(phone.e164(), "+358311234567");
    }

    #[test]
    fn malformed_phone_number_is_rejected() {
        let err = decode_device_phone_number(r#"{"devicePhoneNumber": "garbage"}"#).unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidField {
                field: "devicePhoneNumber",
                ..
            }
        ));
    }
}
