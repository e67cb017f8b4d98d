use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::PhoneNumber;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveDateRequest<'a> {
    phone_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest<'a> {
    phone_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_age: Option<u32>,
}

/// Build the `POST retrieve-date` payload.
pub fn encode_sim_swap_date(phone_number: &PhoneNumber) -> serde_json::Value {
    serde_json::to_value(RetrieveDateRequest {
        phone_number: phone_number.e164(),
    })
    .expect("sim swap request serialization is infallible")
}

/// Build the `POST check` payload. `max_age` is in hours and omitted when unset.
pub fn encode_sim_swap_check(
    phone_number: &PhoneNumber,
    max_age: Option<u32>,
) -> serde_json::Value {
    serde_json::to_value(CheckRequest {
        phone_number: phone_number.e164(),
        max_age,
    })
    .expect("sim swap request serialization is infallible")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveDateResponse {
    #[serde(default)]
    latest_sim_change: Option<DateTime<Utc>>,
}

/// Decode the latest SIM change timestamp; absent when the SIM never swapped.
pub fn decode_sim_swap_date(json: &str) -> Result<Option<DateTime<Utc>>, TransportError> {
    let parsed: RetrieveDateResponse = serde_json::from_str(json)?;
    Ok(parsed.latest_sim_change)
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    swapped: bool,
}

/// Decode a swap-check verdict.
pub fn decode_sim_swap_check(json: &str) -> Result<bool, TransportError> {
    let parsed: CheckResponse = serde_json::from_str(json)?;
    Ok(parsed.swapped)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn phone() -> PhoneNumber {
        "+358311234567".parse().unwrap()
    }

    #[test]
    fn request_payloads_use_e164_and_omit_unset_max_age() {
        assert_eq!(
            encode_sim_swap_date(&phone()),
            json!({"phoneNumber": "+358311234567"})
        );
        assert_eq!(
            encode_sim_swap_check(&phone(), None),
            json!({"phoneNumber": "+358311234567"})
        );
        assert_eq!(
            encode_sim_swap_check(&phone(), Some(240)),
            json!({"phoneNumber": "+358311234567", "maxAge": 240})
        );
    }

    #[test]
    fn swap_date_may_be_absent() {
        assert_eq!(decode_sim_swap_date("{}").unwrap(), None);
        let date = decode_sim_swap_date(r#"{"latestSimChange": "2024-06-01T12:00:00Z"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-01T12:00:00+00:00");
    }

    #[test]
    fn check_verdict_requires_swapped_flag() {
        assert!(decode_sim_swap_check(r#"{"swapped": true}"#).unwrap());
        assert!(!decode_sim_swap_check(r#"{"swapped": false}"#).unwrap());
        assert!(matches!(
            decode_sim_swap_check("{}").unwrap_err(),
            TransportError::Json(_)
        ));
    }
}
