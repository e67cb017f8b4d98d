use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::PhoneNumber;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ForwardingQuery<'a> {
    phone_number: &'a str,
}

/// Build the body shared by both call-forwarding queries.
pub fn encode_call_forwarding_query(phone_number: &PhoneNumber) -> serde_json::Value {
    serde_json::to_value(ForwardingQuery {
        phone_number: phone_number.e164(),
    })
    .expect("call forwarding request serialization is infallible")
}

/// Decode the list of active call-forwarding service names.
pub fn decode_call_forwardings(json: &str) -> Result<Vec<String>, TransportError> {
    let parsed: Vec<String> = serde_json::from_str(json)?;
    Ok(parsed)
}

#[derive(Debug, Deserialize)]
struct UnconditionalResponse {
    active: bool,
}

/// Decode the unconditional call-forwarding verdict.
pub fn decode_unconditional_forwarding(json: &str) -> Result<bool, TransportError> {
    let parsed: UnconditionalResponse = serde_json::from_str(json)?;
    Ok(parsed.active)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_payload_uses_e164() {
        let phone: PhoneNumber = "+358311234567".parse().unwrap();
        assert_eq!(
            encode_call_forwarding_query(&phone),
            json!({"phoneNumber": "+358311234567"})
        );
    }

    #[test]
    fn forwarding_lists_decode() {
        assert_eq!(
            decode_call_forwardings(r#"["unconditional", "conditional"]"#).unwrap(),
            vec!["unconditional".to_owned(), "conditional".to_owned()]
        );
        assert!(decode_call_forwardings("[]").unwrap().is_empty());
    }

    #[test]
    fn unconditional_verdict_requires_active_flag() {
        assert!(decode_unconditional_forwarding(r#"{"active": true}"#).unwrap());
        assert!(matches!(
            decode_unconditional_forwarding("{}").unwrap_err(),
            TransportError::Json(_)
        ));
    }
}
