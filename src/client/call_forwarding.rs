use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::PhoneNumber;
use crate::transport::{
    decode_call_forwardings, decode_unconditional_forwarding, encode_call_forwarding_query,
};

const CALL_FORWARDING_BASE: &str = "call-forwarding-signal/v0.3";

/// Call-forwarding queries, reachable through [`super::devices::Device`].
#[derive(Debug, Clone)]
pub(crate) struct CallForwardingApi {
    connector: ApiConnector,
}

impl CallForwardingApi {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// The call-forwarding services currently active on the line.
    pub(crate) async fn active_services(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Vec<String>, NacError> {
        let response = self
            .connector
            .post(
                &format!("{CALL_FORWARDING_BASE}/call-forwardings"),
                encode_call_forwarding_query(phone_number),
            )
            .await?;
        Ok(decode_call_forwardings(&response)?)
    }

    /// Whether unconditional call forwarding is active on the line.
    pub(crate) async fn unconditional(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<bool, NacError> {
        let response = self
            .connector
            .post(
                &format!("{CALL_FORWARDING_BASE}/unconditional-call-forwardings"),
                encode_call_forwarding_query(phone_number),
            )
            .await?;
        Ok(decode_unconditional_forwarding(&response)?)
    }
}
