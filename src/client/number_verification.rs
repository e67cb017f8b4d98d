use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::PhoneNumber;
use crate::transport::{decode_device_phone_number, decode_verification, encode_verification};

const NUMBER_VERIFICATION_BASE: &str = "number-verification/v0";

/// Number verification, reachable through [`super::devices::Device`].
#[derive(Debug, Clone)]
pub(crate) struct NumberVerificationApi {
    connector: ApiConnector,
}

impl NumberVerificationApi {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// Verify that the device behind the authorization code owns the given
    /// phone number.
    pub(crate) async fn verify(
        &self,
        phone_number: &PhoneNumber,
        code: &str,
    ) -> Result<bool, NacError> {
        let response = self
            .connector
            .post(
                &format!("{NUMBER_VERIFICATION_BASE}/verify"),
                encode_verification(phone_number, code),
            )
            .await?;
        Ok(decode_verification(&response)?)
    }

    /// The network-asserted phone number of the calling device.
    pub(crate) async fn device_phone_number(&self) -> Result<PhoneNumber, NacError> {
        let response = self
            .connector
            .get(&format!("{NUMBER_VERIFICATION_BASE}/device-phone-number"))
            .await?;
        Ok(decode_device_phone_number(&response)?)
    }
}
