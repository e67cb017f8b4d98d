use chrono::{DateTime, Utc};

use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::PhoneNumber;
use crate::transport::{
    decode_sim_swap_check, decode_sim_swap_date, encode_sim_swap_check, encode_sim_swap_date,
};

const SIM_SWAP_BASE: &str = "sim-swap/v0";

/// SIM swap queries, reachable through [`super::devices::Device`].
#[derive(Debug, Clone)]
pub(crate) struct SimSwapApi {
    connector: ApiConnector,
}

impl SimSwapApi {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// The timestamp of the latest SIM change, if the SIM ever swapped.
    pub(crate) async fn retrieve_date(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<DateTime<Utc>>, NacError> {
        let response = self
            .connector
            .post(
                &format!("{SIM_SWAP_BASE}/retrieve-date"),
                encode_sim_swap_date(phone_number),
            )
            .await?;
        Ok(decode_sim_swap_date(&response)?)
    }

    /// Whether the SIM swapped within the last `max_age` hours (operator
    /// default window when unset).
    pub(crate) async fn check(
        &self,
        phone_number: &PhoneNumber,
        max_age: Option<u32>,
    ) -> Result<bool, NacError> {
        let response = self
            .connector
            .post(
                &format!("{SIM_SWAP_BASE}/check"),
                encode_sim_swap_check(phone_number, max_age),
            )
            .await?;
        Ok(decode_sim_swap_check(&response)?)
    }
}
