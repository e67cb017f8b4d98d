use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::call_forwarding::CallForwardingApi;
use super::connectivity::Connectivity;
use super::error::NacError;
use super::insights::{CongestionSubscription, Insights};
use super::number_verification::NumberVerificationApi;
use super::sessions::{Session, Sessions};
use super::sim_swap::SimSwapApi;
use crate::domain::{
    Congestion, CongestionSubscriptionParams, ConnectivityStatus, DeviceIdentity,
    NotificationChannel, PhoneNumber, RoamingStatus, SessionParams, ValidationError,
};

/// Every per-device API a [`Device`] can reach, shared behind one `Arc`.
#[derive(Debug)]
pub(crate) struct ApiSet {
    pub(crate) sessions: Sessions,
    pub(crate) connectivity: Connectivity,
    pub(crate) insights: Insights,
    pub(crate) sim_swap: SimSwapApi,
    pub(crate) call_forwarding: CallForwardingApi,
    pub(crate) number_verification: NumberVerificationApi,
}

/// Entry point for device-scoped operations.
#[derive(Debug, Clone)]
pub struct Devices {
    apis: Arc<ApiSet>,
}

impl Devices {
    pub(crate) fn new(apis: Arc<ApiSet>) -> Self {
        Self { apis }
    }

    /// Bind a device identity to the client, yielding a handle that carries
    /// every device-scoped operation.
    pub fn get(&self, identity: DeviceIdentity) -> Device {
        Device {
            identity,
            apis: Arc::clone(&self.apis),
        }
    }
}

/// A device bound to the client that produced it.
///
/// Operations that the network keys on a phone number (SIM swap, call
/// forwarding, number verification) fail locally when the identity has
/// none.
#[derive(Clone)]
pub struct Device {
    identity: DeviceIdentity,
    apis: Arc<ApiSet>,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Device {
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn phone_number(&self) -> Option<&PhoneNumber> {
        self.identity.phone_number()
    }

    fn require_phone(&self, operation: &'static str) -> Result<&PhoneNumber, NacError> {
        self.identity
            .phone_number()
            .ok_or_else(|| ValidationError::PhoneNumberRequired { operation }.into())
    }

    /// Create a QoD session for this device.
    pub async fn create_qod_session(&self, params: &SessionParams) -> Result<Session, NacError> {
        self.apis.sessions.create(&self.identity, params).await
    }

    /// The sessions the server attributes to this device.
    pub async fn sessions(&self) -> Result<Vec<Session>, NacError> {
        let all = self.apis.sessions.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|session| session.device() == Some(&self.identity))
            .collect())
    }

    /// Delete every session attributed to this device.
    pub async fn clear_sessions(&self) -> Result<(), NacError> {
        for session in self.sessions().await? {
            session.delete().await?;
        }
        Ok(())
    }

    /// The current connectivity status of this device.
    pub async fn get_connectivity(&self) -> Result<ConnectivityStatus, NacError> {
        self.apis
            .connectivity
            .connectivity_status(&self.identity)
            .await
    }

    /// The current roaming status of this device.
    pub async fn get_roaming(&self) -> Result<RoamingStatus, NacError> {
        self.apis.connectivity.roaming_status(&self.identity).await
    }

    /// Congestion readings for this device over an optional time window.
    pub async fn get_congestion(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Congestion>, NacError> {
        self.apis.insights.congestion(&self.identity, start, end).await
    }

    /// Subscribe to congestion level notifications for this device.
    pub async fn subscribe_to_congestion_info(
        &self,
        notification: NotificationChannel,
        subscription_expire_time: Option<DateTime<Utc>>,
    ) -> Result<CongestionSubscription, NacError> {
        let mut params = CongestionSubscriptionParams::new(self.identity.clone(), notification);
        if let Some(at) = subscription_expire_time {
            params = params.subscription_expire_time(at);
        }
        self.apis.insights.subscribe(&params).await
    }

    /// The timestamp of the latest SIM change, if the SIM ever swapped.
    pub async fn get_sim_swap_date(&self) -> Result<Option<DateTime<Utc>>, NacError> {
        let phone = self.require_phone("get_sim_swap_date")?;
        self.apis.sim_swap.retrieve_date(phone).await
    }

    /// Whether the SIM swapped within the last `max_age` hours.
    pub async fn verify_sim_swap(&self, max_age: Option<u32>) -> Result<bool, NacError> {
        let phone = self.require_phone("verify_sim_swap")?;
        self.apis.sim_swap.check(phone, max_age).await
    }

    /// The call-forwarding services currently active on this line.
    pub async fn get_call_forwarding(&self) -> Result<Vec<String>, NacError> {
        let phone = self.require_phone("get_call_forwarding")?;
        self.apis.call_forwarding.active_services(phone).await
    }

    /// Whether unconditional call forwarding is active on this line.
    pub async fn verify_unconditional_forwarding(&self) -> Result<bool, NacError> {
        let phone = self.require_phone("verify_unconditional_forwarding")?;
        self.apis.call_forwarding.unconditional(phone).await
    }

    /// Verify that this device owns its claimed phone number, using the
    /// authorization code obtained through the operator's OAuth flow.
    pub async fn verify_number(&self, code: &str) -> Result<bool, NacError> {
        let phone = self.require_phone("verify_number")?;
        self.apis.number_verification.verify(phone, code).await
    }

    /// The network-asserted phone number of this device.
    pub async fn get_phone_number(&self) -> Result<PhoneNumber, NacError> {
        self.apis.number_verification.device_phone_number().await
    }
}
