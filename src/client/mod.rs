//! Client layer: the HTTP connector, the error taxonomy, and one resource
//! client per API family, all reachable from [`NetworkAsCodeClient`].

use std::sync::Arc;
use std::time::Duration;

use url::Url;

mod authorization;
mod call_forwarding;
mod connectivity;
mod connector;
mod devices;
mod error;
mod geofencing;
mod insights;
mod number_verification;
mod sessions;
mod sim_swap;
mod slice;
#[cfg(test)]
mod testing;

pub use authorization::{AuthEndpoints, Authorization, ClientCredentials};
pub use connectivity::{Connectivity, ConnectivitySubscription};
pub use devices::{Device, Devices};
pub use error::NacError;
pub use geofencing::{Geofencing, GeofencingSubscription};
pub use insights::{CongestionSubscription, Insights};
pub use sessions::{Session, Sessions};
pub use slice::{Slice, Slices};

use call_forwarding::CallForwardingApi;
use connector::{ApiConnector, ReqwestTransport};
use devices::ApiSet;
use number_verification::NumberVerificationApi;
use sim_swap::SimSwapApi;

use crate::domain::ValidationError;

const DEFAULT_BASE_URL: &str = "https://network-as-code.p-eu.rapidapi.com";

/// Top-level client for a Network as Code gateway.
///
/// Cheap to clone; every resource client shares one connector underneath.
#[derive(Debug, Clone)]
pub struct NetworkAsCodeClient {
    devices: Devices,
    sessions: Sessions,
    slices: Slices,
    connectivity: Connectivity,
    insights: Insights,
    geofencing: Geofencing,
    authorization: Authorization,
}

impl NetworkAsCodeClient {
    /// Connect to the default gateway with an application token.
    pub fn new(token: impl Into<String>) -> Result<Self, NacError> {
        Self::builder(token).build()
    }

    /// Start configuring a client: base URL, timeout, user agent, dev mode.
    pub fn builder(token: impl Into<String>) -> NetworkAsCodeClientBuilder {
        NetworkAsCodeClientBuilder {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            dev_mode: false,
        }
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn slices(&self) -> &Slices {
        &self.slices
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn insights(&self) -> &Insights {
        &self.insights
    }

    pub fn geofencing(&self) -> &Geofencing {
        &self.geofencing
    }

    pub fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    fn from_connector(connector: ApiConnector) -> Self {
        let sessions = Sessions::new(connector.clone());
        let connectivity = Connectivity::new(connector.clone());
        let insights = Insights::new(connector.clone());
        let apis = Arc::new(ApiSet {
            sessions: sessions.clone(),
            connectivity: connectivity.clone(),
            insights: insights.clone(),
            sim_swap: SimSwapApi::new(connector.clone()),
            call_forwarding: CallForwardingApi::new(connector.clone()),
            number_verification: NumberVerificationApi::new(connector.clone()),
        });
        Self {
            devices: Devices::new(apis),
            sessions,
            slices: Slices::new(connector.clone()),
            connectivity,
            insights,
            geofencing: Geofencing::new(connector.clone()),
            authorization: Authorization::new(connector),
        }
    }
}

/// Builder for [`NetworkAsCodeClient`].
#[derive(Debug, Clone)]
pub struct NetworkAsCodeClientBuilder {
    token: String,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    dev_mode: bool,
}

impl NetworkAsCodeClientBuilder {
    /// Point the client at a different gateway.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overall per-request timeout; no timeout when unset.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Route requests through the operator's test mode, which answers with
    /// canned data and never touches real subscribers.
    pub fn dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        self
    }

    pub fn build(self) -> Result<NetworkAsCodeClient, NacError> {
        if self.token.trim().is_empty() {
            return Err(ValidationError::Empty { field: "token" }.into());
        }
        let base_url = Url::parse(&self.base_url).map_err(|_| ValidationError::InvalidUrl {
            input: self.base_url.clone(),
        })?;
        let transport = ReqwestTransport::new(self.timeout, self.user_agent.as_deref())?;
        let connector = ApiConnector::new(Arc::new(transport), base_url, self.token, self.dev_mode);
        Ok(NetworkAsCodeClient::from_connector(connector))
    }
}
