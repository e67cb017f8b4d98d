use chrono::{DateTime, Utc};
use std::fmt;

use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::{Congestion, CongestionSubscriptionParams, DeviceIdentity};
use crate::transport::{
    CongestionSubscriptionData, decode_congestion_readings, decode_congestion_subscription,
    decode_congestion_subscriptions, encode_congestion_query, encode_congestion_subscription,
};

const CONGESTION_BASE: &str = "congestion-insights/v0";

/// Client for congestion insights.
#[derive(Debug, Clone)]
pub struct Insights {
    connector: ApiConnector,
}

impl Insights {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// Subscribe to congestion level notifications for a device.
    pub async fn subscribe(
        &self,
        params: &CongestionSubscriptionParams,
    ) -> Result<CongestionSubscription, NacError> {
        let body = encode_congestion_subscription(params);
        let response = self
            .connector
            .post(&format!("{CONGESTION_BASE}/subscriptions"), body)
            .await?;
        let data = decode_congestion_subscription(&response)?;
        Ok(CongestionSubscription::bind(self.clone(), data))
    }

    /// Fetch a single subscription by id.
    pub async fn get(&self, id: &str) -> Result<CongestionSubscription, NacError> {
        let response = self
            .connector
            .get(&format!("{CONGESTION_BASE}/subscriptions/{id}"))
            .await?;
        let data = decode_congestion_subscription(&response)?;
        Ok(CongestionSubscription::bind(self.clone(), data))
    }

    /// List every congestion subscription visible to the caller.
    pub async fn get_all(&self) -> Result<Vec<CongestionSubscription>, NacError> {
        let response = self
            .connector
            .get(&format!("{CONGESTION_BASE}/subscriptions"))
            .await?;
        let subscriptions = decode_congestion_subscriptions(&response)?;
        Ok(subscriptions
            .into_iter()
            .map(|data| CongestionSubscription::bind(self.clone(), data))
            .collect())
    }

    /// Delete a subscription by id.
    pub async fn delete(&self, id: &str) -> Result<(), NacError> {
        self.connector
            .delete(&format!("{CONGESTION_BASE}/subscriptions/{id}"))
            .await
    }

    /// Query congestion readings for a device over an optional time window.
    pub async fn congestion(
        &self,
        device: &DeviceIdentity,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Congestion>, NacError> {
        let body = encode_congestion_query(device, start, end);
        let response = self
            .connector
            .post(&format!("{CONGESTION_BASE}/device"), body)
            .await?;
        Ok(decode_congestion_readings(&response)?)
    }
}

/// A congestion subscription bound to the client that produced it.
#[derive(Clone)]
pub struct CongestionSubscription {
    api: Insights,
    data: CongestionSubscriptionData,
}

impl fmt::Debug for CongestionSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CongestionSubscription")
            .field("id", &self.data.id)
            .finish_non_exhaustive()
    }
}

impl CongestionSubscription {
    pub(crate) fn bind(api: Insights, data: CongestionSubscriptionData) -> Self {
        Self { api, data }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn device(&self) -> Option<&DeviceIdentity> {
        self.data.device.as_ref()
    }

    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.data.starts_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.data.expires_at
    }

    /// Delete this subscription server-side.
    pub async fn delete(&self) -> Result<(), NacError> {
        self.api.delete(&self.data.id).await
    }
}
