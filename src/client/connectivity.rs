use chrono::{DateTime, Utc};
use std::fmt;

use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::{
    ConnectivityEventType, ConnectivityStatus, ConnectivitySubscriptionParams, DeviceIdentity,
    RoamingStatus,
};
use crate::transport::{
    ConnectivitySubscriptionData, decode_connectivity_status, decode_connectivity_subscription,
    decode_connectivity_subscriptions, decode_roaming_status, encode_connectivity_subscription,
    encode_status_query,
};

const DEVICE_STATUS_BASE: &str = "device-status/v0";

/// Client for device-status subscriptions and direct status queries.
#[derive(Debug, Clone)]
pub struct Connectivity {
    connector: ApiConnector,
}

impl Connectivity {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// Subscribe to connectivity or roaming events for a device.
    pub async fn subscribe(
        &self,
        params: &ConnectivitySubscriptionParams,
    ) -> Result<ConnectivitySubscription, NacError> {
        let body = encode_connectivity_subscription(params);
        let response = self
            .connector
            .post(&format!("{DEVICE_STATUS_BASE}/event-subscriptions"), body)
            .await?;
        let data = decode_connectivity_subscription(&response)?;
        Ok(ConnectivitySubscription::bind(self.clone(), data))
    }

    /// Fetch a single subscription by id.
    pub async fn get(&self, id: &str) -> Result<ConnectivitySubscription, NacError> {
        let response = self
            .connector
            .get(&format!("{DEVICE_STATUS_BASE}/event-subscriptions/{id}"))
            .await?;
        let data = decode_connectivity_subscription(&response)?;
        Ok(ConnectivitySubscription::bind(self.clone(), data))
    }

    /// List every device-status subscription visible to the caller.
    pub async fn get_all(&self) -> Result<Vec<ConnectivitySubscription>, NacError> {
        let response = self
            .connector
            .get(&format!("{DEVICE_STATUS_BASE}/event-subscriptions"))
            .await?;
        let subscriptions = decode_connectivity_subscriptions(&response)?;
        Ok(subscriptions
            .into_iter()
            .map(|data| ConnectivitySubscription::bind(self.clone(), data))
            .collect())
    }

    /// Delete a subscription by id.
    pub async fn delete(&self, id: &str) -> Result<(), NacError> {
        self.connector
            .delete(&format!("{DEVICE_STATUS_BASE}/event-subscriptions/{id}"))
            .await
    }

    /// Query the current connectivity status of a device.
    pub async fn connectivity_status(
        &self,
        device: &DeviceIdentity,
    ) -> Result<ConnectivityStatus, NacError> {
        let response = self
            .connector
            .post(
                &format!("{DEVICE_STATUS_BASE}/connectivity"),
                encode_status_query(device),
            )
            .await?;
        Ok(decode_connectivity_status(&response)?)
    }

    /// Query the current roaming status of a device.
    pub async fn roaming_status(
        &self,
        device: &DeviceIdentity,
    ) -> Result<RoamingStatus, NacError> {
        let response = self
            .connector
            .post(
                &format!("{DEVICE_STATUS_BASE}/roaming"),
                encode_status_query(device),
            )
            .await?;
        Ok(decode_roaming_status(&response)?)
    }
}

/// A device-status subscription bound to the client that produced it.
#[derive(Clone)]
pub struct ConnectivitySubscription {
    api: Connectivity,
    data: ConnectivitySubscriptionData,
}

impl fmt::Debug for ConnectivitySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectivitySubscription")
            .field("id", &self.data.id)
            .field("event_type", &self.data.event_type)
            .finish_non_exhaustive()
    }
}

impl ConnectivitySubscription {
    pub(crate) fn bind(api: Connectivity, data: ConnectivitySubscriptionData) -> Self {
        Self { api, data }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn device(&self) -> Option<&DeviceIdentity> {
        self.data.device.as_ref()
    }

    pub fn event_type(&self) -> Option<ConnectivityEventType> {
        self.data.event_type
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

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{FakeTransport, connector};
    use super::*;
    use crate::domain::NotificationChannel;

    fn api(transport: FakeTransport) -> Connectivity {
        Connectivity::new(connector(transport))
    }

    fn device() -> DeviceIdentity {
        DeviceIdentity::builder()
            .network_access_identifier("device@testcsp.net".parse().unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn subscribe_posts_to_event_subscriptions() {
        let transport = FakeTransport::new();
        transport.push_response(
            201,
            r#"{
                "subscriptionId": "sub-1",
                "subscriptionDetail": {
                    "device": {"networkAccessIdentifier": "device@testcsp.net"},
                    "eventType": "CONNECTIVITY"
                }
            }"#,
        );
        let connectivity = api(transport.clone());

        let params = ConnectivitySubscriptionParams::new(
            device(),
            ConnectivityEventType::Connectivity,
            NotificationChannel::new("https://example.com/notify", None).unwrap(),
        );
        let subscription = connectivity.subscribe(&params).await.unwrap();

        assert_eq!(
            transport.last_request().url,
            "https://gateway.test/device-status/v0/event-subscriptions"
        );
        assert_eq!(subscription.id(), "sub-1");
        assert_eq!(
            subscription.event_type(),
            Some(ConnectivityEventType::Connectivity)
        );
    }

    #[tokio::test]
    async fn status_queries_post_the_device() {
        let transport = FakeTransport::new();
        transport.push_response(200, r#"{"connectivityStatus": "CONNECTED_DATA"}"#);
        transport.push_response(200, r#"{"roaming": true, "countryCode": 246}"#);
        let connectivity = api(transport.clone());

        let status = connectivity.connectivity_status(&device()).await.unwrap();
        assert_eq!(status, ConnectivityStatus::ConnectedData);

        let roaming = connectivity.roaming_status(&device()).await.unwrap();
        assert!(roaming.roaming);
        assert_eq!(roaming.country_code, Some(246));

        let recorded = transport.requests();
        assert_eq!(
            recorded[0].url,
            "https://gateway.test/device-status/v0/connectivity"
        );
        assert_eq!(
            recorded[1].url,
            "https://gateway.test/device-status/v0/roaming"
        );
        assert_eq!(
            recorded[0].body,
            Some(json!({"device": {"networkAccessIdentifier": "device@testcsp.net"}}))
        );
    }

    #[tokio::test]
    async fn subscription_delete_targets_its_id() {
        let transport = FakeTransport::new();
        transport.push_response(200, "");
        let connectivity = api(transport.clone());
        let subscription = ConnectivitySubscription::bind(
            connectivity,
            ConnectivitySubscriptionData {
                id: "sub-1".to_owned(),
                device: None,
                event_type: None,
                starts_at: None,
                expires_at: None,
            },
        );

        subscription.delete().await.unwrap();
        assert_eq!(
            transport.last_request().url,
            "https://gateway.test/device-status/v0/event-subscriptions/sub-1"
        );
    }
}
