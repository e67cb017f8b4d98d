use chrono::{DateTime, Utc};
use std::fmt;

use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::{DeviceIdentity, GeofencingEventType, GeofencingSubscriptionParams};
use crate::transport::{
    GeofencingSubscriptionData, decode_geofencing_subscription, decode_geofencing_subscriptions,
    encode_geofencing_subscription,
};

const GEOFENCING_BASE: &str = "geofencing-subscriptions/v0.3";

/// Client for geofencing subscriptions.
#[derive(Debug, Clone)]
pub struct Geofencing {
    connector: ApiConnector,
}

impl Geofencing {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// Subscribe to area-entered/area-left events for a device.
    pub async fn subscribe(
        &self,
        params: &GeofencingSubscriptionParams,
    ) -> Result<GeofencingSubscription, NacError> {
        let body = encode_geofencing_subscription(params);
        let response = self
            .connector
            .post(&format!("{GEOFENCING_BASE}/subscriptions"), body)
            .await?;
        let data = decode_geofencing_subscription(&response)?;
        Ok(GeofencingSubscription::bind(self.clone(), data))
    }

    /// Fetch a single subscription by id.
    pub async fn get(&self, id: &str) -> Result<GeofencingSubscription, NacError> {
        let response = self
            .connector
            .get(&format!("{GEOFENCING_BASE}/subscriptions/{id}"))
            .await?;
        let data = decode_geofencing_subscription(&response)?;
        Ok(GeofencingSubscription::bind(self.clone(), data))
    }

    /// List every geofencing subscription visible to the caller.
    pub async fn get_all(&self) -> Result<Vec<GeofencingSubscription>, NacError> {
        let response = self
            .connector
            .get(&format!("{GEOFENCING_BASE}/subscriptions"))
            .await?;
        let subscriptions = decode_geofencing_subscriptions(&response)?;
        Ok(subscriptions
            .into_iter()
            .map(|data| GeofencingSubscription::bind(self.clone(), data))
            .collect())
    }

    /// Delete a subscription by id.
    pub async fn delete(&self, id: &str) -> Result<(), NacError> {
        self.connector
            .delete(&format!("{GEOFENCING_BASE}/subscriptions/{id}"))
            .await
    }
}

/// A geofencing subscription bound to the client that produced it.
#[derive(Clone)]
pub struct GeofencingSubscription {
    api: Geofencing,
    data: GeofencingSubscriptionData,
}

impl fmt::Debug for GeofencingSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeofencingSubscription")
            .field("id", &self.data.id)
            .field("types", &self.data.types)
            .finish_non_exhaustive()
    }
}

impl GeofencingSubscription {
    pub(crate) fn bind(api: Geofencing, data: GeofencingSubscriptionData) -> Self {
        Self { api, data }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn device(&self) -> Option<&DeviceIdentity> {
        self.data.device.as_ref()
    }

    pub fn sink(&self) -> Option<&str> {
        self.data.sink.as_deref()
    }

    pub fn types(&self) -> &[GeofencingEventType] {
        &self.data.types
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
    use super::super::testing::{FakeTransport, connector};
    use super::*;
    use crate::domain::{GeofenceCircle, Point};

    fn api(transport: FakeTransport) -> Geofencing {
        Geofencing::new(connector(transport))
    }

    fn params() -> GeofencingSubscriptionParams {
        let device = DeviceIdentity::builder()
            .phone_number("+12065550100".parse().unwrap())
            .build()
            .unwrap();
        let area = GeofenceCircle::new(Point::new(47.48, 19.07).unwrap(), 2000.0).unwrap();
        GeofencingSubscriptionParams::new(
            device,
            "https://example.com/sink",
            vec![GeofencingEventType::AreaEntered],
            area,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn subscribe_posts_to_the_versioned_path() {
        let transport = FakeTransport::new();
        transport.push_response(
            201,
            r#"{
                "id": "geo-1",
                "sink": "https://example.com/sink",
                "types": ["org.camaraproject.geofencing-subscriptions.v0.area-entered"]
            }"#,
        );
        let geofencing = api(transport.clone());

        let subscription = geofencing.subscribe(&params()).await.unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.url,
            "https://gateway.test/geofencing-subscriptions/v0.3/subscriptions"
        );
        assert_eq!(request.body.unwrap()["protocol"], "HTTP");
        assert_eq!(subscription.id(), "geo-1");
        assert_eq!(subscription.types(), [GeofencingEventType::AreaEntered]);
    }

    #[tokio::test]
    async fn get_all_binds_each_subscription() {
        let transport = FakeTransport::new();
        transport.push_response(
            200,
            r#"[
                {"id": "geo-1", "types": []},
                {"id": "geo-2", "types": []}
            ]"#,
        );
        let geofencing = api(transport.clone());

        let subscriptions = geofencing.get_all().await.unwrap();
        assert_eq!(subscriptions.len(), 2);
        assert_eq!(subscriptions[1].id(), "geo-2");
    }

    #[tokio::test]
    async fn subscription_delete_targets_its_id() {
        let transport = FakeTransport::new();
        transport.push_response(200, "");
        let geofencing = api(transport.clone());
        let subscription = GeofencingSubscription::bind(
            geofencing,
            GeofencingSubscriptionData {
                id: "geo-1".to_owned(),
                device: None,
                sink: None,
                types: Vec::new(),
                starts_at: None,
                expires_at: None,
            },
        );

        subscription.delete().await.unwrap();
        assert_eq!(
            transport.last_request().url,
            "https://gateway.test/geofencing-subscriptions/v0.3/subscriptions/geo-1"
        );
    }
}
