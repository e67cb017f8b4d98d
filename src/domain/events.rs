use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::device::DeviceIdentity;
use crate::domain::slice::Point;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Webhook target notified about resource events: a URL plus an optional
/// bearer token the operator echoes back in the `Authorization` header.
pub struct NotificationChannel {
    url: Url,
    auth_token: Option<String>,
}

impl NotificationChannel {
    /// Create a channel, validating the URL.
    pub fn new(
        url: impl AsRef<str>,
        auth_token: Option<String>,
    ) -> Result<Self, ValidationError> {
        let url = Url::parse(url.as_ref()).map_err(|_| ValidationError::InvalidUrl {
            input: url.as_ref().to_owned(),
        })?;
        Ok(Self { url, auth_token })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Credential attached to an event sink.
///
/// Serializes with its canonical `credentialType` constant
/// (`ACCESSTOKEN` / `PLAIN`).
pub enum SinkCredential {
    AccessToken {
        access_token: String,
        expires_at: DateTime<Utc>,
    },
    Plain {
        identifier: String,
        secret: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Device-status event families a connectivity subscription can watch.
pub enum ConnectivityEventType {
    Connectivity,
    RoamingStatus,
}

impl ConnectivityEventType {
    /// Canonical wire constant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connectivity => "CONNECTIVITY",
            Self::RoamingStatus => "ROAMING_STATUS",
        }
    }
}

impl FromStr for ConnectivityEventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CONNECTIVITY" => Self::Connectivity,
            "ROAMING_STATUS" => Self::RoamingStatus,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for ConnectivityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Geofencing event types (CloudEvents type constants).
pub enum GeofencingEventType {
    AreaEntered,
    AreaLeft,
}

impl GeofencingEventType {
    /// Canonical wire constant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AreaEntered => "org.camaraproject.geofencing-subscriptions.v0.area-entered",
            Self::AreaLeft => "org.camaraproject.geofencing-subscriptions.v0.area-left",
        }
    }
}

impl FromStr for GeofencingEventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "org.camaraproject.geofencing-subscriptions.v0.area-entered" => Self::AreaEntered,
            "org.camaraproject.geofencing-subscriptions.v0.area-left" => Self::AreaLeft,
            _ => return Err(()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Congestion level reported for a time interval.
pub enum CongestionLevel {
    None,
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    /// Canonical wire constant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl FromStr for CongestionLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "NONE" => Self::None,
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            _ => return Err(()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// One congestion reading for a device over a time interval.
pub struct Congestion {
    pub level: CongestionLevel,
    pub confidence: Option<u8>,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Connectivity status of a device as reported by the device-status API.
pub enum ConnectivityStatus {
    ConnectedData,
    ConnectedSms,
    NotConnected,
}

impl FromStr for ConnectivityStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CONNECTED_DATA" => Self::ConnectedData,
            "CONNECTED_SMS" => Self::ConnectedSms,
            "NOT_CONNECTED" => Self::NotConnected,
            _ => return Err(()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Roaming status of a device.
pub struct RoamingStatus {
    pub roaming: bool,
    pub country_code: Option<u32>,
    pub country_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Circular geofence: center plus radius in meters.
pub struct GeofenceCircle {
    center: Point,
    radius: f64,
}

impl GeofenceCircle {
    /// Create a validated circle; the radius must be positive and finite.
    pub fn new(center: Point, radius: f64) -> Result<Self, ValidationError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ValidationError::InvalidRadius { actual: radius });
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Parameters for a device-status (connectivity/roaming) subscription.
pub struct ConnectivitySubscriptionParams {
    device: DeviceIdentity,
    event_type: ConnectivityEventType,
    notification: NotificationChannel,
    max_num_of_reports: Option<u32>,
    subscription_expire_time: Option<DateTime<Utc>>,
}

impl ConnectivitySubscriptionParams {
    pub fn new(
        device: DeviceIdentity,
        event_type: ConnectivityEventType,
        notification: NotificationChannel,
    ) -> Self {
        Self {
            device,
            event_type,
            notification,
            max_num_of_reports: None,
            subscription_expire_time: None,
        }
    }

    /// Stop notifying after this many reports.
    pub fn max_num_of_reports(mut self, max: u32) -> Self {
        self.max_num_of_reports = Some(max);
        self
    }

    /// Subscription end time.
    pub fn subscription_expire_time(mut self, at: DateTime<Utc>) -> Self {
        self.subscription_expire_time = Some(at);
        self
    }

    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    pub fn event_type(&self) -> ConnectivityEventType {
        self.event_type
    }

    pub fn notification_channel(&self) -> &NotificationChannel {
        &self.notification
    }

    pub fn reports_limit(&self) -> Option<u32> {
        self.max_num_of_reports
    }

    pub fn expire_time(&self) -> Option<DateTime<Utc>> {
        self.subscription_expire_time
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Parameters for a congestion-insights subscription.
pub struct CongestionSubscriptionParams {
    device: DeviceIdentity,
    notification: NotificationChannel,
    subscription_expire_time: Option<DateTime<Utc>>,
}

impl CongestionSubscriptionParams {
    pub fn new(device: DeviceIdentity, notification: NotificationChannel) -> Self {
        Self {
            device,
            notification,
            subscription_expire_time: None,
        }
    }

    /// Subscription end time.
    pub fn subscription_expire_time(mut self, at: DateTime<Utc>) -> Self {
        self.subscription_expire_time = Some(at);
        self
    }

    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    pub fn notification_channel(&self) -> &NotificationChannel {
        &self.notification
    }

    pub fn expire_time(&self) -> Option<DateTime<Utc>> {
        self.subscription_expire_time
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Parameters for a geofencing subscription.
pub struct GeofencingSubscriptionParams {
    device: DeviceIdentity,
    sink: Url,
    types: Vec<GeofencingEventType>,
    area: GeofenceCircle,
    sink_credential: Option<SinkCredential>,
    subscription_expire_time: Option<DateTime<Utc>>,
    subscription_max_events: Option<u32>,
    initial_event: Option<bool>,
}

impl GeofencingSubscriptionParams {
    /// Start geofencing parameters from the required pieces.
    ///
    /// At least one event type must be given.
    pub fn new(
        device: DeviceIdentity,
        sink: impl AsRef<str>,
        types: Vec<GeofencingEventType>,
        area: GeofenceCircle,
    ) -> Result<Self, ValidationError> {
        if types.is_empty() {
            return Err(ValidationError::Empty { field: "types" });
        }
        let sink = Url::parse(sink.as_ref()).map_err(|_| ValidationError::InvalidUrl {
            input: sink.as_ref().to_owned(),
        })?;
        Ok(Self {
            device,
            sink,
            types,
            area,
            sink_credential: None,
            subscription_expire_time: None,
            subscription_max_events: None,
            initial_event: None,
        })
    }

    /// Credential the operator presents when calling the sink.
    pub fn sink_credential(mut self, credential: SinkCredential) -> Self {
        self.sink_credential = Some(credential);
        self
    }

    /// Subscription end time.
    pub fn subscription_expire_time(mut self, at: DateTime<Utc>) -> Self {
        self.subscription_expire_time = Some(at);
        self
    }

    /// Stop after this many delivered events.
    pub fn subscription_max_events(mut self, max: u32) -> Self {
        self.subscription_max_events = Some(max);
        self
    }

    /// Request an immediate event describing the current state.
    pub fn initial_event(mut self, enabled: bool) -> Self {
        self.initial_event = Some(enabled);
        self
    }

    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    pub fn sink(&self) -> &Url {
        &self.sink
    }

    pub fn types(&self) -> &[GeofencingEventType] {
        &self.types
    }

    pub fn area(&self) -> &GeofenceCircle {
        &self.area
    }

    pub fn credential(&self) -> Option<&SinkCredential> {
        self.sink_credential.as_ref()
    }

    pub fn expire_time(&self) -> Option<DateTime<Utc>> {
        self.subscription_expire_time
    }

    pub fn max_events(&self) -> Option<u32> {
        self.subscription_max_events
    }

    pub fn initial_event_requested(&self) -> Option<bool> {
        self.initial_event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_channel_validates_url() {
        let channel = NotificationChannel::new("https://example.com/notify", None).unwrap();
        assert_eq!(channel.url().as_str(), "https://example.com/notify");
        assert!(channel.auth_token().is_none());
        assert!(NotificationChannel::new("not a url", None).is_err());
    }

    #[test]
    fn geofence_circle_rejects_bad_radius() {
        let center = Point::new(47.48, 19.07).unwrap();
        assert!(GeofenceCircle::new(center, 0.0).is_err());
        assert!(GeofenceCircle::new(center, -5.0).is_err());
        assert!(GeofenceCircle::new(center, f64::NAN).is_err());
        assert_eq!(GeofenceCircle::new(center, 2000.0).unwrap().radius(), 2000.0);
    }

    #[test]
    fn geofencing_params_require_event_types() {
        let device = DeviceIdentity::builder()
            .phone_number("+358311234567".parse().unwrap())
            .build()
            .unwrap();
        let area = GeofenceCircle::new(Point::new(47.48, 19.07).unwrap(), 2000.0).unwrap();
        let err = GeofencingSubscriptionParams::new(
            device.clone(),
            "https://example.com/sink",
            vec![],
            area,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "types" });

        let params = GeofencingSubscriptionParams::new(
            device,
            "https://example.com/sink",
            vec![GeofencingEventType::AreaEntered],
            area,
        )
        .unwrap();
        assert_eq!(params.types().len(), 1);
        assert!(params.initial_event_requested().is_none());
    }

    #[test]
    fn event_type_constants_round_trip() {
        assert_eq!(
            GeofencingEventType::AreaEntered.as_str().parse(),
            Ok(GeofencingEventType::AreaEntered)
        );
        assert_eq!("LOW".parse(), Ok(CongestionLevel::Low));
        assert!("EXTREME".parse::<CongestionLevel>().is_err());
        assert_eq!(ConnectivityEventType::RoamingStatus.as_str(), "ROAMING_STATUS");
    }
}
