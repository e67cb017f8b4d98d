use std::fmt;
use std::str::FromStr;

use crate::domain::events::NotificationChannel;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Mobile network identifier: country code + network code pair.
///
/// Invariant: MCC is exactly 3 digits, MNC is 2 or 3 digits.
pub struct NetworkIdentifier {
    mcc: String,
    mnc: String,
}

impl NetworkIdentifier {
    /// Create a validated [`NetworkIdentifier`].
    pub fn new(mcc: impl Into<String>, mnc: impl Into<String>) -> Result<Self, ValidationError> {
        let mcc = mcc.into();
        let mnc = mnc.into();
        if mcc.len() != 3 || !mcc.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::Empty { field: "mcc" });
        }
        if !(2..=3).contains(&mnc.len()) || !mnc.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::Empty { field: "mnc" });
        }
        Ok(Self { mcc, mnc })
    }

    pub fn mcc(&self) -> &str {
        &self.mcc
    }

    pub fn mnc(&self) -> &str {
        &self.mnc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// 3GPP slice/service type.
pub enum ServiceType {
    /// Enhanced mobile broadband.
    EMbb,
    /// Ultra-reliable low-latency communication.
    Urllc,
    /// Massive machine-type communication.
    MMtc,
}

impl ServiceType {
    /// Canonical wire constant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EMbb => "eMBB",
            Self::Urllc => "URLLC",
            Self::MMtc => "mMTC",
        }
    }
}

impl FromStr for ServiceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eMBB" => Self::EMbb,
            "URLLC" => Self::Urllc,
            "mMTC" => Self::MMtc,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Slice classification: service type plus optional differentiator.
pub struct SliceInfo {
    service_type: ServiceType,
    differentiator: Option<String>,
}

impl SliceInfo {
    pub fn new(service_type: ServiceType, differentiator: Option<String>) -> Self {
        Self {
            service_type,
            differentiator,
        }
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn differentiator(&self) -> Option<&str> {
        self.differentiator.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A latitude/longitude vertex of an area-of-service polygon.
pub struct Point {
    latitude: f64,
    longitude: f64,
}

impl Point {
    /// Create a validated point; latitude in `-90..=90`, longitude in `-180..=180`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Ordered polygon describing where a slice is served.
///
/// Invariant: at least 3 vertices.
pub struct AreaOfService {
    polygon: Vec<Point>,
}

impl AreaOfService {
    /// Create a validated area of service.
    pub fn new(polygon: Vec<Point>) -> Result<Self, ValidationError> {
        if polygon.len() < 3 {
            return Err(ValidationError::PolygonTooSmall {
                actual: polygon.len(),
            });
        }
        Ok(Self { polygon })
    }

    pub fn polygon(&self) -> &[Point] {
        &self.polygon
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Guaranteed/maximum throughput bounds in bits per second.
pub struct Throughput {
    pub guaranteed: f64,
    pub maximum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Lifecycle state of a network slice.
///
/// Transitions are driven by the remote system; the client never enforces
/// them locally, it only reflects what the server reports.
pub enum SliceState {
    NotSubmitted,
    Pending,
    Available,
    Operating,
    Deleted,
}

impl SliceState {
    /// Canonical wire constant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSubmitted => "NOT_SUBMITTED",
            Self::Pending => "PENDING",
            Self::Available => "AVAILABLE",
            Self::Operating => "OPERATING",
            Self::Deleted => "DELETED",
        }
    }
}

impl FromStr for SliceState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "NOT_SUBMITTED" => Self::NotSubmitted,
            "PENDING" => Self::Pending,
            "AVAILABLE" => Self::Available,
            "OPERATING" => Self::Operating,
            "DELETED" => Self::Deleted,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for SliceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Parameters for creating a network slice.
pub struct SliceParams {
    name: String,
    network_identifier: NetworkIdentifier,
    slice_info: SliceInfo,
    notification: Option<NotificationChannel>,
    area_of_service: Option<AreaOfService>,
    max_data_connections: Option<u64>,
    max_devices: Option<u64>,
    slice_downlink_throughput: Option<Throughput>,
    slice_uplink_throughput: Option<Throughput>,
    device_downlink_throughput: Option<Throughput>,
    device_uplink_throughput: Option<Throughput>,
}

impl SliceParams {
    /// Start slice parameters from the required pieces.
    ///
    /// The name is chosen by the caller and immutable once the slice exists.
    pub fn new(
        name: impl Into<String>,
        network_identifier: NetworkIdentifier,
        slice_info: SliceInfo,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(Self {
            name: name.trim().to_owned(),
            network_identifier,
            slice_info,
            notification: None,
            area_of_service: None,
            max_data_connections: None,
            max_devices: None,
            slice_downlink_throughput: None,
            slice_uplink_throughput: None,
            device_downlink_throughput: None,
            device_uplink_throughput: None,
        })
    }

    pub fn notification(mut self, channel: NotificationChannel) -> Self {
        self.notification = Some(channel);
        self
    }

    pub fn area_of_service(mut self, area: AreaOfService) -> Self {
        self.area_of_service = Some(area);
        self
    }

    pub fn max_data_connections(mut self, max: u64) -> Self {
        self.max_data_connections = Some(max);
        self
    }

    pub fn max_devices(mut self, max: u64) -> Self {
        self.max_devices = Some(max);
        self
    }

    pub fn slice_downlink_throughput(mut self, throughput: Throughput) -> Self {
        self.slice_downlink_throughput = Some(throughput);
        self
    }

    pub fn slice_uplink_throughput(mut self, throughput: Throughput) -> Self {
        self.slice_uplink_throughput = Some(throughput);
        self
    }

    pub fn device_downlink_throughput(mut self, throughput: Throughput) -> Self {
        self.device_downlink_throughput = Some(throughput);
        self
    }

    pub fn device_uplink_throughput(mut self, throughput: Throughput) -> Self {
        self.device_uplink_throughput = Some(throughput);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network_identifier(&self) -> &NetworkIdentifier {
        &self.network_identifier
    }

    pub fn slice_info(&self) -> &SliceInfo {
        &self.slice_info
    }

    pub fn notification_channel(&self) -> Option<&NotificationChannel> {
        self.notification.as_ref()
    }

    pub fn area(&self) -> Option<&AreaOfService> {
        self.area_of_service.as_ref()
    }

    pub fn max_data_connections_limit(&self) -> Option<u64> {
        self.max_data_connections
    }

    pub fn max_devices_limit(&self) -> Option<u64> {
        self.max_devices
    }

    pub fn slice_downlink(&self) -> Option<Throughput> {
        self.slice_downlink_throughput
    }

    pub fn slice_uplink(&self) -> Option<Throughput> {
        self.slice_uplink_throughput
    }

    pub fn device_downlink(&self) -> Option<Throughput> {
        self.device_downlink_throughput
    }

    pub fn device_uplink(&self) -> Option<Throughput> {
        self.device_uplink_throughput
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_identifier_validates_digit_lengths() {
        assert!(NetworkIdentifier::new("236", "30").is_ok());
        assert!(NetworkIdentifier::new("236", "300").is_ok());
        assert!(NetworkIdentifier::new("23", "30").is_err());
        assert!(NetworkIdentifier::new("2a6", "30").is_err());
        assert!(NetworkIdentifier::new("236", "3").is_err());
    }

    #[test]
    fn point_rejects_out_of_range_coordinates() {
        assert!(Point::new(91.0, 0.0).is_err());
        assert!(Point::new(0.0, -181.0).is_err());
        assert!(Point::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn area_of_service_needs_three_points() {
        let p = Point::new(47.0, 19.0).unwrap();
        assert!(matches!(
            AreaOfService::new(vec![p, p]),
            Err(ValidationError::PolygonTooSmall { actual: 2 })
        ));
        assert!(AreaOfService::new(vec![p, p, p]).is_ok());
    }

    #[test]
    fn slice_state_round_trips_through_strings() {
        for state in [
            SliceState::NotSubmitted,
            SliceState::Pending,
            SliceState::Available,
            SliceState::Operating,
            SliceState::Deleted,
        ] {
            assert_eq!(state.as_str().parse::<SliceState>(), Ok(state));
        }
        assert!("GONE".parse::<SliceState>().is_err());
    }

    #[test]
    fn slice_params_trim_and_validate_name() {
        let net = NetworkIdentifier::new("236", "30").unwrap();
        let info = SliceInfo::new(ServiceType::EMbb, Some("444444".to_owned()));
        let params = SliceParams::new(" edge-1 ", net.clone(), info.clone()).unwrap();
        assert_eq!(params.name(), "edge-1");
        assert!(SliceParams::new("   ", net, info).is_err());
    }
}
