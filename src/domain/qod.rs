use std::net::{Ipv4Addr, Ipv6Addr};

use crate::domain::events::NotificationChannel;
use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Requested QoS profile for a session (`qosProfile`).
///
/// Profiles are operator-defined names; the value is kept verbatim.
/// Invariant: non-empty after trimming.
pub struct QosProfile(String);

impl QosProfile {
    /// Wire field name (`qosProfile`).
    pub const FIELD: &'static str = "qosProfile";

    /// Create a validated [`QosProfile`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the profile name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Inclusive port range.
///
/// Programmatic field names are `start`/`end`; on the wire the range is
/// written as `from`/`to`.
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Create a validated range; `end` must not precede `start`.
    pub fn new(start: u16, end: u16) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::PortRangeInverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Port selection for one side of a session: either an enumerated list of
/// ports or a list of ranges. The two representations are mutually exclusive.
pub enum PortsSpec {
    Ports(Vec<u16>),
    Ranges(Vec<PortRange>),
}

#[derive(Debug, Clone, PartialEq)]
/// Parameters for creating a QoD session.
///
/// Only the profile is mandatory up front; a service IPv4 or IPv6 address
/// must be supplied before the session is created. Everything else is
/// optional and omitted from the wire payload when unset.
pub struct SessionParams {
    profile: QosProfile,
    service_ipv4: Option<Ipv4Addr>,
    service_ipv6: Option<Ipv6Addr>,
    device_ports: Option<PortsSpec>,
    service_ports: Option<PortsSpec>,
    duration: Option<u64>,
    notification: Option<NotificationChannel>,
}

impl SessionParams {
    /// Start session parameters with the requested QoS profile.
    pub fn new(profile: QosProfile) -> Self {
        Self {
            profile,
            service_ipv4: None,
            service_ipv6: None,
            device_ports: None,
            service_ports: None,
            duration: None,
            notification: None,
        }
    }

    /// IPv4 address of the application server.
    pub fn service_ipv4(mut self, addr: Ipv4Addr) -> Self {
        self.service_ipv4 = Some(addr);
        self
    }

    /// IPv6 address of the application server.
    pub fn service_ipv6(mut self, addr: Ipv6Addr) -> Self {
        self.service_ipv6 = Some(addr);
        self
    }

    /// Ports used on the device side.
    pub fn device_ports(mut self, ports: PortsSpec) -> Self {
        self.device_ports = Some(ports);
        self
    }

    /// Ports used on the application-server side.
    pub fn service_ports(mut self, ports: PortsSpec) -> Self {
        self.service_ports = Some(ports);
        self
    }

    /// Requested session duration in seconds.
    pub fn duration(mut self, seconds: u64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Webhook notified about session status changes.
    pub fn notification(mut self, channel: NotificationChannel) -> Self {
        self.notification = Some(channel);
        self
    }

    pub fn profile(&self) -> &QosProfile {
        &self.profile
    }

    pub fn service_ipv4_addr(&self) -> Option<Ipv4Addr> {
        self.service_ipv4
    }

    pub fn service_ipv6_addr(&self) -> Option<Ipv6Addr> {
        self.service_ipv6
    }

    pub fn device_ports_spec(&self) -> Option<&PortsSpec> {
        self.device_ports.as_ref()
    }

    pub fn service_ports_spec(&self) -> Option<&PortsSpec> {
        self.service_ports.as_ref()
    }

    pub fn duration_secs(&self) -> Option<u64> {
        self.duration
    }

    pub fn notification_channel(&self) -> Option<&NotificationChannel> {
        self.notification.as_ref()
    }

    /// Sessions cannot be created without a service-side address.
    pub(crate) fn ensure_service_address(&self) -> Result<(), ValidationError> {
        if self.service_ipv4.is_none() && self.service_ipv6.is_none() {
            return Err(ValidationError::MissingServiceAddress);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qos_profile_rejects_empty() {
        assert!(QosProfile::new("  ").is_err());
        assert_eq!(QosProfile::new(" QOS_L ").unwrap().as_str(), "QOS_L");
    }

    #[test]
    fn port_range_rejects_inverted_bounds() {
        assert!(PortRange::new(499, 80).is_err());
        let range = PortRange::new(80, 499).unwrap();
        assert_eq!(range.start(), 80);
        assert_eq!(range.end(), 499);
        assert!(PortRange::new(80, 80).is_ok());
    }

    #[test]
    fn session_params_require_a_service_address() {
        let params = SessionParams::new(QosProfile::new("QOS_L").unwrap());
        assert_eq!(
            params.ensure_service_address(),
            Err(ValidationError::MissingServiceAddress)
        );

        let params = params.service_ipv4("5.6.7.8".parse().unwrap());
        assert!(params.ensure_service_address().is_ok());
        assert_eq!(params.duration_secs(), None);
    }
}
