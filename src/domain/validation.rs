use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Empty { field: &'static str },
    MissingDeviceIdentifier,
    PhoneNumberRequired { operation: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidNetworkAccessIdentifier { input: String },
    EmptyIpv4Spec,
    PortRangeInverted { start: u16, end: u16 },
    PolygonTooSmall { actual: usize },
    InvalidCoordinate { latitude: f64, longitude: f64 },
    InvalidRadius { actual: f64 },
    MissingServiceAddress,
    MissingSliceId { name: String },
    InvalidDuration { actual: u64 },
    InvalidUrl { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MissingDeviceIdentifier => {
                write!(
                    f,
                    "device needs at least one identifier (network access identifier, phone number, ipv4 address or ipv6 address)"
                )
            }
            Self::PhoneNumberRequired { operation } => {
                write!(f, "{operation} requires a device with a phone number")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidNetworkAccessIdentifier { input } => {
                write!(f, "invalid network access identifier: {input}")
            }
            Self::EmptyIpv4Spec => {
                write!(
                    f,
                    "ipv4 address needs a public address, a private address or a public port"
                )
            }
            Self::PortRangeInverted { start, end } => {
                write!(f, "port range end must not precede start: {start}..{end}")
            }
            Self::PolygonTooSmall { actual } => {
                write!(f, "area of service needs at least 3 points, got {actual}")
            }
            Self::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(f, "coordinate out of range: ({latitude}, {longitude})"),
            Self::InvalidRadius { actual } => write!(f, "radius must be positive, got {actual}"),
            Self::MissingServiceAddress => {
                write!(f, "session needs a service ipv4 or ipv6 address")
            }
            Self::MissingSliceId { name } => {
                write!(f, "slice {name} has no server-assigned identifier yet")
            }
            Self::InvalidDuration { actual } => {
                write!(f, "duration must be positive, got {actual}")
            }
            Self::InvalidUrl { input } => write!(f, "invalid url: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
