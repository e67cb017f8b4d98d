use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use phonenumber::country;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone)]
/// Phone number identifying a device, normalized to E.164.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Wire field name (`phoneNumber`).
    pub const FIELD: &'static str = "phoneNumber";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation, as sent on the wire.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(None, s)
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Network access identifier in `user@domain` form (e.g. `device@testcsp.net`).
///
/// Invariant: non-empty after trimming and contains exactly one `@` separating
/// two non-empty halves.
pub struct NetworkAccessIdentifier(String);

impl NetworkAccessIdentifier {
    /// Wire field name (`networkAccessIdentifier`).
    pub const FIELD: &'static str = "networkAccessIdentifier";

    /// Create a validated [`NetworkAccessIdentifier`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        match trimmed.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() && !domain.contains('@') => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(ValidationError::InvalidNetworkAccessIdentifier {
                input: trimmed.to_owned(),
            }),
        }
    }

    /// Borrow the validated identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for NetworkAccessIdentifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// IPv4 identification of a device: public address, NATed private address,
/// and the public port the device is observed on.
///
/// Invariant: at least one of the three parts is set.
pub struct DeviceIpv4Addr {
    public_address: Option<Ipv4Addr>,
    private_address: Option<Ipv4Addr>,
    public_port: Option<u16>,
}

impl DeviceIpv4Addr {
    /// Create a validated [`DeviceIpv4Addr`] from its parts.
    pub fn new(
        public_address: Option<Ipv4Addr>,
        private_address: Option<Ipv4Addr>,
        public_port: Option<u16>,
    ) -> Result<Self, ValidationError> {
        if public_address.is_none() && private_address.is_none() && public_port.is_none() {
            return Err(ValidationError::EmptyIpv4Spec);
        }
        Ok(Self {
            public_address,
            private_address,
            public_port,
        })
    }

    /// Public address part.
    pub fn public_address(&self) -> Option<Ipv4Addr> {
        self.public_address
    }

    /// Private (NATed) address part.
    pub fn private_address(&self) -> Option<Ipv4Addr> {
        self.private_address
    }

    /// Public port part.
    pub fn public_port(&self) -> Option<u16> {
        self.public_port
    }
}

impl From<Ipv4Addr> for DeviceIpv4Addr {
    /// Upgrade a bare address: it is used as both the public and the private
    /// address, matching how a non-NATed device appears to the network.
    fn from(addr: Ipv4Addr) -> Self {
        Self {
            public_address: Some(addr),
            private_address: Some(addr),
            public_port: None,
        }
    }
}

impl FromStr for DeviceIpv4Addr {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Ipv4Addr>()
            .map(Self::from)
            .map_err(|_| ValidationError::EmptyIpv4Spec)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Identity of a device, as accepted by every device-scoped API.
///
/// Invariant: at least one identifier is present. Build via
/// [`DeviceIdentity::builder`]; the construction fails fast, before any
/// network call, when no identifier was supplied.
pub struct DeviceIdentity {
    network_access_identifier: Option<NetworkAccessIdentifier>,
    phone_number: Option<PhoneNumber>,
    ipv4_address: Option<DeviceIpv4Addr>,
    ipv6_address: Option<Ipv6Addr>,
}

impl DeviceIdentity {
    /// Start building a device identity.
    pub fn builder() -> DeviceIdentityBuilder {
        DeviceIdentityBuilder::default()
    }

    pub fn network_access_identifier(&self) -> Option<&NetworkAccessIdentifier> {
        self.network_access_identifier.as_ref()
    }

    pub fn phone_number(&self) -> Option<&PhoneNumber> {
        self.phone_number.as_ref()
    }

    pub fn ipv4_address(&self) -> Option<&DeviceIpv4Addr> {
        self.ipv4_address.as_ref()
    }

    pub fn ipv6_address(&self) -> Option<Ipv6Addr> {
        self.ipv6_address
    }
}

#[derive(Debug, Clone, Default)]
/// Builder for [`DeviceIdentity`].
pub struct DeviceIdentityBuilder {
    network_access_identifier: Option<NetworkAccessIdentifier>,
    phone_number: Option<PhoneNumber>,
    ipv4_address: Option<DeviceIpv4Addr>,
    ipv6_address: Option<Ipv6Addr>,
}

impl DeviceIdentityBuilder {
    /// Identify the device by its network access identifier.
    pub fn network_access_identifier(mut self, nai: NetworkAccessIdentifier) -> Self {
        self.network_access_identifier = Some(nai);
        self
    }

    /// Identify the device by phone number.
    pub fn phone_number(mut self, phone_number: PhoneNumber) -> Self {
        self.phone_number = Some(phone_number);
        self
    }

    /// Identify the device by IPv4 address. Accepts either a structured
    /// [`DeviceIpv4Addr`] or a bare [`Ipv4Addr`], which is upgraded to a
    /// structured spec with identical public/private addresses.
    pub fn ipv4_address(mut self, addr: impl Into<DeviceIpv4Addr>) -> Self {
        self.ipv4_address = Some(addr.into());
        self
    }

    /// Identify the device by IPv6 address.
    pub fn ipv6_address(mut self, addr: Ipv6Addr) -> Self {
        self.ipv6_address = Some(addr);
        self
    }

    /// Finish the identity, requiring at least one identifier.
    pub fn build(self) -> Result<DeviceIdentity, ValidationError> {
        if self.network_access_identifier.is_none()
            && self.phone_number.is_none()
            && self.ipv4_address.is_none()
            && self.ipv6_address.is_none()
        {
            return Err(ValidationError::MissingDeviceIdentifier);
        }
        Ok(DeviceIdentity {
            network_access_identifier: self.network_access_identifier,
            phone_number: self.phone_number,
            ipv4_address: self.ipv4_address,
            ipv6_address: self.ipv6_address,
        })
    }
}
