//! Domain layer: strong types with validation and invariants (no I/O).

mod device;
mod events;
mod qod;
mod slice;
mod validation;

pub use device::{
    DeviceIdentity, DeviceIdentityBuilder, DeviceIpv4Addr, NetworkAccessIdentifier, PhoneNumber,
};
pub use events::{
    Congestion, CongestionLevel, CongestionSubscriptionParams, ConnectivityEventType,
    ConnectivityStatus, ConnectivitySubscriptionParams, GeofenceCircle, GeofencingEventType,
    GeofencingSubscriptionParams, NotificationChannel, RoamingStatus, SinkCredential,
};
pub use qod::{PortRange, PortsSpec, QosProfile, SessionParams};
pub use slice::{
    AreaOfService, NetworkIdentifier, Point, ServiceType, SliceInfo, SliceParams, SliceState,
    Throughput,
};
pub use validation::ValidationError;
