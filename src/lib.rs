//! Typed Rust client for Network as Code telecom APIs.
//!
//! The crate is layered: a domain layer of strong types with local
//! validation, a transport layer for wire-format quirks, and a client layer
//! with one resource client per API family, all reachable from
//! [`NetworkAsCodeClient`].
//!
//! ```rust,no_run
//! use network_as_code::{
//!     DeviceIdentity, NetworkAsCodeClient, QosProfile, SessionParams,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), network_as_code::NacError> {
//!     let client = NetworkAsCodeClient::new("<application-token>")?;
//!     let device = client.devices().get(
//!         DeviceIdentity::builder()
//!             .phone_number("+12065550100".parse()?)
//!             .build()?,
//!     );
//!     let session = device
//!         .create_qod_session(
//!             &SessionParams::new(QosProfile::new("QOS_L")?)
//!                 .service_ipv4("5.6.7.8".parse().unwrap())
//!                 .duration(3600),
//!         )
//!         .await?;
//!     println!("session {} is {}", session.id(), session.status());
//!     session.delete().await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    AuthEndpoints, Authorization, ClientCredentials, CongestionSubscription, Connectivity,
    ConnectivitySubscription, Device, Devices, Geofencing, GeofencingSubscription, Insights,
    NacError, NetworkAsCodeClient, NetworkAsCodeClientBuilder, Session, Sessions, Slice, Slices,
};
pub use domain::{
    AreaOfService, Congestion, CongestionLevel, CongestionSubscriptionParams,
    ConnectivityEventType, ConnectivityStatus, ConnectivitySubscriptionParams, DeviceIdentity,
    DeviceIdentityBuilder, DeviceIpv4Addr, GeofenceCircle, GeofencingEventType,
    GeofencingSubscriptionParams, NetworkAccessIdentifier, NetworkIdentifier,
    NotificationChannel, PhoneNumber, Point, PortRange, PortsSpec, QosProfile, RoamingStatus,
    ServiceType, SessionParams, SinkCredential, SliceInfo, SliceParams, SliceState, Throughput,
    ValidationError,
};
