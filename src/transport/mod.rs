//! Transport layer: wire-format details (serialization/deserialization).
//!
//! Each resource family gets an `encode_*`/`decode_*` function pair working
//! on typed serde structs. Optional fields carry
//! `skip_serializing_if = "Option::is_none"`, so an unset value can never
//! leak onto the wire, not even as `null`.

mod authorization;
mod call_forwarding;
mod congestion;
mod device;
mod device_status;
mod geofencing;
mod number_verification;
mod qod;
mod sim_swap;
mod slice;

pub use authorization::{AuthEndpoints, ClientCredentials, decode_credentials, decode_endpoints};
pub use call_forwarding::{
    decode_call_forwardings, decode_unconditional_forwarding, encode_call_forwarding_query,
};
pub use congestion::{
    CongestionSubscriptionData, decode_congestion_readings, decode_congestion_subscription,
    decode_congestion_subscriptions, encode_congestion_query, encode_congestion_subscription,
};
pub use device_status::{
    ConnectivitySubscriptionData, decode_connectivity_status, decode_connectivity_subscription,
    decode_connectivity_subscriptions, decode_roaming_status, encode_connectivity_subscription,
    encode_status_query,
};
pub use geofencing::{
    GeofencingSubscriptionData, decode_geofencing_subscription, decode_geofencing_subscriptions,
    encode_geofencing_subscription,
};
pub use number_verification::{
    decode_device_phone_number, decode_verification, encode_verification,
};
pub use qod::{
    SessionData, decode_session, decode_sessions, encode_create_session, encode_extend_session,
};
pub use sim_swap::{
    decode_sim_swap_check, decode_sim_swap_date, encode_sim_swap_check, encode_sim_swap_date,
};
pub use slice::{SliceData, decode_slice, decode_slices, encode_attachment, encode_create_slice};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {field} in response: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("session expiry {expires_at} precedes start {started_at}")]
    ExpiryBeforeStart {
        started_at: chrono::DateTime<chrono::Utc>,
        expires_at: chrono::DateTime<chrono::Utc>,
    },
}
