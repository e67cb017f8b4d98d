use chrono::{DateTime, Utc};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::{DeviceIdentity, PortsSpec, QosProfile, SessionParams, ValidationError};
use crate::transport::{
    SessionData, decode_session, decode_sessions, encode_create_session, encode_extend_session,
};

const QOD_BASE: &str = "qod/v0";

/// Client for quality-on-demand sessions.
#[derive(Debug, Clone)]
pub struct Sessions {
    connector: ApiConnector,
}

impl Sessions {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// Create a QoD session for the given device.
    ///
    /// The parameters must name at least one application-server address;
    /// otherwise this fails locally without touching the network.
    pub async fn create(
        &self,
        device: &DeviceIdentity,
        params: &SessionParams,
    ) -> Result<Session, NacError> {
        params.ensure_service_address()?;
        let body = encode_create_session(device, params);
        let response = self.connector.post(&format!("{QOD_BASE}/sessions"), body).await?;
        let data = decode_session(&response)?;
        Ok(Session::bind(self.clone(), data))
    }

    /// Fetch a single session by its server-assigned id.
    pub async fn get(&self, id: &str) -> Result<Session, NacError> {
        let response = self.connector.get(&format!("{QOD_BASE}/sessions/{id}")).await?;
        let data = decode_session(&response)?;
        Ok(Session::bind(self.clone(), data))
    }

    /// List every session visible to the caller.
    pub async fn get_all(&self) -> Result<Vec<Session>, NacError> {
        let response = self.connector.get(&format!("{QOD_BASE}/sessions")).await?;
        let sessions = decode_sessions(&response)?;
        Ok(sessions
            .into_iter()
            .map(|data| Session::bind(self.clone(), data))
            .collect())
    }

    /// Delete a session by id. Deletion is terminal: a later `get` for the
    /// same id reports not-found.
    pub async fn delete(&self, id: &str) -> Result<(), NacError> {
        self.connector
            .delete(&format!("{QOD_BASE}/sessions/{id}"))
            .await
    }

    pub(crate) async fn extend(
        &self,
        id: &str,
        additional_duration: u64,
    ) -> Result<SessionData, NacError> {
        if additional_duration == 0 {
            return Err(ValidationError::InvalidDuration { actual: 0 }.into());
        }
        let body = encode_extend_session(additional_duration);
        let response = self
            .connector
            .post(&format!("{QOD_BASE}/sessions/{id}/extend"), body)
            .await?;
        Ok(decode_session(&response)?)
    }
}

/// A live QoD session bound to the client that produced it.
///
/// Two sessions are equal when their server-assigned ids match, whatever
/// the rest of their cached state says.
#[derive(Clone)]
pub struct Session {
    api: Sessions,
    data: SessionData,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.data.id)
            .field("status", &self.data.status)
            .field("profile", &self.data.profile)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.data.id == other.data.id
    }
}

impl Session {
    pub(crate) fn bind(api: Sessions, data: SessionData) -> Self {
        Self { api, data }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn status(&self) -> &str {
        &self.data.status
    }

    pub fn profile(&self) -> &QosProfile {
        &self.data.profile
    }

    /// The device the server echoed back, when it did.
    pub fn device(&self) -> Option<&DeviceIdentity> {
        self.data.device.as_ref()
    }

    pub fn service_ipv4(&self) -> Option<Ipv4Addr> {
        self.data.service_ipv4
    }

    pub fn service_ipv6(&self) -> Option<Ipv6Addr> {
        self.data.service_ipv6
    }

    pub fn device_ports(&self) -> Option<&PortsSpec> {
        self.data.device_ports.as_ref()
    }

    pub fn service_ports(&self) -> Option<&PortsSpec> {
        self.data.service_ports.as_ref()
    }

    pub fn duration(&self) -> Option<u64> {
        self.data.duration
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.data.started_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.data.expires_at
    }

    /// Re-fetch this session and replace the cached state.
    pub async fn refresh(&mut self) -> Result<(), NacError> {
        let updated = self.api.get(&self.data.id).await?;
        self.data = updated.data;
        Ok(())
    }

    /// Request additional duration, in seconds, on top of the current one.
    /// Zero is rejected locally.
    pub async fn extend(&mut self, additional_duration: u64) -> Result<(), NacError> {
        self.data = self.api.extend(&self.data.id, additional_duration).await?;
        Ok(())
    }

    /// Delete this session server-side.
    pub async fn delete(&self) -> Result<(), NacError> {
        self.api.delete(&self.data.id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{FakeTransport, connector};
    use super::*;

    fn sessions(transport: FakeTransport) -> Sessions {
        Sessions::new(connector(transport))
    }

    fn device() -> DeviceIdentity {
        DeviceIdentity::builder()
            .phone_number("+12065550100".parse().unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn create_sends_the_expected_body_and_binds_the_response() {
        let transport = FakeTransport::new();
        transport.push_response(
            201,
            r#"{
                "id": "session-1",
                "qosProfile": "QOS_L",
                "qosStatus": "REQUESTED",
                "duration": 3600
            }"#,
        );
        let api = sessions(transport.clone());

        let params = SessionParams::new(QosProfile::new("QOS_L").unwrap())
            .service_ipv4("5.6.7.8".parse().unwrap())
            .duration(3600);
        let session = api.create(&device(), &params).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.url, "https://gateway.test/qod/v0/sessions");
        assert_eq!(
            request.body.unwrap(),
            json!({
                "qosProfile": "QOS_L",
                "device": {"phoneNumber": "+12065550100"},
                "applicationServer": {"ipv4Address": "5.6.7.8"},
                "duration": 3600
            })
        );
        assert_eq!(session.id(), "session-1");
        assert_eq!(session.status(), "REQUESTED");
        assert_eq!(session.duration(), Some(3600));
    }

    #[tokio::test]
    async fn create_without_a_service_address_fails_before_any_request() {
        let transport = FakeTransport::new();
        let api = sessions(transport.clone());

        let params = SessionParams::new(QosProfile::new("QOS_L").unwrap());
        let err = api.create(&device(), &params).await.unwrap_err();

        assert!(matches!(err, NacError::InvalidParameter { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn deletion_is_terminal() {
        let transport = FakeTransport::new();
        transport.push_response(200, "");
        transport.push_response(404, "");
        let api = sessions(transport.clone());

        api.delete("session-1").await.unwrap();
        let err = api.get("session-1").await.unwrap_err();

        assert!(matches!(err, NacError::NotFound { .. }));
        let recorded = transport.requests();
        assert_eq!(recorded.len(), 2);
        assert_eq!(
            recorded[0].url,
            "https://gateway.test/qod/v0/sessions/session-1"
        );
        assert_eq!(recorded[0].method, reqwest::Method::DELETE);
        assert_eq!(recorded[1].method, reqwest::Method::GET);
    }

    #[tokio::test]
    async fn extend_posts_to_the_extend_endpoint_and_updates_the_cache() {
        let transport = FakeTransport::new();
        transport.push_response(
            200,
            r#"{"id": "session-1", "qosProfile": "QOS_L", "qosStatus": "AVAILABLE", "duration": 5400}"#,
        );
        let api = sessions(transport.clone());
        let mut session = Session::bind(
            api,
            SessionData {
                id: "session-1".to_owned(),
                profile: QosProfile::new("QOS_L").unwrap(),
                status: "AVAILABLE".to_owned(),
                device: None,
                service_ipv4: None,
                service_ipv6: None,
                device_ports: None,
                service_ports: None,
                duration: Some(3600),
                started_at: None,
                expires_at: None,
            },
        );

        session.extend(1800).await.unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.url,
            "https://gateway.test/qod/v0/sessions/session-1/extend"
        );
        assert_eq!(
            request.body.unwrap(),
            json!({"requestedAdditionalDuration": 1800})
        );
        assert_eq!(session.duration(), Some(5400));
    }

    #[tokio::test]
    async fn zero_extension_is_rejected_locally() {
        let transport = FakeTransport::new();
        let api = sessions(transport.clone());

        let err = api.extend("session-1", 0).await.unwrap_err();
        assert!(matches!(err, NacError::InvalidParameter { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn sessions_compare_by_id() {
        let api = sessions(FakeTransport::new());
        let data = SessionData {
            id: "session-1".to_owned(),
            profile: QosProfile::new("QOS_L").unwrap(),
            status: "REQUESTED".to_owned(),
            device: None,
            service_ipv4: None,
            service_ipv6: None,
            device_ports: None,
            service_ports: None,
            duration: None,
            started_at: None,
            expires_at: None,
        };
        let mut other = data.clone();
        other.status = "AVAILABLE".to_owned();

        let a = Session::bind(api.clone(), data);
        let b = Session::bind(api, other);
        assert_eq!(a, b);
    }
}
