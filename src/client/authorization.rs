use url::Url;

use super::connector::ApiConnector;
use super::error::NacError;
use crate::domain::PhoneNumber;
use crate::transport::{decode_credentials, decode_endpoints};

pub use crate::transport::{AuthEndpoints, ClientCredentials};

const AUTH_BASE: &str = "oauth2/v1";

/// Client for the operator's OAuth provisioning endpoints.
#[derive(Debug, Clone)]
pub struct Authorization {
    connector: ApiConnector,
}

impl Authorization {
    pub(crate) fn new(connector: ApiConnector) -> Self {
        Self { connector }
    }

    /// The OAuth client credentials provisioned for this account.
    pub async fn credentials(&self) -> Result<ClientCredentials, NacError> {
        let response = self
            .connector
            .get(&format!("{AUTH_BASE}/auth/clientcredentials"))
            .await?;
        Ok(decode_credentials(&response)?)
    }

    /// The operator's OAuth authorization and token endpoints.
    pub async fn auth_endpoints(&self) -> Result<AuthEndpoints, NacError> {
        let response = self
            .connector
            .get(&format!("{AUTH_BASE}/auth/endpoints"))
            .await?;
        Ok(decode_endpoints(&response)?)
    }

    /// Build the URL the end user must visit to grant the given scope.
    ///
    /// Combines the provisioned client id with the operator's authorization
    /// endpoint; the phone number is passed as a login hint.
    pub async fn create_authentication_link(
        &self,
        redirect_uri: &Url,
        scope: &str,
        login_hint: &PhoneNumber,
    ) -> Result<Url, NacError> {
        let credentials = self.credentials().await?;
        let endpoints = self.auth_endpoints().await?;

        let mut link = endpoints.authorization_endpoint;
        link.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &credentials.client_id)
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("scope", scope)
            .append_pair("login_hint", login_hint.e164());
        Ok(link)
    }
}
