use serde::Deserialize;
use url::Url;

use super::TransportError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsResponse {
    client_id: String,
    client_secret: String,
}

/// OAuth client credentials provisioned for the caller's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Decode the provisioned OAuth client credentials.
pub fn decode_credentials(json: &str) -> Result<ClientCredentials, TransportError> {
    let parsed: CredentialsResponse = serde_json::from_str(json)?;
    Ok(ClientCredentials {
        client_id: parsed.client_id,
        client_secret: parsed.client_secret,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointsResponse {
    authorization_endpoint: String,
    token_endpoint: String,
}

/// The operator's OAuth endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub authorization_endpoint: Url,
    pub token_endpoint: Url,
}

/// Decode the operator's OAuth endpoints, validating both URLs.
pub fn decode_endpoints(json: &str) -> Result<AuthEndpoints, TransportError> {
    let parsed: EndpointsResponse = serde_json::from_str(json)?;
    let authorization_endpoint =
        Url::parse(&parsed.authorization_endpoint).map_err(|_| TransportError::InvalidField {
            field: "authorizationEndpoint",
            value: parsed.authorization_endpoint.clone(),
        })?;
    let token_endpoint =
        Url::parse(&parsed.token_endpoint).map_err(|_| TransportError::InvalidField {
            field: "tokenEndpoint",
            value: parsed.token_endpoint.clone(),
        })?;
    Ok(AuthEndpoints {
        authorization_endpoint,
        token_endpoint,
    })
}
