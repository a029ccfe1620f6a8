//! Session tokens issued by the auth service.
//!
//! Access tokens are HS256 JWTs whose `sub` is the user id. Expired tokens
//! can be exchanged for a fresh pair at the auth service using the refresh
//! token.

use folio_common::{AppError, AppResult, config::AuthConfig};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Access token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The signed-in user as far as the token says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

/// Outcome of verifying an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid(Claims),
    Expired,
    Invalid,
}

/// Verifies access tokens.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding: DecodingKey,
    encoding: EncodingKey,
    audience: String,
}

impl SessionVerifier {
    /// Create a verifier for the given secret and audience.
    #[must_use]
    pub fn new(secret: &str, audience: impl Into<String>) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            audience: audience.into(),
        }
    }

    /// Create a verifier from configuration.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.audience.clone())
    }

    /// Expected audience.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify a token.
    #[must_use]
    pub fn verify(&self, token: &str) -> TokenStatus {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => TokenStatus::Valid(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => TokenStatus::Expired,
            Err(e) => {
                debug!(error = %e, "Rejected access token");
                TokenStatus::Invalid
            }
        }
    }

    /// Sign claims with the shared secret.
    ///
    /// The auth service normally issues tokens; this exists for local
    /// tooling and tests.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Claims for `user_id` valid for `ttl_secs` with this verifier's audience.
    #[must_use]
    pub fn claims_for(&self, user_id: &str, ttl_secs: i64) -> Claims {
        Claims {
            sub: user_id.to_string(),
            exp: chrono::Utc::now().timestamp() + ttl_secs,
            aud: Some(self.audience.clone()),
            email: None,
            role: Some("authenticated".to_string()),
        }
    }
}

/// Token pair returned by a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshedSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Client for the auth service's token endpoint.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    token_url: url::Url,
    anon_key: Option<String>,
}

impl AuthClient {
    /// Create a client for the auth service at `base_url`.
    pub fn new(base_url: &str, anon_key: Option<String>) -> AppResult<Self> {
        let mut token_url = url::Url::parse(base_url)
            .and_then(|base| base.join("/auth/v1/token"))
            .map_err(|e| AppError::Config(format!("Invalid auth url: {e}")))?;
        token_url
            .query_pairs_mut()
            .append_pair("grant_type", "refresh_token");

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            http,
            token_url,
            anon_key,
        })
    }

    /// Create a client when the auth service URL is configured.
    pub fn from_config(config: &AuthConfig) -> AppResult<Option<Self>> {
        config
            .url
            .as_deref()
            .map(|url| Self::new(url, config.anon_key.clone()))
            .transpose()
    }

    /// Endpoint used for refreshes.
    #[must_use]
    pub fn token_url(&self) -> &str {
        self.token_url.as_str()
    }

    /// Exchange a refresh token for a new session.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshedSession> {
        let mut request = self
            .http
            .post(self.token_url.clone())
            .json(&serde_json::json!({ "refresh_token": refresh_token }));
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Auth refresh failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Auth refresh rejected with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid refresh response: {e}")))
    }
}

/// Result of resolving a request's session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSession {
    pub user: Option<SessionUser>,
    /// Set when the session was refreshed and cookies must be rewritten.
    pub refreshed: Option<RefreshedSession>,
}

/// Resolves the current user from request tokens.
#[derive(Clone)]
pub struct SessionService {
    verifier: SessionVerifier,
    auth_client: Option<AuthClient>,
}

impl SessionService {
    /// Create a session service. Refresh is disabled without a client.
    #[must_use]
    pub const fn new(verifier: SessionVerifier, auth_client: Option<AuthClient>) -> Self {
        Self {
            verifier,
            auth_client,
        }
    }

    /// Token verifier.
    #[must_use]
    pub const fn verifier(&self) -> &SessionVerifier {
        &self.verifier
    }

    /// Resolve a user from an access token only.
    #[must_use]
    pub fn authenticate(&self, access_token: &str) -> Option<SessionUser> {
        match self.verifier.verify(access_token) {
            TokenStatus::Valid(claims) => Some(claims.into()),
            TokenStatus::Expired | TokenStatus::Invalid => None,
        }
    }

    /// Resolve a user, refreshing an expired session when possible.
    ///
    /// A failed refresh resolves to an anonymous session.
    pub async fn resolve(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> ResolvedSession {
        let status = access_token.map(|t| self.verifier.verify(t));
        if let Some(TokenStatus::Valid(claims)) = status {
            return ResolvedSession {
                user: Some(claims.into()),
                refreshed: None,
            };
        }

        // Only a missing or expired access token is worth refreshing
        if matches!(status, Some(TokenStatus::Invalid)) {
            return ResolvedSession::default();
        }

        let (Some(client), Some(refresh_token)) = (&self.auth_client, refresh_token) else {
            return ResolvedSession::default();
        };

        match client.refresh(refresh_token).await {
            Ok(session) => match self.verifier.verify(&session.access_token) {
                TokenStatus::Valid(claims) => ResolvedSession {
                    user: Some(claims.into()),
                    refreshed: Some(session),
                },
                _ => ResolvedSession::default(),
            },
            Err(e) => {
                debug!(error = %e, "Session refresh failed");
                ResolvedSession::default()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verifier() -> SessionVerifier {
        SessionVerifier::new("test-secret", "authenticated")
    }

    #[test]
    fn test_verify_valid_token() {
        let v = verifier();
        let token = v.sign(&v.claims_for("user-1", 3600)).unwrap();

        match v.verify(&token) {
            TokenStatus::Valid(claims) => assert_eq!(claims.sub, "user-1"),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn test_verify_expired_token() {
        let v = verifier();
        let token = v.sign(&v.claims_for("user-1", -60)).unwrap();

        assert_eq!(v.verify(&token), TokenStatus::Expired);
    }

    #[test]
    fn test_verify_rejects_wrong_secret_and_audience() {
        let v = verifier();
        let other = SessionVerifier::new("other-secret", "authenticated");
        let token = other.sign(&other.claims_for("user-1", 3600)).unwrap();
        assert_eq!(v.verify(&token), TokenStatus::Invalid);

        let wrong_aud = SessionVerifier::new("test-secret", "service");
        let token = wrong_aud.sign(&wrong_aud.claims_for("user-1", 3600)).unwrap();
        assert_eq!(v.verify(&token), TokenStatus::Invalid);

        assert_eq!(v.verify("not-a-jwt"), TokenStatus::Invalid);
    }

    #[tokio::test]
    async fn test_resolve_without_refresh_client_is_anonymous() {
        let v = verifier();
        let expired = v.sign(&v.claims_for("user-1", -60)).unwrap();
        let service = SessionService::new(v, None);

        let resolved = service.resolve(Some(&expired), Some("refresh")).await;
        assert_eq!(resolved, ResolvedSession::default());
    }

    #[tokio::test]
    async fn test_resolve_valid_token() {
        let v = verifier();
        let token = v.sign(&v.claims_for("user-1", 3600)).unwrap();
        let service = SessionService::new(v, None);

        let resolved = service.resolve(Some(&token), None).await;
        assert_eq!(resolved.user.unwrap().id, "user-1");
        assert!(resolved.refreshed.is_none());
    }

    #[test]
    fn test_auth_client_token_url() {
        let client = AuthClient::new("https://auth.example.com", None).unwrap();
        assert_eq!(
            client.token_url(),
            "https://auth.example.com/auth/v1/token?grant_type=refresh_token"
        );
        assert!(AuthClient::new("not a url", None).is_err());
    }
}
