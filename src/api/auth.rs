// Bearer token authentication for the `Web` policy.
//
// Tokens come from the `[[auth.tokens]]` config section. A request passes the
// policy when it presents a known token carrying the `web` scope.

use super::error::ApiError;
use super::AppState;
use crate::config::ApiToken;
use crate::flags::RequestContext;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::collections::HashMap;

pub const WEB_SCOPE: &str = "web";
pub const CLIENT_VERSION_HEADER: &str = "client-version";

#[derive(Debug, Default)]
pub struct TokenAuthenticator {
    tokens: HashMap<String, ApiToken>,
}

impl TokenAuthenticator {
    pub fn new(tokens: Vec<ApiToken>) -> Self {
        TokenAuthenticator {
            tokens: tokens.into_iter().map(|t| (t.token.clone(), t)).collect(),
        }
    }

    pub fn resolve(&self, token: &str) -> Option<&ApiToken> {
        self.tokens.get(token)
    }

    /// Apply the `Web` policy to the request headers
    pub fn authorize_web(&self, headers: &HeaderMap) -> Result<&ApiToken, ApiError> {
        let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
        let api_token = self.resolve(token).ok_or(ApiError::Unauthorized)?;

        if !api_token.scopes.iter().any(|s| s == WEB_SCOPE) {
            tracing::debug!(subject = %api_token.subject, "token lacks web scope");
            return Err(ApiError::Forbidden);
        }

        Ok(api_token)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn client_version(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CLIENT_VERSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

// ============================================================================
// EXTRACTORS
// ============================================================================

/// Caller that passed the `Web` policy
#[derive(Debug, Clone)]
pub struct WebUser(pub RequestContext);

/// Caller context for public endpoints; anonymous unless a known token is sent
#[derive(Debug, Clone)]
pub struct MaybeUser(pub RequestContext);

#[async_trait]
impl FromRequestParts<AppState> for WebUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = state.auth.authorize_web(&parts.headers)?;

        Ok(WebUser(RequestContext {
            user_id: Some(token.subject.clone()),
            client_version: client_version(&parts.headers),
        }))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = bearer_token(&parts.headers)
            .and_then(|token| state.auth.resolve(token))
            .map(|t| t.subject.clone());

        Ok(MaybeUser(RequestContext {
            user_id,
            client_version: client_version(&parts.headers),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn authenticator() -> TokenAuthenticator {
        TokenAuthenticator::new(vec![
            ApiToken {
                token: "web-token".to_string(),
                subject: "user-1".to_string(),
                scopes: vec![WEB_SCOPE.to_string()],
            },
            ApiToken {
                token: "api-token".to_string(),
                subject: "service-1".to_string(),
                scopes: vec!["api".to_string()],
            },
        ])
    }

    fn headers(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_bearer_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_web_policy() {
        let auth = authenticator();

        let ok = auth.authorize_web(&headers("Bearer web-token")).unwrap();
        assert_eq!(ok.subject, "user-1");

        assert!(matches!(
            auth.authorize_web(&HeaderMap::new()),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            auth.authorize_web(&headers("Bearer unknown")),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            auth.authorize_web(&headers("Bearer api-token")),
            Err(ApiError::Forbidden)
        ));
    }
}
