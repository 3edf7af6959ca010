use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, warn};

use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo::User;

/// Identity resolved from the Basic Authorization header. Every
/// rejection surfaces as 401 "Access Denied"; the specific reason only
/// goes to the log.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(credentials) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_basic)
        else {
            debug!("Auth header not found");
            return Err(AppError::AccessDenied);
        };
        let (email, password) = credentials;

        let user = match User::find_by_email(&state.db, &email).await? {
            Some(u) => u,
            None => {
                warn!("User not found for username: {}", email);
                return Err(AppError::AccessDenied);
            }
        };

        if !verify_password(&password, &user.password_hash) {
            warn!("Authentication failure for username: {}", user.first_name);
            return Err(AppError::AccessDenied);
        }

        Ok(AuthUser(user))
    }
}

/// Splits a `Basic <base64(email:password)>` header value. The secret may
/// itself contain colons; only the first one separates the identifier.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        format!("Basic {}", BASE64.encode(raw))
    }

    #[test]
    fn parses_email_and_password() {
        let parsed = parse_basic(&encode("jo@example.com:password1"));
        assert_eq!(
            parsed,
            Some(("jo@example.com".to_string(), "password1".to_string()))
        );
    }

    #[test]
    fn password_may_contain_colons() {
        let parsed = parse_basic(&encode("jo@example.com:pa:ss:1"));
        assert_eq!(
            parsed,
            Some(("jo@example.com".to_string(), "pa:ss:1".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(parse_basic("Bearer abc.def.ghi"), None);
        assert_eq!(parse_basic("basic am9AZXhhbXBsZS5jb206cA=="), None);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(parse_basic("Basic !!!not-base64!!!"), None);
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(parse_basic(&encode("no-colon-here")), None);
    }

    #[test]
    fn rejects_non_utf8_credentials() {
        let header = format!("Basic {}", BASE64.encode([0xff, 0xfe, b':', b'x']));
        assert_eq!(parse_basic(&header), None);
    }
}
