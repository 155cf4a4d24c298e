//! Anti-forgery handshake for the login call (double-submit cookie).
//!
//! `GET /auth/csrf-cookie` sets a signed, short-lived value as a cookie the
//! frontend can read. The login call must echo the same value back in the
//! `X-CSRF-Token` header; the server checks cookie and header match, the
//! HMAC verifies, and the value is not older than the handshake TTL.
//! Nothing is stored server-side — the signature is the state.
//!
//! The proof value is `nonce.issued_at.signature` with base64url parts and
//! a unix-seconds timestamp.

use axum::http::{HeaderMap, header};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

/// Cookie carrying the handshake value. Readable by frontend JS on
/// purpose — double-submit only works if the client can echo it.
pub const CSRF_COOKIE_NAME: &str = "gala_csrf";

/// Header the login call must echo the cookie value in.
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// How long a handshake proof stays valid.
pub const HANDSHAKE_TTL_SECONDS: i64 = 2 * 60 * 60;

/// Tolerated clock skew for proofs stamped slightly in the future.
const MAX_FUTURE_SKEW_SECONDS: i64 = 60;

const NONCE_BYTES: usize = 16;

type HmacSha256 = Hmac<Sha256>;

/// Why a handshake proof was rejected. Internal only — the client always
/// sees the generic auth failure.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum HandshakeError {
    #[error("handshake cookie or header missing")]
    Missing,
    #[error("handshake cookie and header do not match")]
    Mismatch,
    #[error("handshake value is malformed")]
    Malformed,
    #[error("handshake signature is invalid")]
    BadSignature,
    #[error("handshake value has expired")]
    Expired,
}

/// Mint a fresh handshake value stamped with `now` (unix seconds).
#[must_use]
pub fn mint(secret: &SecretString, now: i64) -> String {
    let mut nonce = [0u8; NONCE_BYTES];
    rand::rng().fill_bytes(&mut nonce);

    let payload = format!("{}.{now}", URL_SAFE_NO_PAD.encode(nonce));
    let signature = URL_SAFE_NO_PAD.encode(sign(secret, &payload));
    format!("{payload}.{signature}")
}

/// Verify a handshake value against the signing secret and `now`.
///
/// # Errors
///
/// Returns the specific [`HandshakeError`] for logging; callers surface
/// all of them identically.
pub fn verify(secret: &SecretString, value: &str, now: i64) -> Result<(), HandshakeError> {
    let mut parts = value.splitn(3, '.');
    let (Some(nonce), Some(stamp), Some(signature)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(HandshakeError::Malformed);
    };

    let issued_at: i64 = stamp.parse().map_err(|_| HandshakeError::Malformed)?;

    let decoded = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| HandshakeError::Malformed)?;

    let payload = format!("{nonce}.{stamp}");
    let mut mac = mac_for(secret);
    mac.update(payload.as_bytes());
    mac.verify_slice(&decoded)
        .map_err(|_| HandshakeError::BadSignature)?;

    let age = now - issued_at;
    if age > HANDSHAKE_TTL_SECONDS || age < -MAX_FUTURE_SKEW_SECONDS {
        return Err(HandshakeError::Expired);
    }

    Ok(())
}

/// Check the double-submit proof on an incoming login request.
///
/// # Errors
///
/// Returns a [`HandshakeError`] when the cookie or header is missing, the
/// two differ, or the value itself fails [`verify`].
pub fn verify_request(
    headers: &HeaderMap,
    secret: &SecretString,
    now: i64,
) -> Result<(), HandshakeError> {
    let cookie = cookie_value(headers, CSRF_COOKIE_NAME).ok_or(HandshakeError::Missing)?;
    let echoed = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .ok_or(HandshakeError::Missing)?;

    if cookie != echoed {
        return Err(HandshakeError::Mismatch);
    }

    verify(secret, echoed, now)
}

/// `Set-Cookie` value delivering a handshake token.
#[must_use]
pub fn set_cookie_value(token: &str, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{CSRF_COOKIE_NAME}={token}; Path=/; SameSite=Lax; Max-Age={HANDSHAKE_TTL_SECONDS}{secure_flag}"
    )
}

/// Pull one cookie's value out of the request `Cookie` header(s).
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

fn mac_for(secret: &SecretString) -> HmacSha256 {
    // HMAC accepts keys of any length
    HmacSha256::new_from_slice(secret.expose_secret().as_bytes()).expect("hmac key")
}

fn sign(secret: &SecretString, payload: &str) -> Vec<u8> {
    let mut mac = mac_for(secret);
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn secret() -> SecretString {
        SecretString::from("0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn test_mint_verify_roundtrip() {
        let token = mint(&secret(), 1_700_000_000);
        assert!(verify(&secret(), &token, 1_700_000_000).is_ok());
        // still valid just inside the window
        assert!(verify(&secret(), &token, 1_700_000_000 + HANDSHAKE_TTL_SECONDS).is_ok());
    }

    #[test]
    fn test_verify_rejects_expired_proof() {
        let token = mint(&secret(), 1_700_000_000);
        let err = verify(&secret(), &token, 1_700_000_000 + HANDSHAKE_TTL_SECONDS + 1);
        assert_eq!(err, Err(HandshakeError::Expired));
    }

    #[test]
    fn test_verify_rejects_future_proof() {
        let token = mint(&secret(), 1_700_000_000 + 3600);
        assert_eq!(
            verify(&secret(), &token, 1_700_000_000),
            Err(HandshakeError::Expired)
        );
    }

    #[test]
    fn test_verify_rejects_tampered_value() {
        let token = mint(&secret(), 1_700_000_000);
        let tampered = format!("{token}x");
        assert!(matches!(
            verify(&secret(), &tampered, 1_700_000_000),
            Err(HandshakeError::BadSignature | HandshakeError::Malformed)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = mint(&secret(), 1_700_000_000);
        let other = SecretString::from("fedcba9876543210fedcba9876543210");
        assert_eq!(
            verify(&other, &token, 1_700_000_000),
            Err(HandshakeError::BadSignature)
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert_eq!(
            verify(&secret(), "definitely-not-a-token", 0),
            Err(HandshakeError::Malformed)
        );
    }

    #[test]
    fn test_verify_request_happy_path() {
        let token = mint(&secret(), 1_700_000_000);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("other=1; {CSRF_COOKIE_NAME}={token}")).unwrap(),
        );
        headers.insert(
            CSRF_HEADER_NAME,
            HeaderValue::from_str(&token).unwrap(),
        );

        assert!(verify_request(&headers, &secret(), 1_700_000_000).is_ok());
    }

    #[test]
    fn test_verify_request_mismatch() {
        let token = mint(&secret(), 1_700_000_000);
        let other = mint(&secret(), 1_700_000_000);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{CSRF_COOKIE_NAME}={token}")).unwrap(),
        );
        headers.insert(CSRF_HEADER_NAME, HeaderValue::from_str(&other).unwrap());

        assert_eq!(
            verify_request(&headers, &secret(), 1_700_000_000),
            Err(HandshakeError::Mismatch)
        );
    }

    #[test]
    fn test_verify_request_missing_parts() {
        assert_eq!(
            verify_request(&HeaderMap::new(), &secret(), 0),
            Err(HandshakeError::Missing)
        );

        // header present, cookie absent
        let token = mint(&secret(), 0);
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER_NAME, HeaderValue::from_str(&token).unwrap());
        assert_eq!(
            verify_request(&headers, &secret(), 0),
            Err(HandshakeError::Missing)
        );
    }

    #[test]
    fn test_set_cookie_flags() {
        let value = set_cookie_value("tok", false);
        assert!(value.starts_with("gala_csrf=tok; "));
        assert!(value.contains("SameSite=Lax"));
        assert!(!value.contains("Secure"));

        assert!(set_cookie_value("tok", true).ends_with("; Secure"));
    }
}
