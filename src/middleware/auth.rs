//! HTTP Basic Auth with forced HTTPS upgrade.
//!
//! # Responsibilities
//! - Redirect plaintext connections to their HTTPS equivalent before any
//!   credential is read
//! - Challenge (`401` + `WWW-Authenticate`), reject malformed schemes
//!   (`400`), verify credentials against a caller-supplied checker
//! - Attach the verified identity to the request and delegate
//!
//! # Design Decisions
//! - The checker decides what a "user" is; it returns the identity string
//!   to attach, or `None` to reject
//! - Credentials split on the first colon, so passwords may contain colons

use async_trait::async_trait;
use axum::http::header::{CONTENT_LENGTH, LOCATION, WWW_AUTHENTICATE};
use axum::http::StatusCode;

use crate::error::Result;
use crate::http::{Request, Response};
use crate::pipeline::{Flow, Handler};

type Checker = dyn Fn(&Request, &str, &str) -> Option<String> + Send + Sync;

/// Gate that verifies `Authorization: Basic` credentials, upgrading
/// plaintext requests to HTTPS first.
pub struct BasicAuth {
    checker: Box<Checker>,
    realm: String,
}

impl BasicAuth {
    pub fn new(
        checker: impl Fn(&Request, &str, &str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            checker: Box::new(checker),
            realm: "Authorization Required".to_string(),
        }
    }

    pub fn realm(mut self, realm: &str) -> Self {
        self.realm = realm.to_string();
        self
    }

    fn unauthorized(&self) -> Response {
        Response::new(StatusCode::UNAUTHORIZED)
            .header(
                WWW_AUTHENTICATE,
                format!("Basic realm=\"{}\"", self.realm),
            )
            .header(CONTENT_LENGTH, "12")
            .body("Unauthorized")
    }

    fn bad_request(&self) -> Response {
        Response::new(StatusCode::BAD_REQUEST)
            .header(CONTENT_LENGTH, "11")
            .body("Bad Request")
    }
}

#[async_trait]
impl Handler for BasicAuth {
    async fn handle(&self, mut req: Request) -> Result<Flow> {
        if !req.secure() {
            let host = https_host(req.header("host").unwrap_or_default());
            let location = format!("https://{}{}", host, req.real_url());
            return Ok(Flow::Handled(
                Response::new(StatusCode::MOVED_PERMANENTLY)
                    .header(LOCATION, location)
                    .header(CONTENT_LENGTH, "0"),
            ));
        }

        let Some(authorization) = req.header("authorization") else {
            return Ok(Flow::Handled(self.unauthorized()));
        };
        let Some((scheme, encoded)) = authorization.split_once(' ') else {
            return Ok(Flow::Handled(self.bad_request()));
        };
        if scheme != "Basic" {
            return Ok(Flow::Handled(self.bad_request()));
        }

        let Some(credentials) = decode_base64(encoded.trim()) else {
            return Ok(Flow::Handled(self.unauthorized()));
        };
        let credentials = String::from_utf8_lossy(&credentials).into_owned();
        let (user, pass) = credentials
            .split_once(':')
            .unwrap_or((credentials.as_str(), ""));

        match (self.checker)(&req, user, pass) {
            Some(identity) => {
                req.set_remote_user(identity);
                Ok(Flow::Pass(req))
            }
            None => Ok(Flow::Handled(self.unauthorized())),
        }
    }
}

/// Map a `Host` header to its HTTPS equivalent: port 80 (or none) drops
/// the port, anything else lands on the nearest `...443` analogue
/// (8080 → 8443).
fn https_host(host: &str) -> String {
    match host.split_once(':') {
        Some((name, port)) => match port.parse::<u32>() {
            Ok(80) | Err(_) => name.to_string(),
            Ok(p) => format!("{}:{}", name, p - (p % 1000) + 443),
        },
        None => host.to_string(),
    }
}

/// Standard-alphabet base64 decoding, padding optional. Whitespace and
/// other foreign characters reject the whole input.
fn decode_base64(input: &str) -> Option<Vec<u8>> {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let trimmed = input.trim_end_matches('=');
    let mut out = Vec::with_capacity(trimmed.len() * 3 / 4);
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for &byte in trimmed.as_bytes() {
        let value = CHARSET.iter().position(|&c| c == byte)? as u32;
        acc = (acc << 6) | value;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    Some(out)
}
