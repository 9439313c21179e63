//! services/api/src/web/cookies.rs
//!
//! Session cookie construction and parsing. Tokens travel only as `httpOnly`
//! cookies; the attribute set is driven by the deployment flags so that a
//! clear uses exactly the attributes of the original set (browsers will not
//! clear a cookie otherwise).

use crate::config::Config;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// The cookie attributes selected by the deployment environment.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    secure: bool,
    cross_site: bool,
}

impl CookiePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            secure: config.cookie_secure,
            cross_site: config.cross_site_cookies,
        }
    }

    #[cfg(test)]
    pub fn new(secure: bool, cross_site: bool) -> Self {
        Self { secure, cross_site }
    }

    fn attributes(&self) -> String {
        // Cross-site cookies require `Secure; SameSite=None`; same-site
        // deployments relax to Lax.
        if self.cross_site {
            "HttpOnly; Secure; SameSite=None; Path=/".to_string()
        } else if self.secure {
            "HttpOnly; Secure; SameSite=Lax; Path=/".to_string()
        } else {
            "HttpOnly; SameSite=Lax; Path=/".to_string()
        }
    }
}

/// Builds a `Set-Cookie` value carrying a session token.
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64, policy: CookiePolicy) -> String {
    format!(
        "{}={}; {}; Max-Age={}",
        name,
        value,
        policy.attributes(),
        max_age_secs
    )
}

/// Builds a `Set-Cookie` value that clears a session cookie, using the same
/// attribute set as `session_cookie`.
pub fn clear_cookie(name: &str, policy: CookiePolicy) -> String {
    format!("{}=; {}; Max-Age=0", name, policy.attributes())
}

/// Extracts a cookie's value from a `Cookie` request header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|part| {
        let part = part.trim();
        part.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
    })
}
