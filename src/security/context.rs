use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap};

use crate::models::{Authority, UserRecord};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request-derived metadata attached to an authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticationDetails {
    pub remote_addr: Option<SocketAddr>,
    pub request_id: Option<String>,
}

impl AuthenticationDetails {
    /// Collect details from the parts of a request that the filter can see.
    ///
    /// `remote_addr` is only available when the server was started with connect info.
    pub fn from_request(headers: &HeaderMap, extensions: &Extensions) -> Self {
        let remote_addr = extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Self {
            remote_addr,
            request_id,
        }
    }
}

/// An established identity. Credentials are never kept.
#[derive(Debug, Clone)]
pub struct Authentication {
    principal: UserRecord,
    authorities: Vec<Authority>,
    details: AuthenticationDetails,
}

impl Authentication {
    pub fn new(principal: UserRecord) -> Self {
        let authorities = principal.authorities.clone();
        Self {
            principal,
            authorities,
            details: AuthenticationDetails::default(),
        }
    }

    pub fn with_details(mut self, details: AuthenticationDetails) -> Self {
        self.details = details;
        self
    }

    pub fn principal(&self) -> &UserRecord {
        &self.principal
    }

    pub fn username(&self) -> &str {
        &self.principal.username
    }

    pub fn authorities(&self) -> &[Authority] {
        &self.authorities
    }

    pub fn details(&self) -> &AuthenticationDetails {
        &self.details
    }
}

/// Holder of the current request's identity.
///
/// Empty means anonymous, which is a valid terminal state.
#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    pub fn authenticated(authentication: Authentication) -> Self {
        Self {
            authentication: Some(authentication),
        }
    }

    pub fn get_authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn set_authentication(&mut self, authentication: Authentication) {
        self.authentication = Some(authentication);
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }
}
