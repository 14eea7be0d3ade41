//! Per-request authentication seam.
//!
//! The report API expects a credential header on every call. Producing its
//! value (nonce, digest, credential storage) is owned by the caller; the
//! client only asks an [`AuthProvider`] for a fresh [`HttpAuth`] each time it
//! builds a request.

use crate::http_client::HttpAuth;

/// Header name the report API conventionally authenticates with.
pub const WSSE_HEADER: &str = "X-WSSE";

/// Source of the authentication attached to each outgoing request.
pub trait AuthProvider: Send + Sync {
    fn auth(&self) -> HttpAuth;
}

/// A fixed credential is its own provider.
impl AuthProvider for HttpAuth {
    fn auth(&self) -> HttpAuth {
        self.clone()
    }
}

/// Adapts a closure into an [`AuthProvider`], for credentials that change per
/// request.
pub struct FnAuthProvider<F>(F);

impl<F> FnAuthProvider<F>
where
    F: Fn() -> HttpAuth + Send + Sync,
{
    pub fn new(produce: F) -> Self {
        Self(produce)
    }
}

impl<F> AuthProvider for FnAuthProvider<F>
where
    F: Fn() -> HttpAuth + Send + Sync,
{
    fn auth(&self) -> HttpAuth {
        (self.0)()
    }
}
