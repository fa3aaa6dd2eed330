//! sslctx - server TLS context setup
//!
//! This crate configures OpenSSL server contexts for a network service:
//! protocol selection, certificate chain and private key loading, and the
//! protocol-name and last-error lookups used in startup diagnostics.

pub mod tls;
