//! Server-side TLS context setup
//!
//! Builds OpenSSL server contexts from a protocol choice and a single PEM
//! key file holding the certificate chain followed by the private key.
//! Handshakes and record I/O belong to the network layer that consumes the
//! context.
//!
//! # Startup
//!
//! Call [`init`] once before the first [`create_context`]. A context that
//! cannot even be allocated terminates the process.
//!
//! ```no_run
//! use sslctx::tls::{self, ProtocolVersion};
//!
//! tls::init();
//! match tls::create_context(ProtocolVersion::Tls12, "/etc/server.pem") {
//!     Ok(ctx) => println!("using SSL protocol {}", ctx.protocol()),
//!     Err(e) => eprintln!("{}: {}", e, tls::last_crypto_error()),
//! }
//! ```
//!
//! # Protocol availability
//!
//! SSLv2 is never available. SSLv3, TLSv1 and TLSv1.2 depend on what the
//! linked OpenSSL was built with; see [`ProtocolVersion::is_available`].

pub mod cert;
pub mod config;
pub mod context;
pub mod errors;

pub use cert::CertInfo;
pub use config::{protocol_name, ProtocolVersion, ServerContextConfig, TlsError};
pub use context::{create_context, TlsContext};
pub use errors::{last_crypto_error, MAX_ERROR_TEXT_LEN};

/// Result type for TLS context operations
pub type Result<T> = std::result::Result<T, TlsError>;

/// Initialize OpenSSL's process-wide state
///
/// Safe to call more than once and from several threads.
pub fn init() {
    openssl::init();
}
