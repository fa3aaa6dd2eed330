//! Protocol selection, errors and the server context builder

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use openssl::ssl::SslVersion;

use super::context::{create_context, TlsContext};

/// SSL/TLS protocol a server context negotiates
///
/// The numeric discriminants are the values accepted by the `ssl.protocol`
/// server option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Unrecognised value; never served
    Unknown = 0,
    /// SSL 2.0
    Ssl2 = 1,
    /// Version-flexible negotiation (highest version both peers support)
    Ssl23 = 2,
    /// SSL 3.0
    Ssl3 = 3,
    /// TLS 1.0 only
    Tls1 = 4,
    /// TLS 1.2 only
    #[default]
    Tls12 = 5,
}

impl ProtocolVersion {
    /// All recognised protocols, in option-value order
    pub const ALL: [ProtocolVersion; 5] = [
        ProtocolVersion::Ssl2,
        ProtocolVersion::Ssl23,
        ProtocolVersion::Ssl3,
        ProtocolVersion::Tls1,
        ProtocolVersion::Tls12,
    ];

    /// Canonical label, see [`protocol_name`]
    pub fn name(self) -> &'static str {
        protocol_name(self)
    }

    /// Whether the linked OpenSSL can configure a server context for this protocol
    ///
    /// Says nothing about whether a handshake will succeed; cipher and
    /// security-level policy of the library still apply.
    pub fn is_available(self) -> bool {
        self.server_version().is_ok()
    }

    /// Protocols the linked OpenSSL can configure a server context for
    pub fn available() -> Vec<ProtocolVersion> {
        Self::ALL.iter().copied().filter(|p| p.is_available()).collect()
    }

    /// Version the server context is pinned to
    ///
    /// `Ok(None)` leaves both bounds open (version-flexible). SSLv2 has no
    /// server method in any OpenSSL the `openssl` crate links against, so it
    /// is always rejected.
    pub(crate) fn server_version(self) -> Result<Option<SslVersion>, TlsError> {
        match self {
            ProtocolVersion::Ssl23 => Ok(None),
            #[cfg(not(sslctx_no_ssl3))]
            ProtocolVersion::Ssl3 => Ok(Some(SslVersion::SSL3)),
            #[cfg(not(sslctx_no_tls1))]
            ProtocolVersion::Tls1 => Ok(Some(SslVersion::TLS1)),
            #[cfg(not(sslctx_no_tls1_2))]
            ProtocolVersion::Tls12 => Ok(Some(SslVersion::TLS1_2)),
            _ => Err(TlsError::UnsupportedProtocol(self)),
        }
    }
}

impl From<u32> for ProtocolVersion {
    fn from(value: u32) -> Self {
        match value {
            1 => ProtocolVersion::Ssl2,
            2 => ProtocolVersion::Ssl23,
            3 => ProtocolVersion::Ssl3,
            4 => ProtocolVersion::Tls1,
            5 => ProtocolVersion::Tls12,
            _ => ProtocolVersion::Unknown,
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = TlsError;

    /// Parse a configured protocol (case-insensitive label or option value)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let protocol = match s.trim().to_uppercase().as_str() {
            "SSLV2" | "SSL2" | "1" => ProtocolVersion::Ssl2,
            "SSLV23" | "SSL23" | "2" => ProtocolVersion::Ssl23,
            "SSLV3" | "SSL3" | "3" => ProtocolVersion::Ssl3,
            "TLSV1" | "TLS1" | "TLSV1.0" | "TLS1.0" | "4" => ProtocolVersion::Tls1,
            "TLSV12" | "TLS12" | "TLSV1.2" | "TLS1.2" | "5" => ProtocolVersion::Tls12,
            _ => return Err(TlsError::InvalidProtocol(s.to_string())),
        };
        Ok(protocol)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(protocol_name(*self))
    }
}

/// Human-readable label of a protocol, for diagnostics only
///
/// Anything that is not a recognised protocol maps to `"unknown"`.
pub fn protocol_name(protocol: ProtocolVersion) -> &'static str {
    match protocol {
        ProtocolVersion::Ssl2 => "SSLv2",
        ProtocolVersion::Ssl23 => "SSLv23",
        ProtocolVersion::Ssl3 => "SSLv3",
        ProtocolVersion::Tls1 => "TLSv1",
        ProtocolVersion::Tls12 => "TLSv12",
        ProtocolVersion::Unknown => "unknown",
    }
}

/// TLS context errors
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("unsupported SSL protocol method: {0}")]
    UnsupportedProtocol(ProtocolVersion),

    #[error("cannot read certificate from '{}': {reason}", path.display())]
    CertificateLoad { path: PathBuf, reason: String },

    #[error("cannot read key from '{}': {reason}", path.display())]
    PrivateKeyLoad { path: PathBuf, reason: String },

    #[error("invalid SSL protocol: {0}")]
    InvalidProtocol(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),
}

/// Server context configuration builder
///
/// ```no_run
/// use sslctx::tls::{self, ProtocolVersion, TlsContext};
///
/// tls::init();
/// let ctx = TlsContext::server()
///     .protocol(ProtocolVersion::Tls12)
///     .key_file("server.pem")
///     .build()
///     .unwrap();
/// println!("serving {}", ctx.protocol());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServerContextConfig {
    protocol: ProtocolVersion,
    key_file: Option<PathBuf>,
}

impl ServerContextConfig {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set the protocol to negotiate (default TLSv1.2)
    pub fn protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the combined certificate chain + private key PEM file
    pub fn key_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.key_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the context, see [`create_context`]
    pub fn build(self) -> Result<TlsContext, TlsError> {
        let key_file = self
            .key_file
            .ok_or_else(|| TlsError::InvalidConfig("no key file configured".to_string()))?;
        create_context(self.protocol, key_file)
    }
}
