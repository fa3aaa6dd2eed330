//! Server context construction
//!
//! [`create_context`] turns a protocol choice and a combined PEM key file into
//! a fully configured OpenSSL server context. A context is either returned
//! with the protocol selected and both certificate chain and private key
//! loaded, or not returned at all.

use std::fmt;
use std::path::{Path, PathBuf};

use openssl::error::ErrorStack;
use openssl::ssl::{
    Ssl, SslContext, SslContextBuilder, SslContextRef, SslFiletype, SslMethod, SslVersion,
};

use super::cert::CertInfo;
use super::config::{ProtocolVersion, ServerContextConfig, TlsError};
use super::errors::{error_stack_text, restore_reported_error};

/// Exit code used when the process is terminated on a broken OpenSSL setup
const FATAL_EXIT_CODE: i32 = 1;

/// Configured server-side TLS context
///
/// Exclusively owned; the native context is released when this is dropped.
pub struct TlsContext {
    ctx: SslContext,
    protocol: ProtocolVersion,
    key_file: PathBuf,
}

impl TlsContext {
    /// Create a server context configuration builder
    pub fn server() -> ServerContextConfig {
        ServerContextConfig::new()
    }

    /// Protocol the context was created for
    pub fn protocol(&self) -> ProtocolVersion {
        self.protocol
    }

    /// Key file the certificate chain and private key were loaded from
    pub fn key_file(&self) -> &Path {
        &self.key_file
    }

    /// Native context, for handing to the network layer
    pub fn context(&self) -> &SslContextRef {
        &self.ctx
    }

    /// Create a per-connection `Ssl` from this context
    pub fn new_ssl(&self) -> Result<Ssl, TlsError> {
        Ok(Ssl::new(&self.ctx)?)
    }

    /// Subject/issuer/SAN summary of the loaded leaf certificate
    pub fn certificate_info(&self) -> Option<CertInfo> {
        self.ctx.certificate().map(CertInfo::from_x509_ref)
    }

    /// Give up the wrapper and take the native context
    pub fn into_inner(self) -> SslContext {
        self.ctx
    }
}

impl fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsContext")
            .field("protocol", &self.protocol)
            .field("key_file", &self.key_file)
            .finish_non_exhaustive()
    }
}

/// Create a server TLS context
///
/// The key file must hold a PEM certificate (optionally followed by its
/// intermediates) and the unencrypted PEM private key for it.
///
/// [`init`](super::init) must have been called before. If OpenSSL cannot
/// allocate a context at all the process is terminated: continuing without
/// a working TLS context is not an option for a server.
///
/// Steps run in order and stop at the first failure:
/// protocol selection, context allocation, certificate chain, private key,
/// legacy verify-depth adjustment.
pub fn create_context<P: AsRef<Path>>(
    protocol: ProtocolVersion,
    key_file: P,
) -> Result<TlsContext, TlsError> {
    let key_file = key_file.as_ref();

    let version = protocol.server_version().map_err(|e| {
        tracing::error!(protocol = %protocol, "unknown SSL protocol method");
        e
    })?;

    let mut builder = match SslContextBuilder::new(SslMethod::tls_server()) {
        Ok(builder) => builder,
        Err(stack) => fatal_context_failure(&stack),
    };
    pin_protocol(&mut builder, protocol, version)?;

    // The openssl crate panics on paths it cannot hand to C
    let path = match key_file.to_str() {
        Some(path) if !path.contains('\0') => path,
        _ => {
            let reason = "path is not a valid C string".to_string();
            tracing::error!(path = %key_file.display(), %reason, "cannot read certificate");
            return Err(TlsError::CertificateLoad {
                path: key_file.to_path_buf(),
                reason,
            });
        }
    };

    if let Err(stack) = builder.set_certificate_chain_file(path) {
        let reason = error_stack_text(&stack);
        tracing::error!(path = %key_file.display(), %reason, "cannot read certificate");
        restore_reported_error(&stack);
        return Err(TlsError::CertificateLoad {
            path: key_file.to_path_buf(),
            reason,
        });
    }

    if let Err(stack) = builder.set_private_key_file(path, SslFiletype::PEM) {
        let reason = error_stack_text(&stack);
        tracing::error!(path = %key_file.display(), %reason, "cannot read key");
        restore_reported_error(&stack);
        return Err(TlsError::PrivateKeyLoad {
            path: key_file.to_path_buf(),
            reason,
        });
    }

    adjust_legacy_verify_depth(&mut builder);

    let ctx = TlsContext {
        ctx: builder.build(),
        protocol,
        key_file: key_file.to_path_buf(),
    };

    let subject = ctx
        .certificate_info()
        .map(|cert| cert.subject)
        .unwrap_or_else(|| "<undef>".to_string());
    tracing::debug!(protocol = %protocol, path = %key_file.display(), %subject, "created SSL context");

    Ok(ctx)
}

/// Bound the context to `version` on both ends, `None` leaves it flexible
fn pin_protocol(
    builder: &mut SslContextBuilder,
    protocol: ProtocolVersion,
    version: Option<SslVersion>,
) -> Result<(), TlsError> {
    let result = builder
        .set_min_proto_version(version)
        .and_then(|()| builder.set_max_proto_version(version));

    if let Err(stack) = result {
        let reason = error_stack_text(&stack);
        tracing::error!(protocol = %protocol, %reason, "cannot select SSL protocol method");
        restore_reported_error(&stack);
        return Err(TlsError::UnsupportedProtocol(protocol));
    }
    Ok(())
}

/// OpenSSL before 0.9.5-beta-1 used a broken default verify depth
#[cfg(sslctx_legacy_verify_depth)]
fn adjust_legacy_verify_depth(builder: &mut SslContextBuilder) {
    builder.set_verify_depth(1);
}

#[cfg(not(sslctx_legacy_verify_depth))]
fn adjust_legacy_verify_depth(_builder: &mut SslContextBuilder) {}

fn fatal_context_failure(stack: &ErrorStack) -> ! {
    // mostly due to the OpenSSL library not having been initialized
    tracing::error!(fatal = true, reason = %error_stack_text(stack), "unable to create SSL context");
    restore_reported_error(stack);
    std::process::exit(FATAL_EXIT_CODE)
}
