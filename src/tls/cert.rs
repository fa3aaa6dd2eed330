//! Loaded certificate summary
//!
//! Startup diagnostics only; nothing here takes part in verification.

use std::fmt;
use std::net::IpAddr;

use openssl::nid::Nid;
use openssl::x509::{X509NameRef, X509Ref};

/// Subject, issuer and alternative names of a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertInfo {
    /// Subject Common Name
    pub subject: String,
    /// Issuer Common Name
    pub issuer: String,
    /// Subject Alternative Names (`DNS:` and `IP:` entries)
    pub subject_alt_names: Vec<String>,
}

impl CertInfo {
    pub fn from_x509_ref(cert: &X509Ref) -> Self {
        CertInfo {
            subject: common_name(cert.subject_name()),
            issuer: common_name(cert.issuer_name()),
            subject_alt_names: subject_alt_names(cert),
        }
    }

    pub fn is_self_signed(&self) -> bool {
        self.subject == self.issuer
    }
}

impl fmt::Display for CertInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject '{}', issuer '{}'", self.subject, self.issuer)?;
        if !self.subject_alt_names.is_empty() {
            write!(f, ", alt names [{}]", self.subject_alt_names.join(", "))?;
        }
        Ok(())
    }
}

fn common_name(name: &X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .and_then(|entry| entry.data().to_string().ok())
        .unwrap_or_else(|| "<undef>".to_string())
}

fn subject_alt_names(cert: &X509Ref) -> Vec<String> {
    let Some(names) = cert.subject_alt_names() else {
        return Vec::new();
    };

    names
        .iter()
        .filter_map(|name| {
            if let Some(dns) = name.dnsname() {
                return Some(format!("DNS:{}", dns));
            }
            let ip = match name.ipaddress()? {
                [a, b, c, d] => IpAddr::from([*a, *b, *c, *d]),
                octets => IpAddr::from(<[u8; 16]>::try_from(octets).ok()?),
            };
            Some(format!("IP:{}", ip))
        })
        .collect()
}
