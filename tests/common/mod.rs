//! Key file fixtures generated with OpenSSL at test time

#![allow(dead_code)]

use std::io::Write;

use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{BasicConstraints, SubjectAlternativeName};
use openssl::x509::{X509NameBuilder, X509};
use tempfile::NamedTempFile;

/// A certificate and the key it was issued for
pub struct Credentials {
    pub cert: X509,
    pub key: PKey<Private>,
}

impl Credentials {
    /// Self-signed CA certificate
    pub fn ca(cn: &str) -> Self {
        issue(cn, None, true)
    }

    /// Self-signed server certificate
    pub fn self_signed(cn: &str) -> Self {
        issue(cn, None, false)
    }

    /// Server certificate signed by `self`
    pub fn sign_server(&self, cn: &str) -> Self {
        issue(cn, Some(self), false)
    }

    pub fn cert_pem(&self) -> Vec<u8> {
        self.cert.to_pem().unwrap()
    }

    pub fn key_pem(&self) -> Vec<u8> {
        self.key.private_key_to_pem_pkcs8().unwrap()
    }
}

fn issue(cn: &str, issuer: Option<&Credentials>, ca: bool) -> Credentials {
    let key = PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", cn).unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    let mut serial = BigNum::new().unwrap();
    serial.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();
    builder.set_serial_number(&serial.to_asn1_integer().unwrap()).unwrap();
    builder.set_subject_name(&name).unwrap();
    match issuer {
        Some(issuer) => builder.set_issuer_name(issuer.cert.subject_name()).unwrap(),
        None => builder.set_issuer_name(&name).unwrap(),
    }
    builder.set_pubkey(&key).unwrap();
    builder.set_not_before(&Asn1Time::days_from_now(0).unwrap()).unwrap();
    builder.set_not_after(&Asn1Time::days_from_now(365).unwrap()).unwrap();

    if ca {
        builder
            .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
            .unwrap();
    } else {
        let san = SubjectAlternativeName::new()
            .dns(cn)
            .ip("127.0.0.1")
            .build(&builder.x509v3_context(issuer.map(|i| &*i.cert), None))
            .unwrap();
        builder.append_extension(san).unwrap();
    }

    let signing_key = issuer.map(|i| &i.key).unwrap_or(&key);
    builder.sign(signing_key, MessageDigest::sha256()).unwrap();

    Credentials {
        cert: builder.build(),
        key,
    }
}

/// Write PEM blocks, in order, to a temporary key file
pub fn key_file(blocks: &[&[u8]]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for block in blocks {
        file.write_all(block).unwrap();
    }
    file.flush().unwrap();
    file
}

/// Route crate logs to the test harness output
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
