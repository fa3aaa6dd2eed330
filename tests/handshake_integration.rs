//! Handshakes against created server contexts
//!
//! A context is only useful if a client can complete a handshake with it.
//! These tests accept one connection on a loopback listener and check the
//! negotiated version.

mod common;

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use common::{key_file, Credentials};
use openssl::ssl::{SslContext, SslMethod, SslVerifyMode};
use sslctx::tls::{self, create_context, ProtocolVersion};

/// Serve one TLS connection with `protocol`, return the version the client saw
fn handshake(protocol: ProtocolVersion) -> String {
    tls::init();

    let server = Credentials::self_signed("localhost");
    let file = key_file(&[&server.cert_pem(), &server.key_pem()]);
    let ctx = create_context(protocol, file.path()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server_thread = thread::spawn(move || {
        let (tcp_stream, _) = listener.accept().unwrap();
        let mut stream = ctx.new_ssl().unwrap().accept(tcp_stream).unwrap();
        stream.write_all(b"ok").unwrap();
        stream.flush().unwrap();
        let _ = stream.shutdown();
    });

    let mut client_ctx = SslContext::builder(SslMethod::tls_client()).unwrap();
    client_ctx.set_verify(SslVerifyMode::NONE);
    let client_ctx = client_ctx.build();

    let tcp_stream = TcpStream::connect(addr).unwrap();
    let ssl = openssl::ssl::Ssl::new(&client_ctx).unwrap();
    let mut stream = ssl.connect(tcp_stream).unwrap();

    let mut buf = [0u8; 2];
    stream.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"ok");

    let version = stream.ssl().version_str().to_string();
    server_thread.join().unwrap();
    version
}

#[test]
fn test_tls12_handshake() {
    if !ProtocolVersion::Tls12.is_available() {
        return;
    }
    assert_eq!(handshake(ProtocolVersion::Tls12), "TLSv1.2");
}

#[test]
fn test_flexible_handshake() {
    let version = handshake(ProtocolVersion::Ssl23);
    assert!(version.starts_with("TLSv1"), "negotiated {}", version);
}
