//! Detects OpenSSL build capabilities from `openssl-sys` link metadata.
//!
//! `openssl-sys` exports the library version (`DEP_OPENSSL_VERSION_NUMBER`, hex)
//! and the list of `OPENSSL_NO_*` defines it found (`DEP_OPENSSL_CONF`). Both
//! are evaluated once here and surfaced to the crate as cfg flags.

use std::env;

/// First release without the default verify-depth bug (0.9.5-beta-1).
const VERIFY_DEPTH_FIXED_VERSION: u64 = 0x0090_5100;

fn main() {
    println!("cargo:rerun-if-env-changed=DEP_OPENSSL_CONF");
    println!("cargo:rerun-if-env-changed=DEP_OPENSSL_VERSION_NUMBER");

    for cfg in ["sslctx_no_ssl3", "sslctx_no_tls1", "sslctx_no_tls1_2", "sslctx_legacy_verify_depth"] {
        println!("cargo:rustc-check-cfg=cfg({})", cfg);
    }

    if let Ok(conf) = env::var("DEP_OPENSSL_CONF") {
        for define in conf.split(',').map(str::trim) {
            match define {
                "OPENSSL_NO_SSL3" | "OPENSSL_NO_SSL3_METHOD" => emit("sslctx_no_ssl3"),
                "OPENSSL_NO_TLS1" | "OPENSSL_NO_TLS1_METHOD" => emit("sslctx_no_tls1"),
                "OPENSSL_NO_TLS1_2" | "OPENSSL_NO_TLS1_2_METHOD" => emit("sslctx_no_tls1_2"),
                _ => {}
            }
        }
    }

    if let Ok(version) = env::var("DEP_OPENSSL_VERSION_NUMBER") {
        match u64::from_str_radix(version.trim(), 16) {
            Ok(version) if version < VERIFY_DEPTH_FIXED_VERSION => emit("sslctx_legacy_verify_depth"),
            Ok(_) => {}
            Err(_) => println!("cargo:warning=unparsable OpenSSL version number: {}", version),
        }
    }
}

fn emit(cfg: &str) {
    println!("cargo:rustc-cfg={}", cfg);
}
