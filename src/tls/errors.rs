//! OpenSSL error queue access
//!
//! OpenSSL records failures in a thread-local queue. Calls made through the
//! `openssl` crate drain that queue into the returned `ErrorStack`; context
//! creation puts the error it reports back, so [`last_crypto_error`] sees it.

use openssl::error::{Error, ErrorStack};

/// Longest error text handed out, in bytes
pub const MAX_ERROR_TEXT_LEN: usize = 120;

/// Pop the oldest pending OpenSSL error of this thread as text
///
/// Must run on the thread that saw the failure, before any other OpenSSL
/// call there. Returns an empty string when nothing is pending.
pub fn last_crypto_error() -> String {
    Error::get()
        .map(|err| bounded(err.to_string()))
        .unwrap_or_default()
}

/// Diagnostic text for a failed call: its first recorded error
pub(crate) fn error_stack_text(stack: &ErrorStack) -> String {
    match stack.errors().first() {
        Some(err) => bounded(err.to_string()),
        None => bounded(stack.to_string()),
    }
}

/// Put the error a failed call reports back on the thread's queue
///
/// Keeps [`last_crypto_error`] usable right after a returned failure.
pub(crate) fn restore_reported_error(stack: &ErrorStack) {
    if let Some(err) = stack.errors().first() {
        err.put();
    }
}

fn bounded(mut text: String) -> String {
    if text.len() > MAX_ERROR_TEXT_LEN {
        let mut end = MAX_ERROR_TEXT_LEN;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
