// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the searelay webhook relay.
//!
//! Provides the error taxonomy and the inbound callback event model shared
//! by the platform client, the dispatcher, and the binary.

pub mod error;
pub mod event;

pub use error::RelayError;
pub use event::{ActionDescriptor, CallbackEnvelope, EventKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_error_has_all_variants() {
        let _config = RelayError::Config("test".into());
        let _auth = RelayError::Auth {
            message: "test".into(),
            source: None,
        };
        let _transport = RelayError::Transport {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _not_found = RelayError::RecipientNotFound {
            recipient: "a@x.com".into(),
            reason: "no active match".into(),
        };
        let _sig = RelayError::SignatureMismatch;
        let _internal = RelayError::Internal("test".into());
    }

    #[test]
    fn error_messages_name_the_failure() {
        let err = RelayError::RecipientNotFound {
            recipient: "a@x.com".into(),
            reason: "status 3".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a@x.com"));
        assert!(msg.contains("status 3"));
    }
}
