// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Night Canteen.
//!
//! Holds the error type, the payload and ledger record types, and the
//! traits that the transport and storage layers implement. Everything else
//! in the workspace depends on this crate and on nothing above it.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CanteenError, FailureKind};
pub use types::{
    FormField, Payload, RawResponse, ResponseBody, SubmissionKind, SubmissionRecord,
};

pub use traits::{LedgerStore, SessionStorage, Transport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canteen_error_has_all_variants() {
        let _config = CanteenError::Config("test".into());
        let _storage = CanteenError::Storage {
            message: "test".into(),
            source: None,
        };
        let _validation = CanteenError::Validation {
            issues: vec!["missing name".into()],
        };
        let _http = CanteenError::Http {
            status: 500,
            reason: "Internal Server Error".into(),
        };
        let _network = CanteenError::Network {
            message: "connection refused".into(),
            source: None,
        };
        let _timeout = CanteenError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        let _exhausted = CanteenError::Exhausted {
            kind: SubmissionKind::Order,
            attempts: 3,
            last_error: Box::new(CanteenError::Internal("boom".into())),
        };
        let _menu = CanteenError::Menu {
            message: "test".into(),
            source: None,
        };
        let _order = CanteenError::Order("empty cart".into());
        let _internal = CanteenError::Internal("test".into());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_transport<T: Transport>() {}
        fn _assert_session_storage<T: SessionStorage>() {}
        fn _assert_ledger_store<T: LedgerStore>() {}
    }
}
