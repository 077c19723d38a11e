// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission core for Night Canteen.
//!
//! Takes an order or feedback payload, validates it, stamps it with
//! session metadata, and delivers it to the spreadsheet endpoint as a
//! multipart form. Delivery retries the primary endpoint with exponential
//! backoff, then tries each fallback endpoint once. Outcomes are recorded
//! in the session's bounded ledgers, and failed payloads can be replayed
//! by a retry sweep.

pub mod enrich;
pub mod form;
pub mod response;
pub mod stats;
pub mod submitter;
pub mod transport;
pub mod validator;

pub use enrich::{Enricher, generate_session_id};
pub use form::encode_form;
pub use response::{DEFAULT_ACK_MESSAGE, interpret};
pub use stats::{Diagnostics, SubmissionStats};
pub use submitter::{Submitter, SweepReport, backoff_delay};
pub use transport::HttpTransport;
pub use validator::{Validation, ValidationIssue, is_valid_mobile, normalize_mobile, validate};
