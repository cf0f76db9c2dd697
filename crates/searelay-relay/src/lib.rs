// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound half of the searelay relay: webhook signature verification,
//! event deduplication, the callback dispatcher, operator endpoints, the
//! append-log sink, and the legacy-endpoint forwarder.

pub mod dedup;
pub mod dispatch;
pub mod forward;
pub mod ops;
pub mod server;
pub mod signature;
pub mod sink;

pub use dedup::RecentEventWindow;
pub use forward::Forwarder;
pub use server::{build_router, start_server, RelayState};
pub use signature::{expected_signature, signature_matches};
pub use sink::{AuditRow, AuditSink, HttpAuditSink, NoopAuditSink};
