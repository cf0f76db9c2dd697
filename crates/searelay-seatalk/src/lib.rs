// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SeaTalk OpenAPI client for the searelay relay.
//!
//! Covers the outbound half of the relay: bearer token caching, email to
//! employee-code resolution, text and interactive-card sends (single and
//! group), batch fan-out, and the two-shape card update protocol.

pub mod client;
pub mod send;
pub mod token;
pub mod types;
pub mod update;

pub use client::SeatalkClient;
pub use token::{CachedToken, TokenCache, DEFAULT_TOKEN_TTL_SECS, TOKEN_SAFETY_MARGIN_SECS};
pub use types::{ApiAck, CardElement, MessageEnvelope, SendReport};
pub use update::{PayloadShape, UpdateOutcome};
