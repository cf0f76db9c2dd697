// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Card update with two-shape payload fallback.
//!
//! Backend tenant versions of the update endpoint disagree on the envelope:
//! older ones accept `{message_id, message: {interactive_message: ...}}`,
//! newer ones additionally require `message.tag = "interactive_message"` as
//! a discriminator. Probing bare-then-tagged maximizes compatibility without
//! per-tenant configuration. Both attempts are intentional; there is no
//! third shape.

use searelay_core::RelayError;
use tracing::{debug, warn};

use crate::client::SeatalkClient;
use crate::types::{ApiAck, CardElement, InteractiveBody, UpdateMessage, UpdateRequest};

pub(crate) const UPDATE_PATH: &str = "/messaging/v2/update";

/// Which envelope shape an update attempt used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{message_id, message: {interactive_message: {elements}}}`
    Bare,
    /// Same nesting plus `message.tag = "interactive_message"`.
    Tagged,
}

/// Final outcome of the two-attempt update protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The platform accepted the update (HTTP 200 and body code zero).
    Applied { shape: PayloadShape },
    /// Both shapes were rejected; the caller should fall back to a plain
    /// text acknowledgement.
    Rejected {
        status: u16,
        code: Option<String>,
    },
}

impl UpdateOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied { .. })
    }
}

/// Result of a single update attempt.
enum Attempt {
    Applied,
    NotApplied { status: u16, code: Option<String> },
}

impl SeatalkClient {
    /// Replaces the elements of a previously sent interactive message.
    ///
    /// Attempt 1 sends the bare shape; anything other than HTTP 200 with a
    /// zero body code triggers attempt 2 with the tagged shape, whose result
    /// is final. Transport failure on attempt 1 also falls through to the
    /// tagged shape; transport failure on attempt 2 propagates.
    pub async fn update_card(
        &self,
        message_id: &str,
        elements: Vec<CardElement>,
    ) -> Result<UpdateOutcome, RelayError> {
        match self
            .try_update(message_id, elements.clone(), PayloadShape::Bare)
            .await
        {
            Ok(Attempt::Applied) => {
                return Ok(UpdateOutcome::Applied {
                    shape: PayloadShape::Bare,
                });
            }
            Ok(Attempt::NotApplied { status, code }) => {
                debug!(message_id, status, ?code, "bare-shape update rejected, retrying tagged");
            }
            Err(e) => {
                warn!(message_id, error = %e, "bare-shape update attempt failed, retrying tagged");
            }
        }

        match self
            .try_update(message_id, elements, PayloadShape::Tagged)
            .await?
        {
            Attempt::Applied => Ok(UpdateOutcome::Applied {
                shape: PayloadShape::Tagged,
            }),
            Attempt::NotApplied { status, code } => {
                Ok(UpdateOutcome::Rejected { status, code })
            }
        }
    }

    /// One update attempt with the given envelope shape.
    async fn try_update(
        &self,
        message_id: &str,
        elements: Vec<CardElement>,
        shape: PayloadShape,
    ) -> Result<Attempt, RelayError> {
        let request = UpdateRequest {
            message_id: message_id.to_string(),
            message: UpdateMessage {
                tag: match shape {
                    PayloadShape::Bare => None,
                    PayloadShape::Tagged => Some("interactive_message".to_string()),
                },
                interactive_message: InteractiveBody { elements },
            },
        };

        let (status, ack) = self.post_api(UPDATE_PATH, &request).await?;

        if update_succeeded(status, &ack) {
            debug!(message_id, ?shape, "card update applied");
            Ok(Attempt::Applied)
        } else {
            Ok(Attempt::NotApplied {
                status: status.as_u16(),
                code: ack.code_str(),
            })
        }
    }
}

/// Success iff HTTP 200 and the body's status code equals zero.
fn update_succeeded(status: reqwest::StatusCode, ack: &ApiAck) -> bool {
    status == reqwest::StatusCode::OK && ack.code_is_zero()
}
