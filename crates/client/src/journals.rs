//! Incoming and outgoing message journals.

use serde::Serialize;
use serde_json::Value;

use crate::{Error, SdkwaClient};

/// Journal window used by the API when `minutes` is omitted (24 hours).
pub const DEFAULT_JOURNAL_MINUTES: u32 = 1440;

#[derive(Serialize)]
struct MinutesQuery {
    minutes: u32,
}

impl SdkwaClient {
    /// Messages sent during the last `minutes`.
    pub async fn last_outgoing_messages(&self, minutes: u32) -> Result<Vec<Value>, Error> {
        self.journal("lastOutgoingMessages", minutes).await
    }

    /// Messages received during the last `minutes`.
    pub async fn last_incoming_messages(&self, minutes: u32) -> Result<Vec<Value>, Error> {
        self.journal("lastIncomingMessages", minutes).await
    }

    async fn journal(&self, method: &str, minutes: u32) -> Result<Vec<Value>, Error> {
        if minutes == 0 {
            return Err(Error::Validation("minutes must be positive".into()));
        }
        if minutes == DEFAULT_JOURNAL_MINUTES {
            self.get(method).await
        } else {
            self.get_with_query(method, &MinutesQuery { minutes }).await
        }
    }
}
