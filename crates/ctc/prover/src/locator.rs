//! Backward log scan for the batch that covers a global index.

use std::{num::NonZeroU64, sync::Arc};

use ctc_primitives::CommitEvent;
use tracing::{debug, info};

use crate::{CommitEventSource, ProverError, ProverResult};

/// Finds the `TransactionBatchAppended` event covering a global index.
///
/// Windows are inclusive and do not overlap: the first is `[head - window, head]`, each next one
/// ends one block below the previous start, and none starts below `floor`. The scan stops with
/// [`ProverError::NotFound`] once the window starting at `floor` comes back without a match.
#[derive(Debug)]
pub struct BatchLocator<S: ?Sized> {
    source: Arc<S>,
    window: NonZeroU64,
    floor: u64,
}

impl<S: CommitEventSource + ?Sized> BatchLocator<S> {
    /// Creates a locator scanning `window` blocks per query, never below `floor`.
    pub const fn new(source: Arc<S>, window: NonZeroU64, floor: u64) -> Self {
        Self { source, window, floor }
    }

    /// Returns the event source.
    pub const fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Returns the number of blocks per query.
    pub const fn window(&self) -> NonZeroU64 {
        self.window
    }

    /// Returns the lowest block searched.
    pub const fn floor(&self) -> u64 {
        self.floor
    }

    /// Scans backwards from `head` for the event covering `global_index`.
    ///
    /// Returns the first covering event in emission order within the window it is found in.
    pub async fn locate(&self, global_index: u64, head: u64) -> ProverResult<CommitEvent> {
        let not_found = ProverError::NotFound { index: global_index, floor: self.floor };
        if head < self.floor {
            return Err(not_found);
        }

        let mut to = head;
        loop {
            let from = to.saturating_sub(self.window.get()).max(self.floor);
            debug!(global_index, from, to, "Scanning for commit event");

            let events = self.source.commit_events(from, to).await?;
            if let Some(event) = events.into_iter().find(|event| event.covers(global_index)) {
                info!(
                    global_index,
                    batch_index = event.batch_index,
                    prev_total_elements = event.prev_total_elements,
                    batch_size = event.batch_size,
                    l1_block = event.block_number,
                    tx_hash = %event.source_tx_hash,
                    "Located batch"
                );
                return Ok(event);
            }

            if from == self.floor {
                return Err(not_found);
            }
            to = from - 1;
        }
    }
}
