//! Linear undo/redo over serialized snapshots.
//!
//! Every committed render pass appends a snapshot of the document root.
//! Recording after an undo discards the redo branch. Snapshots are stored
//! as MessagePack with named fields and decoded on undo/redo. Preview
//! elements are stripped before encoding.

use ld_core::ElementData;
use thiserror::Error;

/// Default maximum number of entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode history snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode history snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<u8>>,
    /// Always a valid index into `entries`.
    position: usize,
    limit: usize,
}

fn encode(root: &ElementData) -> Result<Vec<u8>, SnapshotError> {
    let mut root = root.clone();
    root.strip_previews();
    Ok(rmp_serde::to_vec_named(&root)?)
}

fn decode(bytes: &[u8]) -> Result<ElementData, SnapshotError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

impl History {
    /// Start with a single entry for `initial` at position 0. A `limit` of
    /// zero is treated as one.
    pub fn new(initial: &ElementData, limit: usize) -> Result<Self, SnapshotError> {
        Ok(Self {
            entries: vec![encode(initial)?],
            position: 0,
            limit: limit.max(1),
        })
    }

    /// Truncate after the current position, append `root`, and move to it.
    /// The oldest entry is dropped once the limit is exceeded.
    pub fn record(&mut self, root: &ElementData) -> Result<(), SnapshotError> {
        let bytes = encode(root)?;
        self.entries.truncate(self.position + 1);
        self.entries.push(bytes);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.position = self.entries.len() - 1;
        log::debug!("history: recorded entry {}/{}", self.position + 1, self.entries.len());
        Ok(())
    }

    /// Step back one entry and return its snapshot. `Ok(None)` at the
    /// first entry.
    pub fn undo(&mut self) -> Result<Option<ElementData>, SnapshotError> {
        if self.position == 0 {
            return Ok(None);
        }
        let data = decode(&self.entries[self.position - 1])?;
        self.position -= 1;
        Ok(Some(data))
    }

    /// Step forward one entry and return its snapshot. `Ok(None)` at the
    /// last entry.
    pub fn redo(&mut self) -> Result<Option<ElementData>, SnapshotError> {
        if self.position + 1 >= self.entries.len() {
            return Ok(None);
        }
        let data = decode(&self.entries[self.position + 1])?;
        self.position += 1;
        Ok(Some(data))
    }

    /// Decoded snapshot at the current position.
    pub fn current(&self) -> Result<ElementData, SnapshotError> {
        decode(&self.entries[self.position])
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: there is always at least the initial entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
