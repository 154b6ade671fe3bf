//! Per-path record of the participating media surrounding a ray.
//!
//! Entering a volume pushes `(id, medium)`; leaving it removes the entry with
//! that id. Enter/exit pairs are expected to nest like brackets along a path.
//! The top entry is the medium the ray currently travels through.

use crate::Medium;
use thiserror::Error;

/// Identity of a medium on a stack, chosen by the caller (usually per volume).
pub type MediumId = u32;

/// Default maximum nesting depth of overlapping volumes.
pub const DEFAULT_MEDIUM_DEPTH: usize = 8;

/// Errors from medium stack transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediumStackError {
    #[error("cannot enter medium {id}: stack is full (capacity {capacity})")]
    Full { id: MediumId, capacity: usize },

    #[error("cannot exit medium {id}: it is not on the stack")]
    NotResident { id: MediumId },
}

/// Bounded stack of the media a path is currently inside, innermost last.
///
/// Borrows the media; they are shared scene resources.
#[derive(Debug, Clone)]
pub struct MediumStack<'a> {
    entries: Vec<(MediumId, &'a Medium)>,
    capacity: usize,
}

impl<'a> MediumStack<'a> {
    /// Create an empty stack holding at most `capacity` media.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a stack already inside `media`, entered in order.
    pub fn with_media<I>(capacity: usize, media: I) -> Result<Self, MediumStackError>
    where
        I: IntoIterator<Item = (MediumId, &'a Medium)>,
    {
        let mut stack = Self::new(capacity);
        for (id, medium) in media {
            stack.enter(id, medium)?;
        }
        Ok(stack)
    }

    /// Push `medium` under `id` when a ray enters its volume.
    ///
    /// Entering an id that is already resident does nothing.
    pub fn enter(&mut self, id: MediumId, medium: &'a Medium) -> Result<(), MediumStackError> {
        if self.contains(id) {
            log::debug!("Medium {} already on stack, ignoring enter", id);
            return Ok(());
        }
        if self.entries.len() == self.capacity {
            return Err(MediumStackError::Full {
                id,
                capacity: self.capacity,
            });
        }

        self.entries.push((id, medium));
        log::debug!("Entered medium {} (depth {})", id, self.entries.len());
        Ok(())
    }

    /// Remove the topmost entry with `id` when a ray leaves its volume.
    ///
    /// Entries above it move down, so the top stays the innermost medium
    /// even when volumes are left out of order.
    pub fn exit(&mut self, id: MediumId) -> Result<&'a Medium, MediumStackError> {
        match self.entries.iter().rposition(|(resident, _)| *resident == id) {
            Some(index) => {
                let (_, medium) = self.entries.remove(index);
                log::debug!("Exited medium {} (depth {})", id, self.entries.len());
                Ok(medium)
            }
            None => {
                log::warn!("Exit from medium {} which is not on the stack", id);
                Err(MediumStackError::NotResident { id })
            }
        }
    }

    /// The medium the ray is currently traveling through.
    pub fn current(&self) -> Option<&'a Medium> {
        self.entries.last().map(|(_, medium)| *medium)
    }

    /// Id of the current medium.
    pub fn current_id(&self) -> Option<MediumId> {
        self.entries.last().map(|(id, _)| *id)
    }

    pub fn contains(&self, id: MediumId) -> bool {
        self.entries.iter().any(|(resident, _)| *resident == id)
    }

    /// Resident media from outermost to innermost.
    pub fn iter(&self) -> impl Iterator<Item = (MediumId, &'a Medium)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for MediumStack<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIUM_DEPTH)
    }
}
