//! Link list operations
//!
//! Links are addressed by position. An index is a snapshot: it is only valid
//! until the next change to the list, since deleting or moving a link shifts
//! the others. Callers must not hold on to indices across mutations.
//!
//! Every operation loads the list, checks its arguments against that list,
//! and only then saves. A failed operation never writes.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::error::{HubError, HubResult};
use crate::models::Document;
use crate::storage::RecordStore;

/// Direction for [`LinkService::move_link`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards index 0
    Up,
    /// Towards the end of the list
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

impl FromStr for Direction {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(HubError::UnknownDirection(other.to_string())),
        }
    }
}

/// Positional CRUD over a [`RecordStore`]
pub struct LinkService<S> {
    store: S,
}

impl<S: RecordStore> LinkService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All links in display order
    pub fn list(&self) -> HubResult<Vec<Document>> {
        self.store.load()
    }

    /// Add a link at the end, returning its index
    pub fn append(&self, link: Document) -> HubResult<(usize, Document)> {
        let mut links = self.store.load()?;
        let index = links.len();
        links.push(link.clone());
        self.store.save(&links)?;
        info!(index, "Added link");
        Ok((index, link))
    }

    /// Remove the link at `index`, returning it
    pub fn delete_at(&self, index: i64) -> HubResult<Document> {
        let mut links = self.store.load()?;
        let pos = resolve(index, links.len())?;
        let removed = links.remove(pos);
        self.store.save(&links)?;
        info!(index = pos, "Deleted link");
        Ok(removed)
    }

    /// Replace the link at `index` wholesale, returning the new value
    pub fn replace_at(&self, index: i64, link: Document) -> HubResult<Document> {
        let mut links = self.store.load()?;
        let pos = resolve(index, links.len())?;
        links[pos] = link.clone();
        self.store.save(&links)?;
        info!(index = pos, "Updated link");
        Ok(link)
    }

    /// Swap the link at `index` with its neighbour in `direction`
    pub fn move_link(&self, index: i64, direction: Direction) -> HubResult<()> {
        self.move_with(index, || Ok(direction))
    }

    /// Like [`move_link`](Self::move_link), with the direction as sent by a
    /// client (`"up"` or `"down"`)
    ///
    /// The index is checked first, so an out-of-range index reports
    /// `NotFound` even when the direction is also invalid.
    pub fn move_link_named(&self, index: i64, direction: &str) -> HubResult<()> {
        self.move_with(index, || direction.parse())
    }

    fn move_with(
        &self,
        index: i64,
        direction: impl FnOnce() -> HubResult<Direction>,
    ) -> HubResult<()> {
        let mut links = self.store.load()?;
        let pos = resolve(index, links.len())?;
        let direction = direction()?;

        let target = match direction {
            Direction::Up if pos > 0 => pos - 1,
            Direction::Down if pos + 1 < links.len() => pos + 1,
            _ => {
                return Err(HubError::IllegalMove {
                    index: pos,
                    direction,
                })
            }
        };

        links.swap(pos, target);
        self.store.save(&links)?;
        info!(from = pos, to = target, "Moved link");
        Ok(())
    }
}

/// Check a positional index against the current length
fn resolve(index: i64, len: usize) -> HubResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&pos| pos < len)
        .ok_or(HubError::IndexOutOfRange { index, len })
}
