//! Ordered part storage shared by messages and faults.
//!
//! ## Indexing
//!
//! ```text
//! named parts        out-of-band parts
//! ┌───┬───┬───┐      ┌───┬───┐
//! │ 0 │ 1 │ 2 │  →   │ 3 │ 4 │
//! └───┴───┴───┘      └───┴───┘
//! ```
//!
//! Named parts are keyed by declared name and keep insertion order; adding a
//! part under an existing name replaces it in place and reuses its index.
//! Out-of-band parts (attachments added after the contract was read) always
//! follow the named parts, so their indexes are shifted when a named part is
//! appended later.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::trace;

use super::error::{Result, require_name};
use super::operation::OperationInfo;
use super::part::{MessagePartInfo, PartOwner};
use super::properties::PropertiesHolder;
use crate::base::QName;

#[derive(Debug, Default)]
struct PartTable {
    named: IndexMap<QName, Arc<MessagePartInfo>>,
    out_of_band: Vec<Arc<MessagePartInfo>>,
}

impl PartTable {
    /// Index following the last named part.
    fn next_named_index(&self) -> usize {
        self.named.last().map_or(0, |(_, p)| p.index() + 1)
    }

    fn renumber_out_of_band(&self) {
        let base = self.next_named_index();
        for (offset, part) in self.out_of_band.iter().enumerate() {
            part.set_index(base + offset);
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Arc<MessagePartInfo>> {
        self.named.values().chain(self.out_of_band.iter())
    }
}

/// The parts of one message or fault.
#[derive(Debug)]
pub struct MessagePartContainer {
    owner: PartOwner,
    parts: RwLock<PartTable>,
}

impl MessagePartContainer {
    pub fn new(owner: PartOwner) -> Self {
        Self {
            owner,
            parts: RwLock::default(),
        }
    }

    /// Create a named part.
    ///
    /// A part already registered under `name` is replaced and its index is
    /// reused; otherwise the part is appended after the last named part.
    pub fn add_part(&self, name: QName) -> Result<Arc<MessagePartInfo>> {
        require_name(&name, "message part")?;
        let mut parts = self.parts.write();
        let index = match parts.named.get(&name) {
            Some(existing) => existing.index(),
            None => parts.next_named_index(),
        };
        let part = Arc::new(MessagePartInfo::new(name.clone(), index, self.owner.clone()));
        if parts.named.insert(name, Arc::clone(&part)).is_some() {
            trace!(part = %part.name(), index, "replaced message part");
        } else {
            trace!(part = %part.name(), index, "added message part");
            parts.renumber_out_of_band();
        }
        Ok(part)
    }

    /// Append an out-of-band part. Never replaces an existing part.
    pub fn add_out_of_band_part(&self, name: QName) -> Result<Arc<MessagePartInfo>> {
        require_name(&name, "message part")?;
        let mut parts = self.parts.write();
        let index = parts.next_named_index() + parts.out_of_band.len();
        let part = Arc::new(MessagePartInfo::new(name, index, self.owner.clone()));
        trace!(part = %part.name(), index, "added out-of-band part");
        parts.out_of_band.push(Arc::clone(&part));
        Ok(part)
    }

    /// Look a part up by declared name, then by concrete (wire) name among
    /// the named parts, then by either name among the out-of-band parts.
    pub fn part(&self, name: &QName) -> Option<Arc<MessagePartInfo>> {
        let parts = self.parts.read();
        if let Some(part) = parts.named.get(name) {
            return Some(Arc::clone(part));
        }
        if let Some(part) = parts.named.values().find(|p| p.concrete_name() == *name) {
            return Some(Arc::clone(part));
        }
        parts
            .out_of_band
            .iter()
            .find(|p| p.name() == name || p.concrete_name() == *name)
            .cloned()
    }

    /// The part carrying `index`, named parts first.
    pub fn part_by_index(&self, index: usize) -> Option<Arc<MessagePartInfo>> {
        self.parts.read().iter().find(|p| p.index() == index).cloned()
    }

    /// Position of this exact part object, named parts first.
    pub fn part_index(&self, part: &MessagePartInfo) -> Option<usize> {
        self.parts
            .read()
            .iter()
            .position(|p| std::ptr::eq(Arc::as_ptr(p), part))
    }

    /// All parts: named ones in order, then out-of-band ones.
    pub fn parts(&self) -> Vec<Arc<MessagePartInfo>> {
        self.parts.read().iter().cloned().collect()
    }

    pub fn named_parts(&self) -> Vec<Arc<MessagePartInfo>> {
        self.parts.read().named.values().cloned().collect()
    }

    pub fn out_of_band_parts(&self) -> Vec<Arc<MessagePartInfo>> {
        self.parts.read().out_of_band.clone()
    }

    pub fn first_part(&self) -> Option<Arc<MessagePartInfo>> {
        self.parts.read().iter().next().cloned()
    }

    /// Remove a named part. Indexes of the remaining named parts are kept.
    pub fn remove_part(&self, name: &QName) -> Option<Arc<MessagePartInfo>> {
        let mut parts = self.parts.write();
        let removed = parts.named.shift_remove(name)?;
        parts.renumber_out_of_band();
        trace!(part = %name, "removed message part");
        Some(removed)
    }

    /// Named plus out-of-band part count.
    pub fn len(&self) -> usize {
        let parts = self.parts.read();
        parts.named.len() + parts.out_of_band.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node that owns message parts: [`MessageInfo`](super::MessageInfo) or
/// [`FaultInfo`](super::FaultInfo).
pub trait MessageContainer: PropertiesHolder {
    fn part_container(&self) -> &MessagePartContainer;

    /// The operation this container belongs to.
    fn operation(&self) -> Option<Arc<OperationInfo>>;

    fn add_message_part(&self, name: QName) -> Result<Arc<MessagePartInfo>> {
        self.part_container().add_part(name)
    }

    fn add_out_of_band_part(&self, name: QName) -> Result<Arc<MessagePartInfo>> {
        self.part_container().add_out_of_band_part(name)
    }

    fn message_part(&self, name: &QName) -> Option<Arc<MessagePartInfo>> {
        self.part_container().part(name)
    }

    fn message_part_by_index(&self, index: usize) -> Option<Arc<MessagePartInfo>> {
        self.part_container().part_by_index(index)
    }

    fn message_part_index(&self, part: &MessagePartInfo) -> Option<usize> {
        self.part_container().part_index(part)
    }

    fn message_parts(&self) -> Vec<Arc<MessagePartInfo>> {
        self.part_container().parts()
    }

    fn out_of_band_parts(&self) -> Vec<Arc<MessagePartInfo>> {
        self.part_container().out_of_band_parts()
    }

    fn first_message_part(&self) -> Option<Arc<MessagePartInfo>> {
        self.part_container().first_part()
    }

    fn remove_message_part(&self, name: &QName) -> Option<Arc<MessagePartInfo>> {
        self.part_container().remove_part(name)
    }

    fn part_count(&self) -> usize {
        self.part_container().len()
    }
}
