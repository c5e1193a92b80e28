//! Buffer list ordering
//!
//! The active order is a bitmask of sort keys. Each key owns two adjacent
//! bits: the low bit selects the key, the high bit marks the descending
//! variant. Evaluation order is fixed regardless of which bits are set:
//! system buffers last, then modified first, then time, size, filename,
//! and finally the buffer name.

use bitflags::bitflags;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::model::buffer::BufferInfo;
use crate::model::collate::Collator;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SortMask: u16 {
        const MODIFIED = 1 << 0;
        const MODIFIED_DESC = 1 << 1;
        const TIME = 1 << 2;
        const TIME_DESC = 1 << 3;
        const NAME = 1 << 4;
        const NAME_DESC = 1 << 5;
        const FILENAME = 1 << 6;
        const FILENAME_DESC = 1 << 7;
        const SIZE = 1 << 8;
        const SIZE_DESC = 1 << 9;
    }
}

impl SortMask {
    /// Every descending bit
    pub const DESCENDING: u16 = 0xAAAA;

    /// The same keys with their descending bits set
    pub fn descending(self) -> Self {
        let bits = self.bits();
        Self::from_bits_retain(bits | ((bits & 0x5555) << 1))
    }

    pub fn is_descending(self) -> bool {
        self.bits() & Self::DESCENDING != 0
    }

    /// Toggle rule for a sort command: re-selecting the sole active key
    /// flips it to descending, anything else replaces the mask
    pub fn toggled(self, key: SortKey) -> Self {
        let mask = key.mask();
        if self == mask {
            mask.descending()
        } else {
            mask
        }
    }
}

/// Sort commands exposed to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Creation order
    #[default]
    Unsorted,
    Name,
    Filename,
    Size,
    Time,
    Modified,
}

impl SortKey {
    pub fn mask(self) -> SortMask {
        match self {
            SortKey::Unsorted => SortMask::empty(),
            SortKey::Name => SortMask::NAME,
            SortKey::Filename => SortMask::FILENAME,
            SortKey::Size => SortMask::SIZE,
            SortKey::Time => SortMask::TIME,
            SortKey::Modified => SortMask::MODIFIED,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Unsorted => "unsorted",
            SortKey::Name => "name",
            SortKey::Filename => "filename",
            SortKey::Size => "size",
            SortKey::Time => "time",
            SortKey::Modified => "modified",
        }
    }
}

/// Explicit direction carried by a sort command, bypassing the toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Process-wide sort order shared by every buffer list opened with the same
/// handle, so a new panel starts with the order chosen in the previous one
#[derive(Debug, Clone, Default)]
pub struct SharedSortOrder(Rc<Cell<SortMask>>);

impl SharedSortOrder {
    pub fn new(initial: SortMask) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn get(&self) -> SortMask {
        self.0.get()
    }

    pub fn set(&self, mask: SortMask) {
        self.0.set(mask);
    }

    /// Apply a sort command and return the resulting mask
    pub fn apply(&self, key: SortKey, direction: Option<SortDirection>) -> SortMask {
        let mask = match direction {
            None => self.get().toggled(key),
            Some(SortDirection::Ascending) => key.mask(),
            Some(SortDirection::Descending) => key.mask().descending(),
        };
        self.set(mask);
        mask
    }
}

/// Human readable description of a mask, e.g. "size, descending"
pub fn describe(mask: SortMask) -> String {
    let keys = [
        (SortMask::MODIFIED, "modified"),
        (SortMask::TIME, "time"),
        (SortMask::NAME, "name"),
        (SortMask::FILENAME, "filename"),
        (SortMask::SIZE, "size"),
    ];
    let names: Vec<&str> = keys
        .iter()
        .filter(|(bit, _)| mask.contains(*bit))
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        return "unsorted".to_string();
    }
    let mut out = names.join("+");
    if mask.is_descending() {
        out.push_str(", descending");
    }
    out
}

/// Compare two live buffers under `mask`
pub fn compare_buffers(
    a: &BufferInfo,
    b: &BufferInfo,
    mask: SortMask,
    collator: &dyn Collator,
) -> Ordering {
    // System buffers go last whatever the direction
    let system = a.is_system().cmp(&b.is_system());
    if system != Ordering::Equal {
        return system;
    }

    let ord = keyed_order(a, b, mask, collator);
    if mask.is_descending() {
        ord.reverse()
    } else {
        ord
    }
}

fn keyed_order(a: &BufferInfo, b: &BufferInfo, mask: SortMask, collator: &dyn Collator) -> Ordering {
    if mask.contains(SortMask::MODIFIED) {
        let ord = b.is_modified().cmp(&a.is_modified());
        if ord != Ordering::Equal {
            return ord;
        }
    }
    if mask.contains(SortMask::TIME) && a.mtime != b.mtime {
        return a.mtime.cmp(&b.mtime);
    }
    if mask.contains(SortMask::SIZE) && a.size != b.size {
        return a.size.cmp(&b.size);
    }
    if mask.contains(SortMask::FILENAME) {
        let ord = match (&a.filename, &b.filename) {
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(fa), Some(fb)) => {
                collator.collate(&fa.to_string_lossy(), &fb.to_string_lossy())
            }
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    // Names starting with '*' denote internal buffers
    a.name
        .starts_with('*')
        .cmp(&b.name.starts_with('*'))
        .then_with(|| collator.collate(&a.name, &b.name))
}

/// Compare two rows whose buffers may have died; dead rows go last
pub fn compare_items(
    a: Option<&BufferInfo>,
    b: Option<&BufferInfo>,
    mask: SortMask,
    collator: &dyn Collator,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_buffers(a, b, mask, collator),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
