//! Rows of the buffer list and the selection iterator

use crate::model::buffer::BufferInfo;
use crate::model::weak_ref::WeakBufferRef;

/// One row: label, weak reference to its buffer and the mark flag
///
/// Rows are recreated on every rebuild; callers track rows by position,
/// never by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub label: String,
    pub buffer: WeakBufferRef,
    pub selected: bool,
}

impl ListItem {
    pub fn new(info: &BufferInfo) -> Self {
        Self {
            label: info.name.clone(),
            buffer: WeakBufferRef::new(info.id),
            selected: false,
        }
    }
}

/// Rows an action applies to: every marked row, or the current row when
/// nothing is marked.
///
/// The targets are captured before the action runs so destructive actions
/// never iterate a collection they are mutating.
pub fn selection_targets(items: &[ListItem], current: Option<usize>) -> Vec<usize> {
    let marked: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.selected)
        .map(|(index, _)| index)
        .collect();

    if !marked.is_empty() {
        return marked;
    }
    match current {
        Some(index) if index < items.len() => vec![index],
        _ => Vec::new(),
    }
}
