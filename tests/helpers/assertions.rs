//! Assertions over part layout.

use std::sync::Arc;

use svcmodel::{MessageContainer, MessagePartInfo};

/// Local names of every part, in iteration order.
pub fn part_names(container: &impl MessageContainer) -> Vec<String> {
    container
        .message_parts()
        .iter()
        .map(|p| p.name().local_part().to_string())
        .collect()
}

/// Indexes of every part, in iteration order.
pub fn part_indexes(container: &impl MessageContainer) -> Vec<usize> {
    container.message_parts().iter().map(|p| p.index()).collect()
}

/// Assert two handles point at the same part object.
pub fn assert_same_part(a: &Arc<MessagePartInfo>, b: &Arc<MessagePartInfo>) {
    assert!(
        Arc::ptr_eq(a, b),
        "expected the same part, got {} and {}",
        a.name(),
        b.name()
    );
}
