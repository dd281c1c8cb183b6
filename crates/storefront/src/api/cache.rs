//! Cache types for inventory lookups.

use std::sync::Arc;

use stockroom_core::{Item, ItemId};

/// Cache key for inventory responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Items,
    Item(ItemId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Items(Arc<Vec<Item>>),
    Item(Box<Item>),
}
