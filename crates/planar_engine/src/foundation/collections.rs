//! Specialized collection types

pub use slotmap::{SlotMap, DefaultKey};

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Typed handle for type-safe asset references
pub struct TypedHandle<T> {
    key: DefaultKey,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

// Manual impls so handles carry no bounds on `T`
impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> std::hash::Hash for TypedHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> std::fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TypedHandle").field(&self.key).finish()
    }
}

impl<T> TypedHandle<T> {
    /// Create a new typed handle from a key
    pub const fn new(key: DefaultKey) -> Self {
        Self {
            key,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Get the underlying key
    pub const fn key(&self) -> DefaultKey {
        self.key
    }
}

/// Slot map keyed by typed handles
pub struct TypedHandleMap<T> {
    items: HandleMap<T>,
}

impl<T> TypedHandleMap<T> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            items: HandleMap::new(),
        }
    }

    /// Insert an item and return its handle
    pub fn insert(&mut self, item: T) -> TypedHandle<T> {
        TypedHandle::new(self.items.insert(item))
    }

    /// Get an item by handle
    pub fn get(&self, handle: TypedHandle<T>) -> Option<&T> {
        self.items.get(handle.key())
    }

    /// Remove an item by handle
    pub fn remove(&mut self, handle: TypedHandle<T>) -> Option<T> {
        self.items.remove(handle.key())
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for TypedHandleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_handle_is_stale() {
        let mut map = TypedHandleMap::new();
        let first = map.insert("crate.png");
        assert_eq!(map.get(first), Some(&"crate.png"));

        assert_eq!(map.remove(first), Some("crate.png"));
        let second = map.insert("wall.png");
        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&"wall.png"));
        assert_eq!(map.len(), 1);
    }
}
