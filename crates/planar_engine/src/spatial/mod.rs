//! Spatial partitioning data structures
//!
//! Provides the quadtree broad phase used by the collider store.

mod quadtree;

pub use quadtree::{QuadEntry, QuadNode, QuadTree};
