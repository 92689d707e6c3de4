//! Quadtree spatial partitioning structure
//!
//! Divides a fixed world boundary into hierarchical square regions for the
//! collision broad phase. Nodes live in one arena and refer to their children
//! by index. Each leaf keeps one bucket per shape kind; a bucket that would
//! exceed the node capacity splits the leaf into four quadrants.
//!
//! A shape goes into every leaf its world-space geometry touches, so shapes
//! straddling a split line appear in several leaves. The tree is rebuilt from
//! scratch every step; there is no removal.

use crate::core::SpatialConfig;
use crate::ecs::ComponentIndex;
use crate::physics::collision::{Rect, Shape, ShapeKind};
use std::collections::HashSet;

/// A collider reference stored in a leaf bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadEntry {
    /// Dense position in the collider store of the shape's kind
    pub index: ComponentIndex,
    /// World-space shape at insertion time
    pub shape: Shape,
}

/// Single node in the quadtree
#[derive(Debug, Clone)]
pub struct QuadNode {
    boundary: Rect,
    depth: u32,
    children: Option<[usize; 4]>,
    buckets: [Vec<QuadEntry>; ShapeKind::COUNT],
}

impl QuadNode {
    fn new(boundary: Rect, depth: u32) -> Self {
        Self {
            boundary,
            depth,
            children: None,
            buckets: Default::default(),
        }
    }

    /// Region covered by this node
    pub fn boundary(&self) -> &Rect {
        &self.boundary
    }

    /// Depth in the tree (0 = root)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Arena indices of the four quadrants, if subdivided
    pub fn children(&self) -> Option<[usize; 4]> {
        self.children
    }

    /// Entries of one shape kind; always empty for interior nodes
    pub fn bucket(&self, kind: ShapeKind) -> &[QuadEntry] {
        &self.buckets[kind.slot()]
    }

    /// Every entry with its kind
    pub fn entries(&self) -> impl Iterator<Item = (ShapeKind, &QuadEntry)> {
        ShapeKind::ALL
            .into_iter()
            .flat_map(move |kind| self.bucket(kind).iter().map(move |entry| (kind, entry)))
    }

    /// Total number of entries over all kinds
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Quadtree over a fixed world boundary
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    boundary: Rect,
    capacity: usize,
    max_depth: u32,
}

impl QuadTree {
    /// Create an empty tree with a single root leaf
    pub fn new(config: &SpatialConfig) -> Self {
        Self {
            nodes: vec![QuadNode::new(config.world_bounds, 0)],
            boundary: config.world_bounds,
            capacity: config.node_capacity.max(1),
            max_depth: config.max_depth,
        }
    }

    /// Drop every node except an empty root
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(QuadNode::new(self.boundary, 0));
    }

    /// Insert a world-space shape, returning the number of leaves it landed in
    ///
    /// Zero means the shape lies outside the world boundary.
    pub fn insert(&mut self, index: ComponentIndex, shape: Shape) -> usize {
        let entry = QuadEntry { index, shape };
        let slot = shape.kind().slot();
        let mut placed = 0;

        let mut worklist = Vec::new();
        if shape.intersects_rect(&self.nodes[0].boundary) {
            worklist.push(0);
        }

        while let Some(node) = worklist.pop() {
            if self.nodes[node].is_leaf() {
                let leaf = &mut self.nodes[node];
                if leaf.buckets[slot].len() < self.capacity || leaf.depth >= self.max_depth {
                    leaf.buckets[slot].push(entry);
                    placed += 1;
                    continue;
                }
                self.subdivide(node);
            }

            if let Some(children) = self.nodes[node].children {
                // Reversed so the first quadrant is visited first
                for &child in children.iter().rev() {
                    if shape.intersects_rect(&self.nodes[child].boundary) {
                        worklist.push(child);
                    }
                }
            }
        }

        placed
    }

    /// Split a full leaf into quadrants and move its entries down
    fn subdivide(&mut self, node: usize) {
        let depth = self.nodes[node].depth + 1;
        let first = self.nodes.len();
        for quadrant in self.nodes[node].boundary.quadrants() {
            self.nodes.push(QuadNode::new(quadrant, depth));
        }
        let children = [first, first + 1, first + 2, first + 3];

        let buckets = std::mem::take(&mut self.nodes[node].buckets);
        self.nodes[node].children = Some(children);
        log::trace!(
            "Subdivided quadtree node {node} at depth {} into {first}..{}",
            depth - 1,
            first + 4
        );

        for (slot, bucket) in buckets.into_iter().enumerate() {
            for entry in bucket {
                for &child in &children {
                    if entry.shape.intersects_rect(&self.nodes[child].boundary) {
                        self.nodes[child].buckets[slot].push(entry);
                    }
                }
            }
        }
    }

    /// Entries whose shape touches `region`, each reported once
    pub fn query_rect(&self, region: &Rect) -> Vec<(ShapeKind, ComponentIndex)> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        let mut worklist = vec![0];

        while let Some(node) = worklist.pop() {
            let node = &self.nodes[node];
            if !node.boundary.intersects(region) {
                continue;
            }
            match node.children {
                Some(children) => worklist.extend(children),
                None => {
                    for (kind, entry) in node.entries() {
                        if entry.shape.intersects_rect(region) && seen.insert((kind, entry.index)) {
                            results.push((kind, entry.index));
                        }
                    }
                }
            }
        }

        results
    }

    /// All leaf nodes
    pub fn leaves(&self) -> impl Iterator<Item = &QuadNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// All nodes in arena order; index 0 is the root
    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Fixed world boundary
    pub fn boundary(&self) -> &Rect {
        &self.boundary
    }

    /// Per-kind leaf capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
