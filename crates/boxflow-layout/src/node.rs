//! Node storage.
//!
//! Nodes live in a generational arena owned by the tree. A [`NodeId`] pairs a
//! slot index with the slot's generation, so a handle to a removed node never
//! resolves to whatever later reuses the slot.

use std::fmt;
use std::ops::{Index, IndexMut};

use boxflow_core::{Rect, Sides};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cache::LayoutCache;
use crate::measure::Measure;
use crate::style::{Direction, Style};

/// Stable handle to a node in a [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index; unique among live nodes of one tree.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at allocation time.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "v{}", self.generation)?;
        }
        Ok(())
    }
}

pub(crate) type ChildList = SmallVec<[NodeId; 4]>;

/// Unrounded output of the layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ComputedLayout {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub direction: Direction,
    pub margin: Sides,
    pub border: Sides,
    pub padding: Sides,
    pub had_overflow: bool,
}

impl ComputedLayout {
    pub(crate) fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

pub(crate) struct Node {
    pub style: Style,
    pub children: ChildList,
    pub parent: Option<NodeId>,
    pub dirty: bool,
    pub has_new_layout: bool,
    pub measure: Option<Box<dyn Measure>>,
    pub context: Option<u64>,
    pub layout: ComputedLayout,
    /// Layout after pixel snapping; what read-back returns.
    pub rounded: Rect,
    pub cache: LayoutCache,
}

impl Node {
    pub(crate) fn new(style: Style) -> Self {
        Self {
            style,
            children: ChildList::new(),
            parent: None,
            dirty: true,
            has_new_layout: true,
            measure: None,
            context: None,
            layout: ComputedLayout::default(),
            rounded: Rect::default(),
            cache: LayoutCache::default(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("dirty", &self.dirty)
            .field("measured", &self.measure.is_some())
            .field("context", &self.context)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
    next_free: Option<u32>,
}

/// Generational slot storage for nodes.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    len: usize,
}

impl NodeArena {
    pub(crate) fn insert(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            self.free_head = slot.next_free.take();
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
            next_free: None,
        });
        NodeId::new(index, 0)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.next_free = self.free_head;
        self.free_head = Some(id.index);
        self.len -= 1;
        Some(node)
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Indexing is for handles the tree has already validated; a stale handle
/// here is an internal bug.
impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {id} reached the layout pass"),
        }
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node handle {id} reached the layout pass"),
        }
    }
}
