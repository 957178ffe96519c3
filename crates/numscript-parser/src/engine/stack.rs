//! Graph-structured parse stack.
//!
//! Frames are append-only: versions share their common prefix, and a frame
//! reached by several histories carries one link per history. Popping never
//! removes frames, it just yields the frames below.

use std::ops::Index;

use numscript_tables::StateId;

use crate::tree::GreenNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u32);

impl FrameId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge to the frame below, labelled with the node shifted or reduced.
#[derive(Clone, Debug)]
pub struct Link {
    pub prev: FrameId,
    pub node: GreenNode,
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub state: StateId,
    /// Byte offset after the last node on this frame.
    pub position: usize,
    pub error_cost: u32,
    /// Empty only for the bottom frame.
    pub links: Vec<Link>,
}

/// One way of popping: the frame left on top, and the popped nodes in
/// source order.
#[derive(Clone, Debug)]
pub struct PopPath {
    pub base: FrameId,
    pub nodes: Vec<GreenNode>,
}

#[derive(Debug, Default)]
pub struct FrameArena {
    frames: Vec<Frame>,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every frame. The arena keeps its allocation across parses.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Start a stack in `state` with nothing on it.
    pub fn bottom(&mut self, state: StateId) -> FrameId {
        self.alloc(Frame {
            state,
            position: 0,
            error_cost: 0,
            links: Vec::new(),
        })
    }

    pub fn push(&mut self, prev: FrameId, node: GreenNode, state: StateId) -> FrameId {
        let below = &self[prev];
        let frame = Frame {
            state,
            position: below.position + node.len(),
            error_cost: below.error_cost + node.error_cost(),
            links: vec![Link { prev, node }],
        };
        self.alloc(frame)
    }

    fn alloc(&mut self, frame: Frame) -> FrameId {
        let id = FrameId(self.frames.len() as u32);
        self.frames.push(frame);
        id
    }

    /// Fold the links of `other` into `keep`. Where both have a link to the
    /// same frame for the same symbol, `prefer(candidate, existing)` decides
    /// which node stays.
    pub fn merge(
        &mut self,
        keep: FrameId,
        other: FrameId,
        mut prefer: impl FnMut(&GreenNode, &GreenNode) -> bool,
    ) {
        if keep == other {
            return;
        }
        let incoming = self.frames[other.index()].links.clone();
        let links = &mut self.frames[keep.index()].links;
        for link in incoming {
            let twin = links
                .iter_mut()
                .find(|l| l.prev == link.prev && l.node.symbol() == link.node.symbol());
            match twin {
                Some(existing) => {
                    if prefer(&link.node, &existing.node) {
                        existing.node = link.node;
                    }
                }
                None => links.push(link),
            }
        }
    }

    /// Pop `count` non-extra nodes off `head`, along every history up to
    /// `limit` paths. Extras above the topmost popped node come along;
    /// extras below the deepest one stay.
    pub fn pop(&self, head: FrameId, count: usize, limit: usize) -> Vec<PopPath> {
        self.walk(head, Some(count), limit)
    }

    /// Pop everything down to the bottom frame.
    pub fn pop_all(&self, head: FrameId, limit: usize) -> Vec<PopPath> {
        self.walk(head, None, limit)
    }

    fn walk(&self, head: FrameId, count: Option<usize>, limit: usize) -> Vec<PopPath> {
        let mut paths = Vec::new();
        let mut pending = vec![(head, Vec::new(), 0usize)];
        while let Some((frame, mut nodes, seen)) = pending.pop() {
            let links = &self[frame].links;
            let finished = match count {
                Some(count) => seen == count,
                None => links.is_empty(),
            };
            if finished {
                nodes.reverse();
                paths.push(PopPath { base: frame, nodes });
                if paths.len() >= limit {
                    break;
                }
                continue;
            }
            // Reversed so the first link is explored first.
            for link in links.iter().rev() {
                let mut nodes = nodes.clone();
                nodes.push(link.node.clone());
                let seen = seen + usize::from(!link.node.is_extra());
                pending.push((link.prev, nodes, seen));
            }
        }
        paths
    }
}

impl Index<FrameId> for FrameArena {
    type Output = Frame;

    fn index(&self, id: FrameId) -> &Frame {
        &self.frames[id.index()]
    }
}
