use super::Rect;

/// Index of a node inside a [`PackTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Free leaf
    Empty,
    /// Leaf consumed by an exact-size insert
    Filled,
    /// Internal node; both children are owned by this node alone
    Split { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, Copy)]
struct PackNode {
    rect: Rect,
    state: NodeState,
}

/// Binary-tree rectangle packer.
///
/// Every leaf is a free or filled region of the canvas. Inserting into a leaf
/// that is larger than the request splits it in two: the strip holding the
/// request and the remainder, which loses one pixel along the split axis as a
/// gutter. The tree lives in a flat arena; splitting appends two nodes and
/// turns the leaf into an internal node. Nodes are never removed or reused.
#[derive(Debug, Clone)]
pub struct PackTree {
    nodes: Vec<PackNode>,
}

impl PackTree {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            nodes: vec![PackNode {
                rect: Rect::new(0, 0, width, height),
                state: NodeState::Empty,
            }],
        }
    }

    /// Try to place a `width` x `height` rectangle.
    ///
    /// Returns `None` when there is no room anywhere in the tree. That is an
    /// expected outcome the fitter uses to reject a candidate canvas.
    pub fn insert(&mut self, width: u32, height: u32) -> Option<Rect> {
        self.insert_at(NodeId(0), width, height)
    }

    /// Number of arena nodes, for diagnostics
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn insert_at(&mut self, id: NodeId, width: u32, height: u32) -> Option<Rect> {
        let PackNode { rect, state } = self.nodes[id.0];

        match state {
            NodeState::Split { left, right } => self
                .insert_at(left, width, height)
                .or_else(|| self.insert_at(right, width, height)),
            NodeState::Filled => None,
            NodeState::Empty => {
                if width > rect.width || height > rect.height {
                    return None;
                }

                if width == rect.width && height == rect.height {
                    self.nodes[id.0].state = NodeState::Filled;
                    return Some(rect);
                }

                let slack_w = rect.width - width;
                let slack_h = rect.height - height;

                // The larger slack is never zero here, so the gutter cannot underflow
                let (left_rect, right_rect) = if slack_w > slack_h {
                    (
                        Rect::new(rect.x, rect.y, width, rect.height),
                        Rect::new(rect.x + width, rect.y, slack_w - 1, rect.height),
                    )
                } else {
                    (
                        Rect::new(rect.x, rect.y, rect.width, height),
                        Rect::new(rect.x, rect.y + height, rect.width, slack_h - 1),
                    )
                };

                let left = self.push(left_rect);
                let right = self.push(right_rect);
                self.nodes[id.0].state = NodeState::Split { left, right };

                self.insert_at(left, width, height)
            }
        }
    }

    fn push(&mut self, rect: Rect) -> NodeId {
        self.nodes.push(PackNode {
            rect,
            state: NodeState::Empty,
        });
        NodeId(self.nodes.len() - 1)
    }
}
