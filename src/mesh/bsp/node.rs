//! BSP tree node data structure

use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;

/// A BSP tree node, containing polygons plus optional front/back subtrees.
///
/// Each node exclusively owns its children. Trees are built per boolean operation and
/// dropped afterwards; nothing is shared between trees.
#[derive(Debug, Default)]
pub struct Node {
    /// Splitting plane for this node *or* **None** for an empty node.
    pub plane: Option<Plane>,

    /// Subtree in the *front* half‑space.
    pub front: Option<Box<Node>>,

    /// Subtree in the *back* half‑space.
    pub back: Option<Box<Node>>,

    /// Polygons that lie on `plane` (after the node has been built).
    pub polygons: Vec<Polygon>,
}

impl Node {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Number of polygons stored in the whole subtree.
    pub fn polygon_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += node.polygons.len();
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        count
    }

    /// Length of the longest root-to-node path (a lone root has depth 1).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.front.as_deref().map(|n| (n, depth + 1)));
            stack.extend(node.back.as_deref().map(|n| (n, depth + 1)));
        }
        max_depth
    }
}

// Copy iteratively; the derived clone would recurse once per level.
impl Clone for Node {
    fn clone(&self) -> Self {
        let shallow = |node: &Node| Node {
            plane: node.plane.clone(),
            front: None,
            back: None,
            polygons: node.polygons.clone(),
        };

        let mut root = shallow(self);
        {
            let mut stack: Vec<(&Node, &mut Node)> = vec![(self, &mut root)];
            while let Some((source, target)) = stack.pop() {
                let Node { front, back, .. } = target;
                if let Some(source_front) = source.front.as_deref() {
                    let child: &mut Node = front.insert(Box::new(shallow(source_front)));
                    stack.push((source_front, child));
                }
                if let Some(source_back) = source.back.as_deref() {
                    let child: &mut Node = back.insert(Box::new(shallow(source_back)));
                    stack.push((source_back, child));
                }
            }
        }
        root
    }
}

// Tear down iteratively; the derived drop would recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}
