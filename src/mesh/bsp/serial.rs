//! Serial, stack-based implementation of BSP operations
//!
//! Tree depth is unbounded by construction, so every traversal keeps its own explicit
//! stack instead of recursing on the native one.

use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{
    BspLimits, BspOps, FirstPolygonStrategy, SplittingPlaneStrategy,
};
use crate::mesh::polygon::Polygon;
use log::warn;

/// Serial implementation of BSP operations
#[derive(Debug, Clone, Default)]
pub struct SerialBspOps<SP: SplittingPlaneStrategy = FirstPolygonStrategy> {
    splitting_strategy: SP,
    limits: BspLimits,
}

impl SerialBspOps<FirstPolygonStrategy> {
    pub fn new() -> Self {
        Self {
            splitting_strategy: FirstPolygonStrategy,
            limits: BspLimits::default(),
        }
    }
}

impl<SP: SplittingPlaneStrategy> SerialBspOps<SP> {
    pub fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
            limits: BspLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: BspLimits) -> Self {
        self.limits = limits;
        self
    }

    pub const fn limits(&self) -> BspLimits {
        self.limits
    }
}

impl<SP: SplittingPlaneStrategy> BspOps for SerialBspOps<SP> {
    fn invert(&self, node: &mut Node) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            // Flip all polygons and plane in this node
            current.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

            std::mem::swap(&mut current.front, &mut current.back);

            stack.extend(current.front.as_deref_mut());
            stack.extend(current.back.as_deref_mut());
        }
    }

    fn clip_polygons(&self, node: &Node, polygons: &[Polygon]) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(node, polygons.to_vec())];

        while let Some((current, polys)) = stack.pop() {
            // A node without a plane passes everything through
            let Some(plane) = current.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                // Coplanar pieces follow their orientation, like split_polygon itself does
                front_polys.extend(coplanar_front);
                back_polys.extend(coplanar_back);
                front_polys.append(&mut front_parts);
                back_polys.append(&mut back_parts);
            }

            match current.front.as_deref() {
                Some(front_node) if !front_polys.is_empty() => {
                    stack.push((front_node, front_polys))
                },
                Some(_) => {},
                None => result.extend(front_polys),
            }

            // No back subtree means "inside the solid": those pieces are dropped.
            if let Some(back_node) = current.back.as_deref() {
                if !back_polys.is_empty() {
                    stack.push((back_node, back_polys));
                }
            }
        }
        result
    }

    fn clip_to(&self, node: &mut Node, other: &Node) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            current.polygons = self.clip_polygons(other, &current.polygons);
            stack.extend(current.front.as_deref_mut());
            stack.extend(current.back.as_deref_mut());
        }
    }

    fn all_polygons(&self, node: &Node) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);

            stack.extend(current.front.as_deref());
            stack.extend(current.back.as_deref());
        }
        result
    }

    fn build(&self, node: &mut Node, polygons: &[Polygon]) {
        if polygons.is_empty() {
            return;
        }

        let mut stored = node.polygon_count();
        let mut truncated = false;
        let mut stack = vec![(node, polygons.to_vec(), 1usize)];

        while let Some((current, polys, depth)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let plane = current
                .plane
                .get_or_insert_with(|| self.splitting_strategy.pick_splitting_plane(&polys))
                .clone();

            if depth >= self.limits.max_depth || stored >= self.limits.max_polygons {
                truncated = true;
                stored += polys.len();
                current.polygons.extend(polys);
                continue;
            }

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                stored += coplanar_front.len() + coplanar_back.len();
                current.polygons.extend(coplanar_front);
                current.polygons.extend(coplanar_back);
                front.append(&mut front_parts);
                back.append(&mut back_parts);
            }

            // Children are created lazily, on first use
            if !front.is_empty() {
                let front_node: &mut Node =
                    current.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node, front, depth + 1));
            }

            if !back.is_empty() {
                let back_node: &mut Node =
                    current.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node, back, depth + 1));
            }
        }

        if truncated {
            warn!(
                "BSP build hit its limits (max_depth = {}, max_polygons = {}); \
                 some polygons were stored unsplit",
                self.limits.max_depth, self.limits.max_polygons
            );
        }
    }
}
