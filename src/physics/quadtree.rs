//! Barnes-Hut quadtree over node positions, rebuilt every tick.

use crate::util::{jiggle, pair_seed};

use super::state::{NodeState, Vec2};

const QUADTREE_LEAF_CAPACITY: usize = 12;
const QUADTREE_MAX_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug)]
pub(crate) struct QuadBounds {
    pub(crate) center: Vec2,
    pub(crate) half_extent: f64,
}

impl QuadBounds {
    fn from_points(points: &[Vec2]) -> Option<Self> {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let center = (min + max) * 0.5;
        let span_x = (max.x - min.x).max(1.0);
        let span_y = (max.y - min.y).max(1.0);
        let half_extent = (span_x.max(span_y) * 0.5) + 1.0;

        Some(Self {
            center,
            half_extent,
        })
    }

    fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => Vec2::new(-quarter, -quarter),
            1 => Vec2::new(quarter, -quarter),
            2 => Vec2::new(-quarter, quarter),
            _ => Vec2::new(quarter, quarter),
        };

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        let right = point.x >= self.center.x;
        let upper = point.y >= self.center.y;
        match (right, upper) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    fn side_length(self) -> f64 {
        self.half_extent * 2.0
    }

    fn distance_sq_to(self, other: Self) -> f64 {
        let reach = self.half_extent + other.half_extent;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        (dx * dx) + (dy * dy)
    }
}

struct QuadNode {
    bounds: QuadBounds,
    centroid: Vec2,
    mass: f64,
    indices: Vec<usize>,
    children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    fn build(bounds: QuadBounds, indices: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let mut centroid = Vec2::zeros();
        for &index in &indices {
            centroid += positions[index];
        }

        let mass = indices.len() as f64;
        if mass > 0.0 {
            centroid /= mass;
        }

        let mut node = Self {
            bounds,
            centroid,
            mass,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant_for(positions[index])].push(index);
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            node.children[quadrant] = Some(Box::new(Self::build(
                bounds.child(quadrant),
                bucket,
                positions,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }

    fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}

/// Distance limits and opening ratio for the many-body sum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManyBodyParams {
    pub theta: f64,
    pub distance_min_sq: f64,
    pub distance_max_sq: f64,
}

impl Default for ManyBodyParams {
    fn default() -> Self {
        Self {
            theta: 0.9,
            distance_min_sq: 1.0,
            distance_max_sq: f64::INFINITY,
        }
    }
}

/// One cell of the tree, for overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadtreeCell {
    pub center: Vec2,
    pub half_extent: f64,
    pub depth: usize,
    pub is_leaf: bool,
}

/// Snapshot of positions partitioned into a quadtree. Indices match the node
/// slice it was built from.
#[derive(Default)]
pub struct SpatialIndex {
    root: Option<QuadNode>,
    positions: Vec<Vec2>,
    seeds: Vec<u64>,
}

impl SpatialIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(nodes: &[NodeState]) -> Self {
        let positions = nodes.iter().map(|node| node.position).collect::<Vec<_>>();
        let seeds = nodes.iter().map(|node| node.seed).collect::<Vec<_>>();
        let root = QuadBounds::from_points(&positions).map(|bounds| {
            let indices = (0..positions.len()).collect::<Vec<_>>();
            QuadNode::build(bounds, indices, &positions, 0)
        });

        Self {
            root,
            positions,
            seeds,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Approximate `sum(mass * delta / distance^2)` over every other node,
    /// `delta` pointing from `index` toward the other body.
    pub fn accumulate(&self, index: usize, params: &ManyBodyParams) -> Vec2 {
        let mut total = Vec2::zeros();
        if let Some(root) = &self.root
            && index < self.positions.len()
        {
            self.accumulate_node(root, index, params, &mut total);
        }
        total
    }

    fn accumulate_node(
        &self,
        node: &QuadNode,
        index: usize,
        params: &ManyBodyParams,
        total: &mut Vec2,
    ) {
        if node.mass <= 0.0 {
            return;
        }

        let point = self.positions[index];

        if node.is_leaf() {
            for &other in &node.indices {
                if other == index {
                    continue;
                }
                let mut delta = self.positions[other] - point;
                if delta.x == 0.0 {
                    delta.x = jiggle(pair_seed(self.seeds[index], self.seeds[other], 0));
                }
                if delta.y == 0.0 {
                    delta.y = jiggle(pair_seed(self.seeds[index], self.seeds[other], 1));
                }
                *total += inverse_square(delta, 1.0, params);
            }
            return;
        }

        let delta = node.centroid - point;
        let distance_sq = delta.norm_squared();
        let can_approximate = !node.bounds.contains(point)
            && distance_sq > 0.0
            && (node.bounds.side_length() / distance_sq.sqrt()) < params.theta;

        if can_approximate {
            *total += inverse_square(delta, node.mass, params);
            return;
        }

        for child in node.children() {
            self.accumulate_node(child, index, params, total);
        }
    }

    /// Every unordered pair whose cells lie within `max_distance`, a superset
    /// of the pairs actually that close.
    pub fn candidate_pairs(&self, max_distance: f64, pairs: &mut Vec<(usize, usize)>) {
        pairs.clear();
        let Some(root) = &self.root else {
            return;
        };
        if !max_distance.is_finite() || max_distance < 0.0 {
            return;
        }
        collect_pairs(root, root, true, max_distance * max_distance, pairs);
    }

    pub fn cells(&self) -> Vec<QuadtreeCell> {
        let mut cells = Vec::new();
        if let Some(root) = &self.root {
            collect_cells(root, 0, &mut cells);
        }
        cells
    }
}

fn inverse_square(delta: Vec2, mass: f64, params: &ManyBodyParams) -> Vec2 {
    let mut distance_sq = delta.norm_squared();
    if distance_sq >= params.distance_max_sq {
        return Vec2::zeros();
    }
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    if distance_sq <= 0.0 {
        return Vec2::zeros();
    }
    delta * (mass / distance_sq)
}

fn collect_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    max_distance_sq: f64,
    pairs: &mut Vec<(usize, usize)>,
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > max_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    pairs.push((from, to));
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    pairs.push((from, to));
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_deref() else {
                continue;
            };

            collect_pairs(child_a, child_a, true, max_distance_sq, pairs);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_deref() else {
                    continue;
                };
                collect_pairs(child_a, child_b, false, max_distance_sq, pairs);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            collect_pairs(child, node_b, false, max_distance_sq, pairs);
        }
    } else {
        for child in node_b.children() {
            collect_pairs(node_a, child, false, max_distance_sq, pairs);
        }
    }
}

fn collect_cells(node: &QuadNode, depth: usize, cells: &mut Vec<QuadtreeCell>) {
    cells.push(QuadtreeCell {
        center: node.bounds.center,
        half_extent: node.bounds.half_extent,
        depth,
        is_leaf: node.is_leaf(),
    });

    for child in node.children() {
        collect_cells(child, depth + 1, cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize, spacing: f64) -> Vec<NodeState> {
        let side = (count as f64).sqrt().ceil() as usize;
        (0..count)
            .map(|index| {
                let x = (index % side) as f64 * spacing;
                let y = (index / side) as f64 * spacing;
                NodeState::new(format!("n{index}"), x, y)
            })
            .collect()
    }

    fn exact_sum(nodes: &[NodeState], index: usize, params: &ManyBodyParams) -> Vec2 {
        let mut total = Vec2::zeros();
        for (other, node) in nodes.iter().enumerate() {
            if other != index {
                total += inverse_square(node.position - nodes[index].position, 1.0, params);
            }
        }
        total
    }

    #[test]
    fn single_node_has_no_force() {
        let nodes = vec![NodeState::new("only", 3.0, 4.0)];
        let index = SpatialIndex::build(&nodes);
        assert_eq!(index.accumulate(0, &ManyBodyParams::default()), Vec2::zeros());
    }

    #[test]
    fn empty_index_is_harmless() {
        let index = SpatialIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.accumulate(0, &ManyBodyParams::default()), Vec2::zeros());
        let mut pairs = vec![(9, 9)];
        index.candidate_pairs(10.0, &mut pairs);
        assert!(pairs.is_empty());
    }

    #[test]
    fn zero_theta_matches_exact_sum() {
        let nodes = grid(200, 7.0);
        let index = SpatialIndex::build(&nodes);
        let params = ManyBodyParams {
            theta: 0.0,
            ..ManyBodyParams::default()
        };
        for probe in [0, 57, 199] {
            let approx = index.accumulate(probe, &params);
            let exact = exact_sum(&nodes, probe, &params);
            assert!((approx - exact).norm() < 1e-6, "{approx:?} vs {exact:?}");
        }
    }

    #[test]
    fn default_theta_stays_close_to_exact_sum() {
        let nodes = grid(400, 5.0);
        let index = SpatialIndex::build(&nodes);
        let params = ManyBodyParams::default();
        let approx = index.accumulate(0, &params);
        let exact = exact_sum(&nodes, 0, &params);
        let relative = (approx - exact).norm() / exact.norm();
        assert!(relative < 0.1, "relative error {relative}");
    }

    #[test]
    fn coincident_nodes_get_finite_jitter() {
        let nodes = vec![NodeState::new("a", 5.0, 5.0), NodeState::new("b", 5.0, 5.0)];
        let index = SpatialIndex::build(&nodes);
        let force = index.accumulate(0, &ManyBodyParams::default());
        assert!(force.x.is_finite() && force.y.is_finite());
        assert!(force.norm() > 0.0);
        assert_eq!(force, index.accumulate(0, &ManyBodyParams::default()));
    }

    #[test]
    fn distance_max_cuts_off_far_bodies() {
        let nodes = vec![NodeState::new("a", 0.0, 0.0), NodeState::new("b", 100.0, 0.0)];
        let index = SpatialIndex::build(&nodes);
        let params = ManyBodyParams {
            distance_max_sq: 50.0 * 50.0,
            ..ManyBodyParams::default()
        };
        assert_eq!(index.accumulate(0, &params), Vec2::zeros());
    }

    #[test]
    fn candidate_pairs_cover_all_close_pairs() {
        let nodes = grid(300, 4.0);
        let index = SpatialIndex::build(&nodes);
        let mut pairs = Vec::new();
        index.candidate_pairs(9.0, &mut pairs);

        let mut normalized = pairs
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect::<Vec<_>>();
        normalized.sort_unstable();
        let before = normalized.len();
        normalized.dedup();
        assert_eq!(before, normalized.len(), "pairs must be unique");

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if (nodes[i].position - nodes[j].position).norm() <= 9.0 {
                    assert!(normalized.binary_search(&(i, j)).is_ok(), "missing ({i}, {j})");
                }
            }
        }
        assert!(normalized.len() < nodes.len() * (nodes.len() - 1) / 2);
    }

    #[test]
    fn cells_start_at_the_root() {
        let nodes = grid(64, 10.0);
        let cells = SpatialIndex::build(&nodes).cells();
        assert_eq!(cells[0].depth, 0);
        assert!(!cells[0].is_leaf);
        assert!(cells.iter().any(|cell| cell.is_leaf && cell.depth > 0));
    }
}
