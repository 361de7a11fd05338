//! Neighbor lookup.
//!
//! A [`NeighborIndex`] answers "which agents are within `radius` of this
//! point". Every implementation must return the same set: all agents other
//! than the excluded one whose squared distance to the center is at most
//! `radius²`, in ascending index order. Keeping the order fixed means the
//! floating point sums in the steering rules do not depend on the index used.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::agent::Agent;
use crate::math;
use crate::vector::Vector2D;

/// Spatial range query over the flock
pub trait NeighborIndex {
    /// Re-indexes every agent from scratch.
    fn rebuild(&mut self, agents: &[Agent]);

    /// Tells the index that agent `index` moved from `from` to `to`.
    fn relocate(&mut self, index: usize, from: Vector2D, to: Vector2D);

    /// Writes into `out` the indices of agents within `radius` of `center`,
    /// skipping `exclude`. `out` is cleared first.
    fn query(
        &self,
        agents: &[Agent],
        center: Vector2D,
        radius: f32,
        exclude: usize,
        out: &mut Vec<usize>,
    );
}

/// Linear scan over all agents. O(n) per query, O(n²) per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl NeighborIndex for BruteForce {
    fn rebuild(&mut self, _agents: &[Agent]) {}

    fn relocate(&mut self, _index: usize, _from: Vector2D, _to: Vector2D) {}

    fn query(
        &self,
        agents: &[Agent],
        center: Vector2D,
        radius: f32,
        exclude: usize,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        let square_radius = radius * radius;
        out.extend(
            agents
                .iter()
                .enumerate()
                .filter(|&(i, agent)| {
                    i != exclude && agent.position.square_distance(&center) <= square_radius
                })
                .map(|(i, _)| i),
        );
    }
}

type Cell = (i32, i32);

/// Uniform grid of square cells keyed by integer coordinates.
///
/// With the cell side equal to the query radius a lookup touches a 3x3 block
/// of cells. The grid is unbounded, so agents that drift far out are still
/// found.
#[derive(Debug, Clone)]
pub struct UniformGrid {
    cell_size: f32,
    cells: BTreeMap<Cell, Vec<usize>>,
}

impl UniformGrid {
    /// `cell_size` should normally be the detection range. Non-positive sizes
    /// fall back to 1.
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 && cell_size.is_finite() {
            cell_size
        } else {
            1.0
        };

        Self {
            cell_size,
            cells: BTreeMap::new(),
        }
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    fn cell_of(&self, position: Vector2D) -> Cell {
        (
            math::floor(position.x / self.cell_size) as i32,
            math::floor(position.y / self.cell_size) as i32,
        )
    }

    fn insert(&mut self, index: usize, position: Vector2D) {
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(index);
    }

    fn remove(&mut self, index: usize, position: Vector2D) {
        let cell = self.cell_of(position);
        if let Some(members) = self.cells.get_mut(&cell) {
            if let Some(slot) = members.iter().position(|&i| i == index) {
                members.swap_remove(slot);
            }
            if members.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }
}

impl NeighborIndex for UniformGrid {
    fn rebuild(&mut self, agents: &[Agent]) {
        self.cells.clear();
        for (i, agent) in agents.iter().enumerate() {
            self.insert(i, agent.position);
        }
    }

    fn relocate(&mut self, index: usize, from: Vector2D, to: Vector2D) {
        if self.cell_of(from) != self.cell_of(to) {
            self.remove(index, from);
            self.insert(index, to);
        }
    }

    fn query(
        &self,
        agents: &[Agent],
        center: Vector2D,
        radius: f32,
        exclude: usize,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        let square_radius = radius * radius;
        let reach = Vector2D::new(radius, radius);
        let (min_x, min_y) = self.cell_of(center - reach);
        let (max_x, max_y) = self.cell_of(center + reach);

        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                let Some(members) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                out.extend(members.iter().copied().filter(|&i| {
                    i != exclude && agents[i].position.square_distance(&center) <= square_radius
                }));
            }
        }

        out.sort_unstable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents_at(points: &[(f32, f32)]) -> Vec<Agent> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Agent::new(i, Vector2D::new(x, y), Vector2D::new(1.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_brute_force_excludes_self_and_far_agents() {
        let agents = agents_at(&[(0.0, 0.0), (1.0, 0.0), (5.0, 0.0), (0.0, -2.0)]);
        let mut out = Vec::new();

        BruteForce.query(&agents, agents[0].position, 3.0, 0, &mut out);

        assert_eq!(out, vec![1, 3]);
    }

    #[test]
    fn test_query_boundary_is_inclusive() {
        let agents = agents_at(&[(0.0, 0.0), (3.0, 0.0)]);
        let mut out = Vec::new();

        BruteForce.query(&agents, agents[0].position, 3.0, 0, &mut out);
        assert_eq!(out, vec![1]);

        let mut grid = UniformGrid::new(3.0);
        grid.rebuild(&agents);
        grid.query(&agents, agents[0].position, 3.0, 0, &mut out);
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_grid_matches_brute_force() {
        let mut points = Vec::new();
        for i in 0..60 {
            let f = i as f32;
            points.push(((f * 1.37) % 17.0 - 8.0, (f * 2.91) % 13.0 - 6.0));
        }
        let agents = agents_at(&points);

        let mut grid = UniformGrid::new(3.0);
        grid.rebuild(&agents);

        let mut expected = Vec::new();
        let mut actual = Vec::new();
        for i in 0..agents.len() {
            BruteForce.query(&agents, agents[i].position, 3.0, i, &mut expected);
            grid.query(&agents, agents[i].position, 3.0, i, &mut actual);
            assert_eq!(expected, actual, "mismatch for agent {}", i);
        }
    }

    #[test]
    fn test_grid_radius_larger_than_cell() {
        let agents = agents_at(&[(0.0, 0.0), (4.5, 0.0), (-4.0, 3.0), (9.0, 9.0)]);
        let mut grid = UniformGrid::new(1.0);
        grid.rebuild(&agents);

        let mut out = Vec::new();
        grid.query(&agents, Vector2D::zero(), 5.0, 0, &mut out);

        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn test_grid_relocate() {
        let mut agents = agents_at(&[(0.0, 0.0), (10.0, 10.0)]);
        let mut grid = UniformGrid::new(3.0);
        grid.rebuild(&agents);

        let from = agents[1].position;
        agents[1].position = Vector2D::new(1.0, 1.0);
        grid.relocate(1, from, agents[1].position);

        let mut out = Vec::new();
        grid.query(&agents, agents[0].position, 3.0, 0, &mut out);
        assert_eq!(out, vec![1]);
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn test_grid_handles_negative_coordinates() {
        let agents = agents_at(&[(-0.5, -0.5), (0.5, 0.5), (-2.9, 0.0)]);
        let mut grid = UniformGrid::new(3.0);
        grid.rebuild(&agents);

        let mut out = Vec::new();
        grid.query(&agents, agents[0].position, 3.0, 0, &mut out);

        assert_eq!(out, vec![1, 2]);
    }
}
