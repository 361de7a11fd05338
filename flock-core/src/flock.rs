use alloc::vec::Vec;
use core::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agent::{Agent, Neighbor};
use crate::config::{FlockConfig, UpdateOrder};
use crate::math;
use crate::neighbors::{BruteForce, NeighborIndex, UniformGrid};
use crate::vector::Vector2D;

/// Aggregate view of the flock, for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlockStats {
    pub agent_count: usize,
    pub centroid: Vector2D,
    pub mean_speed: f32,
    pub mean_neighbors: f32,
    /// Length of the mean heading: 1 when every agent faces the same way,
    /// near 0 when headings cancel out.
    pub polarization: f32,
}

/// Owns the agents and drives the simulation
pub struct Flock<I: NeighborIndex = BruteForce> {
    config: FlockConfig,
    agents: Vec<Agent>,
    index: I,
    ticks: u64,
    elapsed: f32,
    found: Vec<usize>,
    neighbors: Vec<Neighbor>,
    snapshot: Vec<Agent>,
}

impl Flock<BruteForce> {
    /// Spawns `population_size` agents from a seeded generator.
    pub fn initialize(config: FlockConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::with_rng(config, &mut rng)
    }

    pub fn with_rng<R: Rng>(config: FlockConfig, rng: &mut R) -> Self {
        let agents = spawn(&config, rng);
        Self::with_index(config, agents, BruteForce)
    }

    /// Builds a flock from hand-placed agents. The population size in
    /// `config` is ignored in favor of `agents.len()`.
    pub fn from_agents(config: FlockConfig, agents: Vec<Agent>) -> Self {
        Self::with_index(config, agents, BruteForce)
    }
}

impl Flock<UniformGrid> {
    /// Like [`Flock::initialize`], with a uniform grid sized to the detection
    /// range.
    pub fn initialize_with_grid(config: FlockConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let agents = spawn(&config, &mut rng);
        let grid = UniformGrid::new(config.params().detection_range);
        Self::with_index(config, agents, grid)
    }
}

impl<I: NeighborIndex> Flock<I> {
    pub fn with_index(config: FlockConfig, agents: Vec<Agent>, mut index: I) -> Self {
        index.rebuild(&agents);
        let capacity = agents.len();

        Self {
            config,
            agents,
            index,
            ticks: 0,
            elapsed: 0.0,
            found: Vec::with_capacity(capacity),
            neighbors: Vec::with_capacity(capacity),
            snapshot: Vec::new(),
        }
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds, the sum of every `dt` passed to [`Flock::tick`].
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances every agent by `dt` seconds, in creation order.
    pub fn tick(&mut self, dt: f32) {
        match self.config.params().update_order {
            UpdateOrder::Sequential => self.tick_sequential(dt),
            UpdateOrder::Simultaneous => self.tick_simultaneous(dt),
        }

        self.ticks += 1;
        self.elapsed += dt;
        log::trace!("tick {} done ({} agents, dt {})", self.ticks, self.agents.len(), dt);
    }

    fn tick_sequential(&mut self, dt: f32) {
        let range = self.config.params().detection_range;

        for i in 0..self.agents.len() {
            let center = self.agents[i].position;
            self.index.query(&self.agents, center, range, i, &mut self.found);
            self.neighbors.clear();
            self.neighbors
                .extend(self.found.iter().map(|&j| Neighbor::of(&self.agents[j])));

            let agent = &mut self.agents[i];
            let steering = agent.step(&self.neighbors, dt, &self.config);
            self.index.relocate(i, center, agent.position);

            log::trace!(
                "{} neighbors={} steering={:?} position={:?}",
                agent.name(),
                self.neighbors.len(),
                steering,
                agent.position
            );
        }
    }

    fn tick_simultaneous(&mut self, dt: f32) {
        let range = self.config.params().detection_range;
        self.snapshot.clone_from(&self.agents);
        self.index.rebuild(&self.snapshot);

        for i in 0..self.agents.len() {
            let center = self.snapshot[i].position;
            self.index.query(&self.snapshot, center, range, i, &mut self.found);
            self.neighbors.clear();
            self.neighbors
                .extend(self.found.iter().map(|&j| Neighbor::of(&self.snapshot[j])));

            self.agents[i].step(&self.neighbors, dt, &self.config);
        }

        self.index.rebuild(&self.agents);
    }

    pub fn stats(&self) -> FlockStats {
        let count = self.agents.len();
        if count == 0 {
            return FlockStats::default();
        }

        let mut position_sum = Vector2D::zero();
        let mut heading_sum = Vector2D::zero();
        let mut speed_sum = 0.0;
        let mut neighbor_sum = 0usize;

        for agent in &self.agents {
            position_sum += agent.position;
            heading_sum += agent.heading;
            speed_sum += agent.speed();
            neighbor_sum += agent.neighbor_count();
        }

        let n = count as f32;
        FlockStats {
            agent_count: count,
            centroid: position_sum / n,
            mean_speed: speed_sum / n,
            mean_neighbors: neighbor_sum as f32 / n,
            polarization: (heading_sum / n).magnitude(),
        }
    }
}

/// Samples the initial population: positions uniform over a disk of radius
/// `population_size * spawn_density`, headings uniform over the circle.
fn spawn<R: Rng>(config: &FlockConfig, rng: &mut R) -> Vec<Agent> {
    let params = config.params();
    let spawn_radius = params.population_size as f32 * params.spawn_density;

    log::debug!(
        "spawning {} agents within radius {}",
        params.population_size,
        spawn_radius
    );

    (0..params.population_size)
        .map(|id| {
            let distance = spawn_radius * math::sqrt(rng.gen_range(0.0f32..1.0));
            let position = Vector2D::from_angle(rng.gen_range(0.0..TAU)) * distance;
            let heading = Vector2D::from_angle(rng.gen_range(0.0..TAU));
            Agent::new(id, position, heading)
        })
        .collect()
}
