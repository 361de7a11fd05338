use alloc::format;
use alloc::string::String;

use crate::behavior;
use crate::config::FlockConfig;
use crate::vector::Vector2D;

/// What an agent sees of a neighbor during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Vector2D,
    pub heading: Vector2D,
}

impl Neighbor {
    pub fn of(agent: &Agent) -> Self {
        Self {
            position: agent.position,
            heading: agent.heading,
        }
    }
}

/// The four unweighted steering contributions computed in one step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub alignment: Vector2D,
    pub cohesion: Vector2D,
    pub separation: Vector2D,
    pub containment: Vector2D,
}

impl Steering {
    pub fn weighted_sum(&self, config: &FlockConfig) -> Vector2D {
        let params = config.params();
        self.alignment * params.alignment_weight
            + self.cohesion * params.cohesion_weight
            + self.separation * params.separation_weight
            + self.containment * params.containment_weight
    }
}

/// A single flocking agent
///
/// `steering` and the cohesion smoothing state persist across ticks; each step
/// adds onto whatever the previous step left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: usize,
    pub position: Vector2D,
    pub heading: Vector2D,
    pub steering: Vector2D,
    smoothing_velocity: Vector2D,
    neighbor_count: usize,
}

impl Agent {
    /// Creates an agent at rest. `heading` is normalized; a zero heading
    /// falls back to +y.
    pub fn new(id: usize, position: Vector2D, heading: Vector2D) -> Self {
        let heading = if heading.is_zero() {
            Vector2D::new(0.0, 1.0)
        } else {
            heading.normalize()
        };

        Self {
            id,
            position,
            heading,
            steering: Vector2D::zero(),
            smoothing_velocity: Vector2D::zero(),
            neighbor_count: 0,
        }
    }

    pub fn with_steering(mut self, steering: Vector2D) -> Self {
        self.steering = steering;
        self
    }

    pub fn name(&self) -> String {
        format!("Agent {}", self.id)
    }

    pub fn smoothing_velocity(&self) -> Vector2D {
        self.smoothing_velocity
    }

    /// Number of neighbors seen in the most recent step.
    pub fn neighbor_count(&self) -> usize {
        self.neighbor_count
    }

    pub fn density(&self) -> f32 {
        behavior::density_ratio(self.neighbor_count)
    }

    pub fn speed(&self) -> f32 {
        self.steering.magnitude()
    }

    /// Computes this step's steering contributions.
    ///
    /// Advances the cohesion smoothing state, so call it once per step.
    pub fn steer(
        &mut self,
        neighbors: &[Neighbor],
        dt: f32,
        config: &FlockConfig,
    ) -> Steering {
        let params = config.params();

        Steering {
            alignment: behavior::alignment(self.heading, neighbors),
            cohesion: behavior::cohesion(
                self.position,
                self.heading,
                neighbors,
                &mut self.smoothing_velocity,
                params.smooth_time,
                dt,
            ),
            separation: behavior::separation(
                self.position,
                neighbors,
                config.square_avoidance_range(),
            ),
            containment: behavior::containment(
                self.position,
                params.containment_center,
                params.containment_radius,
            ),
        }
    }

    /// Folds `steering` into the accumulator and moves the agent.
    pub fn integrate(&mut self, steering: &Steering, dt: f32, config: &FlockConfig) {
        let params = config.params();

        self.steering += steering.weighted_sum(config);
        self.steering *= params.drive_factor;

        if self.steering.square_magnitude() > config.square_max_speed() {
            self.steering = self.steering.normalize() * params.max_speed;
        }

        if !self.steering.is_zero() {
            self.heading = self.steering.normalize();
        }

        self.position += self.steering * dt;
    }

    /// Runs one full update against the given neighbor snapshot.
    ///
    /// `neighbors` must not contain this agent.
    pub fn step(
        &mut self,
        neighbors: &[Neighbor],
        dt: f32,
        config: &FlockConfig,
    ) -> Steering {
        let steering = self.steer(neighbors, dt, config);
        self.integrate(&steering, dt, config);
        self.neighbor_count = neighbors.len();
        steering
    }
}
