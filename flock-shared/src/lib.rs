use flock_core::{
    Agent, ConfigError, Flock, FlockConfig, FlockParams, FlockStats, NeighborIndex, UpdateOrder,
    Vector2D,
};
use serde::{Deserialize, Serialize};

/// A 2D point as written to settings and snapshot files
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrderSetting {
    #[default]
    Sequential,
    Simultaneous,
}

impl From<UpdateOrderSetting> for UpdateOrder {
    fn from(setting: UpdateOrderSetting) -> Self {
        match setting {
            UpdateOrderSetting::Sequential => UpdateOrder::Sequential,
            UpdateOrderSetting::Simultaneous => UpdateOrder::Simultaneous,
        }
    }
}

/// Flock settings as read from a JSON file. Missing fields take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub population_size: usize,
    pub max_speed: f32,
    pub drive_factor: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub containment_weight: f32,
    pub detection_range: f32,
    pub avoidance_range_mult: f32,
    pub containment_center: Position,
    pub containment_radius: f32,
    pub smooth_time: f32,
    pub spawn_density: f32,
    pub update_order: UpdateOrderSetting,
}

impl Default for FlockSettings {
    fn default() -> Self {
        let params = FlockParams::default();
        Self {
            population_size: params.population_size,
            max_speed: params.max_speed,
            drive_factor: params.drive_factor,
            alignment_weight: params.alignment_weight,
            cohesion_weight: params.cohesion_weight,
            separation_weight: params.separation_weight,
            containment_weight: params.containment_weight,
            detection_range: params.detection_range,
            avoidance_range_mult: params.avoidance_range_mult,
            containment_center: params.containment_center.into(),
            containment_radius: params.containment_radius,
            smooth_time: params.smooth_time,
            spawn_density: params.spawn_density,
            update_order: UpdateOrderSetting::Sequential,
        }
    }
}

impl FlockSettings {
    pub fn params(&self) -> FlockParams {
        FlockParams {
            population_size: self.population_size,
            max_speed: self.max_speed,
            drive_factor: self.drive_factor,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            separation_weight: self.separation_weight,
            containment_weight: self.containment_weight,
            detection_range: self.detection_range,
            avoidance_range_mult: self.avoidance_range_mult,
            containment_center: self.containment_center.into(),
            containment_radius: self.containment_radius,
            smooth_time: self.smooth_time,
            spawn_density: self.spawn_density,
            update_order: self.update_order.into(),
        }
    }

    /// Validates the settings into a flock configuration.
    pub fn to_config(&self) -> Result<FlockConfig, ConfigError> {
        FlockConfig::new(self.params())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// An RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: &Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Green for a lone agent, shading to red at 16 or more neighbors.
    pub fn for_density(density: f32) -> Rgb {
        Rgb::GREEN.lerp(&Rgb::RED, density)
    }
}

/// State of one agent at the time of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub id: usize,
    pub name: String,
    pub position: Position,
    pub heading: Position,
    pub speed: f32,
    pub neighbor_count: usize,
    pub color: Rgb,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name(),
            position: agent.position.into(),
            heading: agent.heading.into(),
            speed: agent.speed(),
            neighbor_count: agent.neighbor_count(),
            color: Rgb::for_density(agent.density()),
        }
    }
}

/// Flock-wide summary included in each snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusSummary {
    pub agent_count: usize,
    pub centroid: Position,
    pub mean_speed: f32,
    pub mean_neighbors: f32,
    pub polarization: f32,
}

impl From<FlockStats> for StatusSummary {
    fn from(stats: FlockStats) -> Self {
        Self {
            agent_count: stats.agent_count,
            centroid: stats.centroid.into(),
            mean_speed: stats.mean_speed,
            mean_neighbors: stats.mean_neighbors,
            polarization: stats.polarization,
        }
    }
}

/// The whole flock at one tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlockSnapshot {
    pub tick: u64,
    pub elapsed: f32,
    pub status: StatusSummary,
    pub agents: Vec<AgentSnapshot>,
}

impl FlockSnapshot {
    pub fn capture<I: NeighborIndex>(flock: &Flock<I>) -> Self {
        Self {
            tick: flock.ticks(),
            elapsed: flock.elapsed(),
            status: flock.stats().into(),
            agents: flock.agents().iter().map(AgentSnapshot::from).collect(),
        }
    }
}
