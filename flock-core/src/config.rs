use core::fmt;

use crate::vector::Vector2D;

/// How agents observe each other within a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOrder {
    /// Agents are stepped in place in creation order. Agents stepped later in a
    /// tick see the already-updated state of agents stepped earlier.
    #[default]
    Sequential,
    /// Every agent reads a snapshot taken at the start of the tick.
    Simultaneous,
}

/// Largest population a flock accepts.
pub const MAX_POPULATION: usize = 10_000;

/// Tunable parameters for a flock, as supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockParams {
    pub population_size: usize,
    pub max_speed: f32,
    pub drive_factor: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub containment_weight: f32,
    /// Neighbor search radius
    pub detection_range: f32,
    /// Fraction of `detection_range` used as the separation radius
    pub avoidance_range_mult: f32,
    pub containment_center: Vector2D,
    pub containment_radius: f32,
    /// Approximate settle time of the cohesion smoothing, in seconds
    pub smooth_time: f32,
    /// Spawn disk radius per agent
    pub spawn_density: f32,
    pub update_order: UpdateOrder,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_speed: 10.0,
            drive_factor: 10.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_weight: 1.0,
            containment_weight: 1.0,
            detection_range: 3.0,
            avoidance_range_mult: 0.5,
            containment_center: Vector2D::ZERO,
            containment_radius: 35.0,
            smooth_time: 0.85,
            spawn_density: 0.08,
            update_order: UpdateOrder::Sequential,
        }
    }
}

/// Reasons a set of [`FlockParams`] is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyPopulation,
    NonFinite {
        field: &'static str,
    },
    NonPositive {
        field: &'static str,
        value: f32,
    },
    Negative {
        field: &'static str,
        value: f32,
    },
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPopulation => write!(f, "population size must be at least 1"),
            ConfigError::NonFinite { field } => write!(f, "{} must be a finite number", field),
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be greater than zero (got {})", field, value)
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{} must not be negative (got {})", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{} must be within [{}, {}] (got {})",
                field, min, max, value
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validated flock configuration, read-only for the lifetime of a flock.
///
/// The squared speed limit and squared avoidance range are derived once here,
/// so they always agree with the parameters they come from.
#[derive(Debug, Clone, PartialEq)]
pub struct FlockConfig {
    params: FlockParams,
    square_max_speed: f32,
    square_avoidance_range: f32,
}

impl FlockConfig {
    pub fn new(params: FlockParams) -> Result<Self, ConfigError> {
        if params.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if params.population_size > MAX_POPULATION {
            return Err(ConfigError::OutOfRange {
                field: "population_size",
                value: params.population_size as f32,
                min: 1.0,
                max: MAX_POPULATION as f32,
            });
        }

        positive("max_speed", params.max_speed)?;
        positive("drive_factor", params.drive_factor)?;
        positive("detection_range", params.detection_range)?;
        positive("containment_radius", params.containment_radius)?;
        positive("smooth_time", params.smooth_time)?;
        positive("spawn_density", params.spawn_density)?;

        non_negative("alignment_weight", params.alignment_weight)?;
        non_negative("cohesion_weight", params.cohesion_weight)?;
        non_negative("separation_weight", params.separation_weight)?;
        non_negative("containment_weight", params.containment_weight)?;

        finite("avoidance_range_mult", params.avoidance_range_mult)?;
        if !(0.0..=1.0).contains(&params.avoidance_range_mult) {
            return Err(ConfigError::OutOfRange {
                field: "avoidance_range_mult",
                value: params.avoidance_range_mult,
                min: 0.0,
                max: 1.0,
            });
        }

        finite("containment_center.x", params.containment_center.x)?;
        finite("containment_center.y", params.containment_center.y)?;

        let avoidance_range = params.detection_range * params.avoidance_range_mult;

        Ok(Self {
            params,
            square_max_speed: params.max_speed * params.max_speed,
            square_avoidance_range: avoidance_range * avoidance_range,
        })
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn square_max_speed(&self) -> f32 {
        self.square_max_speed
    }

    pub fn square_avoidance_range(&self) -> f32 {
        self.square_avoidance_range
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let config = FlockConfig::new(FlockParams::default()).unwrap();
        assert_eq!(config.square_max_speed(), 100.0);
        // (3.0 * 0.5)^2
        assert_eq!(config.square_avoidance_range(), 2.25);
    }

    #[test]
    fn test_empty_population_rejected() {
        let params = FlockParams {
            population_size: 0,
            ..FlockParams::default()
        };
        assert_eq!(FlockConfig::new(params), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn test_oversized_population_rejected() {
        let at_limit = FlockParams {
            population_size: MAX_POPULATION,
            ..FlockParams::default()
        };
        assert!(FlockConfig::new(at_limit).is_ok());

        for population_size in [MAX_POPULATION + 1, usize::MAX] {
            let params = FlockParams {
                population_size,
                ..FlockParams::default()
            };
            assert!(matches!(
                FlockConfig::new(params),
                Err(ConfigError::OutOfRange {
                    field: "population_size",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let params = FlockParams {
            detection_range: 0.0,
            ..FlockParams::default()
        };
        assert_eq!(
            FlockConfig::new(params),
            Err(ConfigError::NonPositive {
                field: "detection_range",
                value: 0.0
            })
        );

        let params = FlockParams {
            containment_radius: -4.0,
            ..FlockParams::default()
        };
        assert!(matches!(
            FlockConfig::new(params),
            Err(ConfigError::NonPositive {
                field: "containment_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let params = FlockParams {
            separation_weight: -1.0,
            ..FlockParams::default()
        };
        assert!(matches!(
            FlockConfig::new(params),
            Err(ConfigError::Negative {
                field: "separation_weight",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_weights_allowed() {
        let params = FlockParams {
            alignment_weight: 0.0,
            cohesion_weight: 0.0,
            separation_weight: 0.0,
            containment_weight: 0.0,
            avoidance_range_mult: 0.0,
            ..FlockParams::default()
        };
        let config = FlockConfig::new(params).unwrap();
        assert_eq!(config.square_avoidance_range(), 0.0);
    }

    #[test]
    fn test_avoidance_mult_out_of_range() {
        let params = FlockParams {
            avoidance_range_mult: 1.5,
            ..FlockParams::default()
        };
        assert!(matches!(
            FlockConfig::new(params),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let params = FlockParams {
            max_speed: f32::NAN,
            ..FlockParams::default()
        };
        assert_eq!(
            FlockConfig::new(params),
            Err(ConfigError::NonFinite { field: "max_speed" })
        );
    }
}
