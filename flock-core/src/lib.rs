#![cfg_attr(not(feature = "std"), no_std)]

//! Boids flocking in two dimensions.
//!
//! A [`Flock`] owns a population of [`Agent`]s and steps them once per
//! [`Flock::tick`]. Each agent looks up its neighbors, computes alignment,
//! cohesion, separation and containment, and folds them into a steering
//! accumulator that persists from one tick to the next.

extern crate alloc;

pub mod agent;
pub mod behavior;
pub mod config;
pub mod flock;
mod math;
pub mod neighbors;
pub mod vector;

pub use agent::{Agent, Neighbor, Steering};
pub use config::{ConfigError, FlockConfig, FlockParams, UpdateOrder, MAX_POPULATION};
pub use flock::{Flock, FlockStats};
pub use neighbors::{BruteForce, NeighborIndex, UniformGrid};
pub use vector::Vector2D;
