//! Core algorithms and services for Feedpulse

pub mod catalog;
pub mod churn;
pub mod distribution;
pub mod generator;
pub mod hasher;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod tracker;

pub use catalog::CatalogStore;
pub use churn::{ChurnModel, HeuristicChurnModel};
pub use distribution::{RaritySampler, UnlockProgress};
pub use generator::generate_batch;
pub use hasher::behavior_seed;
pub use rng::SeededRng;
pub use scheduler::InterventionScheduler;
pub use session::{EventSink, FeedSession, SessionConfig, ViewOutcome};
pub use tracker::RollingTracker;
