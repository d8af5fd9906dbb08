//! Release decision engine
//!
//! - `resolver` - builds the per-run [`crate::domain::ReleaseContext`]
//! - `reconcile` - PREPARE path: converge the release pull request
//! - `publish` - RELEASE path: tag, publish and mark done

pub mod publish;
pub mod reconcile;
pub mod resolver;

pub use publish::publish_release;
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use resolver::{ReleaseStateResolver, Resolution};
