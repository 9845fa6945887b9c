//! Village Jobs: a local marketplace matching job providers with seekers.
//!
//! The heart of the crate is [`marketplace`], the lifecycle engine that
//! governs job and application status transitions together with their
//! side-effect fan-out (notifications, rating recomputation). The remaining
//! modules supply the service plumbing: environment-driven configuration,
//! tracing setup, and the application-level error type.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
