//! Orgwork: organization hierarchy, work task lifecycle and share
//! reconciliation.
//!
//! This crate models the entities of a collaborative organization (people,
//! companies and the teams nested beneath them), tracks the drafts and
//! submitted tasks of a work through their lifecycle buckets, and reconciles
//! share assignments against their persisted baseline.
//!
//! # Architecture
//!
//! Orgwork follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores)
//!
//! # Modules
//!
//! - [`target`]: Entity hierarchy, identities, membership and authority trees
//! - [`work`]: Draft, launched and completed task buckets of one work
//! - [`sharing`]: Checked-set reconciliation per destination type
//! - [`config`]: Typed runtime configuration
//! - [`telemetry`]: Tracing subscriber installation

pub mod config;
mod ids;
pub mod sharing;
pub mod target;
pub mod telemetry;
pub mod work;
