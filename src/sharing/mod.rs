//! Share and assignment reconciliation across destination types.
//!
//! A share session picks a destination type, optionally a team whose
//! roles, stations or members become candidates, and reconciles the checked
//! nodes against the persisted baseline before committing the difference.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
