//! Board and rule engine for the Torus Life simulation.
//!
//! This crate is the pure, synchronous bottom layer of the workspace:
//! a fixed-size toroidal board of binary cells and the transition rules
//! that compute the next board from the current one. It knows nothing
//! about events, state machines, or scheduling.
//!
//! # Modules
//!
//! - [`unit`] -- a single cell at a fixed coordinate with a life state
//! - [`generation`] -- a complete board snapshot with population bookkeeping
//! - [`rules`] -- toroidal neighbor counting and the alive/dead rules

pub mod generation;
pub mod rules;
pub mod unit;

pub use generation::{Generation, GridError};
pub use rules::{
    RuleCache, RuleError, RuleFn, alive_rule, count_alive_neighbors, dead_rule,
    neighbor_coordinates, rule_for,
};
pub use unit::{CellState, Unit};
