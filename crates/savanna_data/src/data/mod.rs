//! Core data structures for the savanna simulation.

pub mod location;
pub mod organism;
pub mod species;
