//! Plain data shared by the savanna engine and its front ends.

pub mod data;

pub use data::location::Location;
pub use data::organism::{DeathCause, Flora, Health, Identity, Metabolism, Vitals};
pub use data::species::{Kingdom, Role, Sex, Species};
