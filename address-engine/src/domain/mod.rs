//! Core value types for address resolution.
//!
//! These are the types that flow through the whole pipeline: a validated
//! [`Coordinate`], the structured fields a reverse geocoder returns
//! ([`StructuredAddress`]), and the candidate types the engine emits
//! ([`AddressCandidate`], [`RankedCandidate`]).

mod address;
mod coordinate;

pub use address::{AddressCandidate, RankedCandidate, StructuredAddress};
pub use coordinate::{Coordinate, CoordinateError};
