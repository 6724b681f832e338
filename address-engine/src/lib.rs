//! Address resolution and ranking engine for the campus carpool app.
//!
//! Turns a free-text, possibly incomplete address into a ranked list of
//! real-world candidates, biased toward the campus and its city, and
//! remembers the addresses the user has picked before.

pub mod cache;
pub mod controller;
pub mod domain;
pub mod geo;
pub mod recents;
pub mod search;
