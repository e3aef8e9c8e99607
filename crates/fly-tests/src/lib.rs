//! Scenario and invariant test suite for the FLY emission simulator.
//!
//! Integration tests under `tests/` drive complete runs of every variant and
//! check the emission invariants row by row through [`helpers::CheckingSink`].

pub mod helpers;
