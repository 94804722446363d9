//! Configuration, input, and diagnostics layer of the gp3m2 application: a
//! Monte-Carlo transport simulation of a phase-space particle beam through a
//! multi-layer target.
//!
//! The transport core itself (tracking, geometry navigation, interaction
//! sampling) belongs to the external toolkit and is reached through the
//! [`run::TransportEngine`] seam. This crate owns everything around it:
//! the declarative detector geometry, physics-list selection, the
//! macro-particle input reader, the macro command interpreter, the
//! track-splitting hook, and the surface phase-space ntuple output.

pub mod biasing;
pub mod diagnostics;
pub mod domain;
pub mod geometry;
pub mod input;
pub mod materials;
pub mod physics;
pub mod run;
pub mod script;
pub mod source;
pub mod units;
