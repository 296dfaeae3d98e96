//! Freerun locomotion core
//!
//! This crate is the locomotion state machine that drives a physically
//! simulated humanoid actor through a level: standing, running, falling,
//! sliding, and two procedural traversal moves (vaulting a low obstacle,
//! climbing a tall ledge). The host embeds an [`locomotion::Actor`], feeds it
//! one input snapshot per simulation step, and calls `tick(dt)` at a fixed
//! rate.

pub mod config;
pub mod locomotion;
