//! Feature implementations for focusdot.
//!
//! This module contains:
//! - Focus tracking (session state machine, proximity, clock)
//! - Gaze estimation from camera frames
//! - Ambient tone generation

pub mod ambient;
pub mod focus;
pub mod gaze;
