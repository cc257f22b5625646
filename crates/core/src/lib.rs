//! Heuristic face detection and cosmetic camera effects.
//!
//! Areas are split into `domain` (traits and value types) and
//! `infrastructure` (adapters). `pipeline` wires them into use cases.

pub mod assets;
pub mod camera;
pub mod cosmetics;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod video;
