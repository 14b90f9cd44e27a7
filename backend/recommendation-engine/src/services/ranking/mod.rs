//! Ranking Module
//!
//! Turns the three independent scoring signals into one ordering.
//!
//! # Workflow
//! 1. Standardize content, collaborative and popularity scores separately
//! 2. Combine them with the configured `BlendWeights`
//! 3. Stable-sort candidates by the blended key
//! 4. Hand the top window to the exploration layer for re-ranking

pub mod blender;

pub use blender::ScoreBlender;
