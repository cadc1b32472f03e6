//! Reusable UI pieces.

pub mod mind_map;
