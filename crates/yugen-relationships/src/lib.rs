//! The relationship graph.
//!
//! Edges are directed: A→B and B→A are two independent records, each unique
//! for its (source, target) pair. Changes recorded against an edge append to
//! its relationship log, which is never rewritten.

pub mod application;
pub mod domain;
