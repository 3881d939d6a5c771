//! stackref: symbol-aware stack traces.
//!
//! A trace is split into lines, each line is matched against the runtime's
//! frame shape, and every frame's method signature is resolved against an
//! ordered list of program models. The driver hands the result to a sink
//! piece by piece: plain text, symbol fragments, and source paths.
//!
//! The engine ([`writer`], [`frame`], [`lines`], [`signature`], [`resolver`],
//! [`fragments`]) is generic over [`model::SemanticModel`]. [`program`] and
//! [`csharp`] supply a concrete model built from C# source.

pub mod commands;
pub mod config;
pub mod csharp;
pub mod diagnostics;
pub mod error;
pub mod fragments;
pub mod frame;
pub mod lines;
pub mod model;
pub mod program;
pub mod projects;
pub mod render;
pub mod resolver;
pub mod signature;
pub mod typename;
pub mod types;
pub mod watch;
pub mod workspace;
pub mod writer;
