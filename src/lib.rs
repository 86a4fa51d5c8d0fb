//! This is the documentation for the **optrace** software package, a geometric ray tracing engine for optical
//! assemblies such as lenses, mirrors and telescopes.
//!
//! An optical [`System`](system::System) is assembled from [`Element`](nodes::Element)s: sources, stops, refracting or
//! reflecting surfaces and image planes, optionally grouped. Each surface combines a [`Curve`](curve::Curve) (the
//! surface height) with a [`Shape`](shape::Shape) (the clear aperture). A [`Tracer`](trace::Tracer) propagates the rays
//! emitted by the sources through the system, either sequentially or non-sequentially, and records the complete ray
//! tree in a [`TraceResult`](trace::TraceResult).
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod curve;
pub mod distribution;
pub mod error;
pub mod line;
pub mod material;
pub mod nodes;
pub mod ray;
pub mod refractive_index;
pub mod shape;
pub mod system;
pub mod trace;
pub mod utils;

pub use system::System;
pub use trace::{TraceResult, Tracer};
