//! Ray tracing of an optical [`System`](crate::system::System)
//!
//! A trace is configured by [`TraceParams`], performed by a [`Tracer`] and produces a [`TraceResult`] containing the
//! complete ray tree.
mod params;
mod result;
mod tracer;

pub use params::{IntensityMode, TraceMode, TraceParams};
pub use result::TraceResult;
pub use tracer::Tracer;
