#![warn(missing_docs)]
//! Optrace specific error structures
use std::{error::Error, fmt::Display};

/// Optrace specific Result type
pub type OptResult<T> = std::result::Result<T, OptError>;

/// Errors that can be returned by various optrace functions.
///
/// Geometric non-events (a ray missing a surface, total internal reflection, a ray decaying below the
/// intensity threshold) are never reported as errors. These variants are reserved for misconfiguration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OptError {
    /// invalid construction parameters or trace configuration (e.g. missing entrance pupil)
    Config(String),
    /// errors while constructing curves, shapes or transforms
    Geometry(String),
    /// errors while assembling the scene graph of a `System` (unknown ids, wrong container, ...)
    System(String),
    /// runtime errors occuring during a ray trace
    Trace(String),
    /// errors reported by a material model
    Material(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(m) => {
                write!(f, "Config:{m}")
            }
            Self::Geometry(m) => {
                write!(f, "Geometry:{m}")
            }
            Self::System(m) => {
                write!(f, "System:{m}")
            }
            Self::Trace(m) => {
                write!(f, "Trace:{m}")
            }
            Self::Material(m) => {
                write!(f, "Material:{m}")
            }
            Self::Other(m) => write!(f, "Optrace Error:Other:{m}"),
        }
    }
}
impl Error for OptError {}

impl std::convert::From<String> for OptError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
