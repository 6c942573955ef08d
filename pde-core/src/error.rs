use std::error::Error;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// Width or height is below the 3-cell minimum a 5-point stencil needs.
    GridTooSmall {
        width: usize,
        height: usize,
    },
    /// The RGBA buffer length does not match `width * height * 4`.
    BufferSizeMismatch {
        expected: usize,
        actual: usize,
    },
    InvalidCellSpacing(f32),
    InvalidTimeStep(f32),
    UnknownEquation(String),
    UnknownBoundary(String),
    UnknownScheme(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall { width, height } => {
                write!(f, "grid {width}x{height} is too small (need at least 3x3)")
            }
            Self::BufferSizeMismatch { expected, actual } => {
                write!(f, "rgba buffer has {actual} bytes, expected {expected}")
            }
            Self::InvalidCellSpacing(v) => write!(f, "cell spacing must be > 0, got {v}"),
            Self::InvalidTimeStep(v) => write!(f, "dt must be > 0, got {v}"),
            Self::UnknownEquation(name) => write!(f, "unknown equation type '{name}'"),
            Self::UnknownBoundary(name) => write!(f, "unknown boundary type '{name}'"),
            Self::UnknownScheme(name) => write!(f, "unknown scheme type '{name}'"),
        }
    }
}

impl Error for SolverError {}
