use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SolverError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EquationKind {
    /// Diffusion: `∂u/∂t = c∇²u`.
    #[default]
    Heat,
    /// Wave propagation: `∂²u/∂t² = c²∇²u`.
    Wave,
    /// Exponential decay: `du/dt = −λu`.
    ExponentialDecay,
}

impl EquationKind {
    pub fn is_three_level(self) -> bool {
        matches!(self, Self::Wave)
    }

    /// Whether the update couples neighbouring cells (and so needs edge handling).
    pub fn is_spatial(self) -> bool {
        !matches!(self, Self::ExponentialDecay)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BoundaryKind {
    #[default]
    Periodic,
    Dirichlet,
    Zero,
    Fixed,
    Neumann,
    Reflective,
    /// Mixed condition `αu + β∂u/∂n = γ`.
    Robin,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchemeKind {
    #[default]
    ForwardEuler,
    BackwardEuler,
}

impl SchemeKind {
    pub fn is_explicit(self) -> bool {
        matches!(self, Self::ForwardEuler)
    }
}

macro_rules! named_kind {
    ($ty:ident, $err:ident, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }

            /// Parse `name`, falling back to the default variant with a warning.
            pub fn parse_or_default(name: &str) -> Self {
                name.parse().unwrap_or_else(|e: SolverError| {
                    let fallback = Self::default();
                    warn!("{e}; falling back to '{}'", fallback.as_str());
                    fallback
                })
            }
        }

        impl FromStr for $ty {
            type Err = SolverError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(SolverError::$err(s.to_string())),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<String> for $ty {
            fn from(name: String) -> Self {
                Self::parse_or_default(&name)
            }
        }

        impl From<$ty> for String {
            fn from(kind: $ty) -> String {
                kind.as_str().to_string()
            }
        }
    };
}

named_kind!(EquationKind, UnknownEquation, {
    Heat => "heat",
    Wave => "wave",
    ExponentialDecay => "exponential-decay",
});

named_kind!(BoundaryKind, UnknownBoundary, {
    Periodic => "periodic",
    Dirichlet => "dirichlet",
    Zero => "zero",
    Fixed => "fixed",
    Neumann => "neumann",
    Reflective => "reflective",
    Robin => "robin",
});

named_kind!(SchemeKind, UnknownScheme, {
    ForwardEuler => "forward-euler",
    BackwardEuler => "backward-euler",
});

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Wave speed; also used as the diffusion constant of the heat equation.
    pub c: f32,
    /// Thermal diffusivity. Kept for completeness, the heat coefficient uses `c`.
    pub alpha: f32,
    pub lambda: f32,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            c: 50.0,
            alpha: 10.0,
            lambda: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryParams {
    pub dirichlet_value: f32,
    pub neumann_derivative: f32,
    /// Robin `α` (weight of `u`).
    pub robin_alpha: f32,
    /// Robin `β` (weight of `∂u/∂n`).
    pub robin_beta: f32,
    /// Robin `γ` (right-hand side).
    pub robin_gamma: f32,
}

impl Default for BoundaryParams {
    fn default() -> Self {
        Self {
            dirichlet_value: 0.5,
            neumann_derivative: 1.0,
            robin_alpha: 1.0,
            robin_beta: 1.0,
            robin_gamma: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationParams {
    pub heat_max_iterations: u32,
    /// Maximum passes for implicit wave. Lower than heat to keep frames responsive.
    pub wave_max_iterations: u32,
    pub tolerance: f32,
}

impl Default for RelaxationParams {
    fn default() -> Self {
        Self {
            heat_max_iterations: 50,
            wave_max_iterations: 25,
            tolerance: 1e-4,
        }
    }
}

impl RelaxationParams {
    pub fn max_iterations(&self, equation: EquationKind) -> u32 {
        match equation {
            EquationKind::Wave => self.wave_max_iterations,
            EquationKind::Heat | EquationKind::ExponentialDecay => self.heat_max_iterations,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub cell_spacing: f32,
    pub dt: f32,
    pub equation: EquationKind,
    pub boundary: BoundaryKind,
    pub scheme: SchemeKind,
    /// Select the per-texel (GPU-equivalent) stepping backend.
    pub use_gpu_path: bool,
    pub constants: PhysicalConstants,
    pub boundary_params: BoundaryParams,
    pub relaxation: RelaxationParams,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            cell_spacing: 1.0,
            dt: 0.1,
            equation: EquationKind::default(),
            boundary: BoundaryKind::default(),
            scheme: SchemeKind::default(),
            use_gpu_path: false,
            constants: PhysicalConstants::default(),
            boundary_params: BoundaryParams::default(),
            relaxation: RelaxationParams::default(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        validate_cell_spacing(self.cell_spacing)?;
        validate_dt(self.dt)
    }
}

pub(crate) fn validate_cell_spacing(v: f32) -> Result<(), SolverError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidCellSpacing(v))
    }
}

pub(crate) fn validate_dt(v: f32) -> Result<(), SolverError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidTimeStep(v))
    }
}
