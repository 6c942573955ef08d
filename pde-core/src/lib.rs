pub mod boundary;
pub mod codec;
pub mod coefficient;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod solver;
pub mod stencil;
pub mod stepper;

pub use boundary::BoundaryEnforcer;
pub use codec::{LuminanceImage, denormalize, luminance_rgba, normalize};
pub use coefficient::Stability;
pub use config::{
    BoundaryKind, BoundaryParams, EquationKind, PhysicalConstants, RelaxationParams, SchemeKind,
    SolverConfig,
};
pub use error::SolverError;
pub use field::ScalarField;
pub use grid::GridState;
pub use solver::Solver;
pub use stepper::{CpuStepper, StepParams, StepStats, Stepper, TexelStepper};
