use tracing::{debug, info, warn};

use crate::boundary::BoundaryEnforcer;
use crate::codec::{self, LuminanceImage};
use crate::coefficient::{self, Stability};
use crate::config::{self, BoundaryKind, EquationKind, SchemeKind, SolverConfig};
use crate::error::SolverError;
use crate::field::ScalarField;
use crate::grid::GridState;
use crate::stepper::{CpuStepper, StepParams, StepStats, Stepper, TexelStepper};

/// Smallest grid a 5-point stencil can update.
pub const MIN_GRID: usize = 3;

fn select_stepper(use_gpu_path: bool) -> Box<dyn Stepper> {
    if use_gpu_path {
        info!(
            "Using texel backend ({} worker threads)",
            rayon::current_num_threads()
        );
        Box::new(TexelStepper)
    } else {
        debug!("Using sequential CPU backend");
        Box::new(CpuStepper)
    }
}

pub struct Solver {
    config: SolverConfig,
    seed: ScalarField,
    grid: GridState,
    /// Edge source of the fixed boundary policy.
    original: ScalarField,
    coeff: f32,
    stability: Stability,
    stepper: Box<dyn Stepper>,
    output: LuminanceImage,
    steps: u64,
    last_stats: StepStats,
}

impl Solver {
    pub fn new(image: &LuminanceImage, config: SolverConfig) -> Result<Self, SolverError> {
        Self::from_field(codec::normalize(image), config)
    }

    pub fn from_rgba(
        width: usize,
        height: usize,
        rgba: Vec<u8>,
        config: SolverConfig,
    ) -> Result<Self, SolverError> {
        let image = LuminanceImage::from_rgba(width, height, rgba)?;
        Self::new(&image, config)
    }

    pub fn from_field(seed: ScalarField, config: SolverConfig) -> Result<Self, SolverError> {
        let (width, height) = (seed.width(), seed.height());
        if width < MIN_GRID || height < MIN_GRID {
            return Err(SolverError::GridTooSmall { width, height });
        }
        config.validate()?;

        let grid = GridState::seeded(&seed);
        let original = seed.clone();
        let output = codec::denormalize(&seed);
        let stepper = select_stepper(config.use_gpu_path);

        let mut solver = Self {
            config,
            seed,
            grid,
            original,
            coeff: 0.0,
            stability: Stability::Stable,
            stepper,
            output,
            steps: 0,
            last_stats: StepStats::default(),
        };
        solver.recompute_coefficient();
        Ok(solver)
    }

    pub fn step(&mut self) -> &LuminanceImage {
        self.advance();
        codec::denormalize_into(self.grid.current(), &mut self.output);
        &self.output
    }

    /// Advance `count` time steps; only the final field is encoded.
    pub fn step_n(&mut self, count: u32) -> &LuminanceImage {
        for _ in 0..count {
            self.advance();
        }
        codec::denormalize_into(self.grid.current(), &mut self.output);
        &self.output
    }

    fn advance(&mut self) {
        let params = StepParams {
            equation: self.config.equation,
            scheme: self.config.scheme,
            coeff: self.coeff,
            relaxation: self.config.relaxation,
            boundary: BoundaryEnforcer::new(
                self.config.boundary,
                self.config.boundary_params,
                self.config.cell_spacing,
            ),
            original: &self.original,
        };

        let stats = self.stepper.step(self.grid.buffers(), &params);
        self.grid.rotate(self.config.equation);
        self.steps += 1;
        self.last_stats = stats;

        if !self.config.scheme.is_explicit() && self.config.equation.is_spatial() {
            debug!(
                step = self.steps,
                iterations = stats.iterations,
                max_change = stats.max_change,
                converged = stats.converged,
                "jacobi relaxation"
            );
        }
    }

    /// Discard all history and reseed from the initial field.
    ///
    /// The fixed-boundary snapshot is left untouched.
    pub fn reset(&mut self) {
        self.grid.reseed(&self.seed);
        self.steps = 0;
        self.last_stats = StepStats::default();
        codec::denormalize_into(self.grid.current(), &mut self.output);
    }

    /// Switch the edge policy. Selecting [`BoundaryKind::Fixed`] recaptures the
    /// snapshot from the current field.
    pub fn set_boundary_type(&mut self, kind: BoundaryKind) {
        self.config.boundary = kind;
        if kind == BoundaryKind::Fixed {
            self.original.copy_from(self.grid.current());
        }
    }

    pub fn set_pde_type(&mut self, kind: EquationKind) {
        self.config.equation = kind;
        self.recompute_coefficient();
    }

    pub fn set_scheme_type(&mut self, kind: SchemeKind) {
        self.config.scheme = kind;
        self.recompute_coefficient();
    }

    pub fn set_boundary_by_name(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(kind) => {
                self.set_boundary_type(kind);
                true
            }
            Err(e) => {
                warn!("{e}; keeping '{}'", self.config.boundary);
                false
            }
        }
    }

    pub fn set_pde_by_name(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(kind) => {
                self.set_pde_type(kind);
                true
            }
            Err(e) => {
                warn!("{e}; keeping '{}'", self.config.equation);
                false
            }
        }
    }

    pub fn set_scheme_by_name(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(kind) => {
                self.set_scheme_type(kind);
                true
            }
            Err(e) => {
                warn!("{e}; keeping '{}'", self.config.scheme);
                false
            }
        }
    }

    pub fn set_use_gpu_path(&mut self, use_gpu_path: bool) {
        if self.config.use_gpu_path != use_gpu_path {
            self.config.use_gpu_path = use_gpu_path;
            self.stepper = select_stepper(use_gpu_path);
        }
    }

    pub fn set_dt(&mut self, dt: f32) -> Result<(), SolverError> {
        config::validate_dt(dt)?;
        self.config.dt = dt;
        self.recompute_coefficient();
        Ok(())
    }

    pub fn set_cell_spacing(&mut self, cell_spacing: f32) -> Result<(), SolverError> {
        config::validate_cell_spacing(cell_spacing)?;
        self.config.cell_spacing = cell_spacing;
        self.recompute_coefficient();
        Ok(())
    }

    fn recompute_coefficient(&mut self) {
        let c = &self.config;
        self.coeff =
            coefficient::coefficient(c.equation, c.scheme, c.dt, c.cell_spacing, &c.constants);
        self.stability =
            coefficient::check_stability(c.equation, c.scheme, c.dt, self.coeff, &c.constants);
        if !self.stability.is_stable() {
            warn!("{}. The simulation may be unstable.", self.stability);
        }
    }

    // ---- Accessors ----

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn field(&self) -> &ScalarField {
        self.grid.current()
    }

    pub fn previous_field(&self) -> &ScalarField {
        self.grid.previous()
    }

    /// Snapshot used by the fixed boundary policy.
    pub fn original_state(&self) -> &ScalarField {
        &self.original
    }

    /// Image of the current field as of the last `step`/`reset`.
    pub fn output(&self) -> &LuminanceImage {
        &self.output
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    pub fn backend_name(&self) -> &'static str {
        self.stepper.name()
    }

    pub fn is_gpu_path(&self) -> bool {
        self.stepper.is_gpu_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(level: u8, n: usize) -> LuminanceImage {
        LuminanceImage::from_rgba(n, n, [level, level, level, 255].repeat(n * n)).unwrap()
    }

    #[test]
    fn rejects_degenerate_grids_and_steps() {
        let tiny = LuminanceImage::from_rgba(2, 5, vec![0; 40]).unwrap();
        assert_eq!(
            Solver::new(&tiny, SolverConfig::default()).err(),
            Some(SolverError::GridTooSmall {
                width: 2,
                height: 5
            })
        );

        let cfg = SolverConfig {
            dt: -1.0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            Solver::new(&uniform(10, 4), cfg),
            Err(SolverError::InvalidTimeStep(_))
        ));
    }

    #[test]
    fn setters_recompute_coefficient() {
        let mut s = Solver::new(&uniform(128, 4), SolverConfig::default()).unwrap();
        assert_relative_eq!(s.coefficient(), 50.0 * 0.1, epsilon = 1e-5);
        assert!(!s.stability().is_stable());

        s.set_dt(0.004).unwrap();
        assert_relative_eq!(s.coefficient(), 0.2, epsilon = 1e-6);
        assert!(s.stability().is_stable());

        s.set_cell_spacing(2.0).unwrap();
        assert_relative_eq!(s.coefficient(), 0.05, epsilon = 1e-6);

        s.set_pde_type(EquationKind::ExponentialDecay);
        assert_relative_eq!(s.coefficient(), 1.0 - 0.04, epsilon = 1e-6);
        s.set_scheme_type(SchemeKind::BackwardEuler);
        assert_relative_eq!(s.coefficient(), 1.0 / 1.04, epsilon = 1e-6);

        assert!(s.set_dt(0.0).is_err());
        assert_eq!(s.config().dt, 0.004);
    }

    #[test]
    fn invalid_names_are_ignored() {
        let mut s = Solver::new(&uniform(128, 4), SolverConfig::default()).unwrap();
        assert!(!s.set_boundary_by_name("cauchy"));
        assert!(!s.set_pde_by_name("laplace"));
        assert!(!s.set_scheme_by_name("crank-nicolson"));
        assert_eq!(s.config().boundary, BoundaryKind::Periodic);
        assert_eq!(s.config().equation, EquationKind::Heat);
        assert_eq!(s.config().scheme, SchemeKind::ForwardEuler);

        assert!(s.set_boundary_by_name("robin"));
        assert!(s.set_pde_by_name("wave"));
        assert!(s.set_scheme_by_name("backward-euler"));
        assert_eq!(s.config().boundary, BoundaryKind::Robin);
        assert_eq!(s.config().equation, EquationKind::Wave);
        assert_eq!(s.config().scheme, SchemeKind::BackwardEuler);
    }

    #[test]
    fn backend_switch_is_reported() {
        let mut s = Solver::new(&uniform(0, 3), SolverConfig::default()).unwrap();
        assert!(!s.is_gpu_path());
        assert_eq!(s.backend_name(), "cpu");
        s.set_use_gpu_path(true);
        assert!(s.is_gpu_path());
        assert!(s.config().use_gpu_path);
    }

    #[test]
    fn step_count_tracks_steps_and_reset() {
        let mut s = Solver::new(&uniform(200, 5), SolverConfig::default()).unwrap();
        s.step();
        s.step_n(3);
        assert_eq!(s.step_count(), 4);
        s.reset();
        assert_eq!(s.step_count(), 0);
        assert_eq!(s.output(), &uniform(200, 5));
    }
}
