mod cpu;
mod texel;

pub use cpu::CpuStepper;
pub use texel::TexelStepper;

use crate::boundary::BoundaryEnforcer;
use crate::config::{EquationKind, RelaxationParams, SchemeKind};
use crate::field::ScalarField;
use crate::grid::StepBuffers;

#[derive(Clone, Copy, Debug)]
pub struct StepParams<'a> {
    pub equation: EquationKind,
    pub scheme: SchemeKind,
    pub coeff: f32,
    pub relaxation: RelaxationParams,
    pub boundary: BoundaryEnforcer,
    /// Edge source of the fixed policy.
    pub original: &'a ScalarField,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepStats {
    /// Relaxation passes used; 1 for explicit updates.
    pub iterations: u32,
    /// Largest per-cell change of the last relaxation pass; 0 for explicit updates.
    pub max_change: f32,
    /// False when the relaxation ran out of passes above tolerance.
    pub converged: bool,
}

impl StepStats {
    fn explicit() -> Self {
        Self {
            iterations: 1,
            max_change: 0.0,
            converged: true,
        }
    }
}

pub trait Stepper: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_gpu_path(&self) -> bool;

    /// Write the explicit update into every cell the equation updates:
    /// interior cells for heat and wave, the whole grid for decay.
    fn explicit_pass(
        &self,
        equation: EquationKind,
        previous: &ScalarField,
        current: &ScalarField,
        next: &mut ScalarField,
        coeff: f32,
    );

    /// One Jacobi pass over interior cells: read neighbours from `iterate`,
    /// write clamped values into `next`, return the largest unclamped change
    /// against `iterate`.
    fn jacobi_pass(
        &self,
        equation: EquationKind,
        previous: &ScalarField,
        current: &ScalarField,
        iterate: &ScalarField,
        next: &mut ScalarField,
        coeff: f32,
    ) -> f32;

    /// Fill `buffers.next` with the next time level. Does not rotate.
    fn step(&self, buffers: StepBuffers<'_>, params: &StepParams<'_>) -> StepStats {
        let StepBuffers {
            previous,
            current,
            next,
            scratch,
        } = buffers;

        if !params.equation.is_spatial() {
            // no spatial coupling, both schemes are folded into coeff
            self.explicit_pass(params.equation, previous, current, next, params.coeff);
            return StepStats::explicit();
        }

        match params.scheme {
            SchemeKind::ForwardEuler => {
                self.explicit_pass(params.equation, previous, current, next, params.coeff);
                params.boundary.apply(next, params.original);
                StepStats::explicit()
            }
            SchemeKind::BackwardEuler => relax(self, previous, current, next, scratch, params),
        }
    }
}

fn relax<S: Stepper + ?Sized>(
    stepper: &S,
    previous: &ScalarField,
    current: &ScalarField,
    next: &mut ScalarField,
    scratch: &mut ScalarField,
    params: &StepParams<'_>,
) -> StepStats {
    let max_iterations = params.relaxation.max_iterations(params.equation);
    let tolerance = params.relaxation.tolerance;

    next.copy_from(current);
    let mut stats = StepStats::default();

    for _ in 0..max_iterations {
        scratch.copy_from(next);
        let max_change = stepper.jacobi_pass(
            params.equation,
            previous,
            current,
            scratch,
            next,
            params.coeff,
        );
        // the next pass reads edge cells too
        params.boundary.apply(next, params.original);

        stats.iterations += 1;
        stats.max_change = max_change;
        if max_change < tolerance {
            stats.converged = true;
            break;
        }
    }
    stats
}
