use super::Stepper;
use crate::config::EquationKind;
use crate::field::ScalarField;
use crate::stencil;

#[derive(Clone, Copy, Debug, Default)]
pub struct CpuStepper;

impl Stepper for CpuStepper {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn is_gpu_path(&self) -> bool {
        false
    }

    fn explicit_pass(
        &self,
        equation: EquationKind,
        previous: &ScalarField,
        current: &ScalarField,
        next: &mut ScalarField,
        coeff: f32,
    ) {
        let (w, h) = (current.width(), current.height());
        let prev = previous.as_slice();
        let cur = current.as_slice();
        let out = next.as_mut_slice();

        if !equation.is_spatial() {
            for (o, &u) in out.iter_mut().zip(cur) {
                *o = stencil::decay_cell(u, coeff);
            }
            return;
        }

        for y in 1..(h - 1) {
            let row = y * w;
            for x in 1..(w - 1) {
                let i = row + x;
                out[i] = stencil::explicit_cell(equation, prev, cur, i, w, coeff);
            }
        }
    }

    fn jacobi_pass(
        &self,
        equation: EquationKind,
        previous: &ScalarField,
        current: &ScalarField,
        iterate: &ScalarField,
        next: &mut ScalarField,
        coeff: f32,
    ) -> f32 {
        let (w, h) = (current.width(), current.height());
        let prev = previous.as_slice();
        let cur = current.as_slice();
        let it = iterate.as_slice();
        let out = next.as_mut_slice();

        let mut max_change = 0.0f32;
        for y in 1..(h - 1) {
            let row = y * w;
            for x in 1..(w - 1) {
                let i = row + x;
                let rhs = stencil::implicit_rhs(equation, prev, cur, i);
                let v = stencil::jacobi_cell(rhs, it, i, w, coeff);
                let change = (v - it[i]).abs();
                if change > max_change {
                    max_change = change;
                }
                out[i] = stencil::clamp01(v);
            }
        }
        max_change
    }
}
