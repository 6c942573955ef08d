//! Per-texel backend mirroring the fragment-shader formulation.
//!
//! Each pass reads only its input buffers and writes each output texel
//! exactly once, which is the contract of a render-to-texture ping-pong.
//! Texels of a pass are independent, so they are evaluated on the rayon pool.

use rayon::prelude::*;

use super::Stepper;
use crate::config::EquationKind;
use crate::field::ScalarField;
use crate::stencil;

#[derive(Clone, Copy, Debug, Default)]
pub struct TexelStepper;

#[inline(always)]
fn is_interior(i: usize, w: usize, h: usize) -> bool {
    let (x, y) = (i % w, i / w);
    x > 0 && y > 0 && x < w - 1 && y < h - 1
}

impl Stepper for TexelStepper {
    fn name(&self) -> &'static str {
        "texel"
    }

    fn is_gpu_path(&self) -> bool {
        true
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
        let spatial = equation.is_spatial();

        next.as_mut_slice()
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, texel)| {
                if !spatial || is_interior(i, w, h) {
                    *texel = stencil::explicit_cell(equation, prev, cur, i, w, coeff);
                }
            });
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

        next.as_mut_slice()
            .par_iter_mut()
            .enumerate()
            .map(|(i, texel)| {
                if !is_interior(i, w, h) {
                    return 0.0;
                }
                let rhs = stencil::implicit_rhs(equation, prev, cur, i);
                let v = stencil::jacobi_cell(rhs, it, i, w, coeff);
                *texel = stencil::clamp01(v);
                (v - it[i]).abs()
            })
            .reduce(|| 0.0, f32::max)
    }
}
