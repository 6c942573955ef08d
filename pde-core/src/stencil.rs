use crate::config::EquationKind;

#[inline(always)]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// `left + right + up + down` around flat index `i` of a `w`-wide grid.
#[inline(always)]
pub fn neighbor_sum(f: &[f32], i: usize, w: usize) -> f32 {
    f[i - 1] + f[i + 1] + f[i - w] + f[i + w]
}

#[inline(always)]
pub fn laplacian(f: &[f32], i: usize, w: usize) -> f32 {
    neighbor_sum(f, i, w) - 4.0 * f[i]
}

/// Explicit update of one cell. Interior cells only for the spatial equations.
#[inline(always)]
pub fn explicit_cell(
    equation: EquationKind,
    previous: &[f32],
    current: &[f32],
    i: usize,
    w: usize,
    coeff: f32,
) -> f32 {
    match equation {
        EquationKind::Heat => clamp01(current[i] + coeff * laplacian(current, i, w)),
        EquationKind::Wave => {
            clamp01(2.0 * current[i] - previous[i] + coeff * laplacian(current, i, w))
        }
        EquationKind::ExponentialDecay => decay_cell(current[i], coeff),
    }
}

#[inline(always)]
pub fn implicit_rhs(equation: EquationKind, previous: &[f32], current: &[f32], i: usize) -> f32 {
    match equation {
        EquationKind::Wave => 2.0 * current[i] - previous[i],
        EquationKind::Heat | EquationKind::ExponentialDecay => current[i],
    }
}

/// One Jacobi update of `(I − r·L)u = rhs`, reading neighbours from the
/// previous iterate. Returned unclamped so the caller can measure the change.
#[inline(always)]
pub fn jacobi_cell(rhs: f32, iterate: &[f32], i: usize, w: usize, coeff: f32) -> f32 {
    (rhs + coeff * neighbor_sum(iterate, i, w)) / (1.0 + 4.0 * coeff)
}

#[inline(always)]
pub fn decay_cell(u: f32, coeff: f32) -> f32 {
    clamp01(u * coeff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // 3x3 grid, centre index 4
    const PEAK: [f32; 9] = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];

    #[test]
    fn laplacian_of_a_peak() {
        assert_eq!(laplacian(&PEAK, 4, 3), -4.0);
        assert_eq!(neighbor_sum(&PEAK, 4, 3), 0.0);
    }

    #[test]
    fn heat_cell_spreads_and_clamps() {
        let v = explicit_cell(EquationKind::Heat, &PEAK, &PEAK, 4, 3, 0.1);
        assert_relative_eq!(v, 0.6, epsilon = 1e-6);
        let v = explicit_cell(EquationKind::Heat, &PEAK, &PEAK, 4, 3, 0.5);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn wave_cell_uses_previous_level() {
        let flat = [0.5f32; 9];
        let prev = [0.4f32; 9];
        let v = explicit_cell(EquationKind::Wave, &prev, &flat, 4, 3, 0.25);
        assert_relative_eq!(v, 0.6, epsilon = 1e-6);
        assert_relative_eq!(implicit_rhs(EquationKind::Wave, &prev, &flat, 4), 0.6, epsilon = 1e-6);
        assert_eq!(implicit_rhs(EquationKind::Heat, &prev, &flat, 4), 0.5);
    }

    #[test]
    fn jacobi_fixed_point_of_uniform_field() {
        let flat = [0.3f32; 9];
        let v = jacobi_cell(0.3, &flat, 4, 3, 2.0);
        assert_relative_eq!(v, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn decay_cell_clamps() {
        assert_relative_eq!(decay_cell(0.5, 0.9), 0.45, epsilon = 1e-7);
        assert_eq!(decay_cell(0.5, -1.0), 0.0);
        assert_eq!(decay_cell(0.9, 2.0), 1.0);
    }
}
