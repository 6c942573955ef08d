use std::fmt;

use crate::config::{EquationKind, PhysicalConstants, SchemeKind};

// heat r = c·dt/Δx², wave r = (c·dt/Δx)², decay r = 1 − λ·dt (FE) or 1/(1 + λ·dt) (BE)
pub fn coefficient(
    equation: EquationKind,
    scheme: SchemeKind,
    dt: f32,
    cell_spacing: f32,
    constants: &PhysicalConstants,
) -> f32 {
    match equation {
        EquationKind::Heat => constants.c * dt / (cell_spacing * cell_spacing),
        EquationKind::Wave => {
            let courant = constants.c * dt / cell_spacing;
            courant * courant
        }
        EquationKind::ExponentialDecay => match scheme {
            SchemeKind::ForwardEuler => 1.0 - constants.lambda * dt,
            SchemeKind::BackwardEuler => 1.0 / (1.0 + constants.lambda * dt),
        },
    }
}

/// Outcome of the stability check. Violations are diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stability {
    Stable,
    HeatBoundExceeded { coeff: f32 },
    CflExceeded { courant: f32 },
    DecayBoundExceeded { dt: f32, limit: f32 },
}

impl Stability {
    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => f.write_str("stable"),
            Self::HeatBoundExceeded { coeff } => write!(
                f,
                "heat stability condition not met ({coeff} > 0.5); consider the backward-euler scheme"
            ),
            Self::CflExceeded { courant } => write!(
                f,
                "wave CFL condition not met ({courant} > 1); consider the backward-euler scheme"
            ),
            Self::DecayBoundExceeded { dt, limit } => write!(
                f,
                "exponential decay stability condition not met (dt {dt} > 2/lambda = {limit})"
            ),
        }
    }
}

/// Check the known stability bound for `equation` under `scheme`.
///
/// Only explicit schemes are checked; `coeff` must come from [`coefficient`]
/// with the same inputs.
pub fn check_stability(
    equation: EquationKind,
    scheme: SchemeKind,
    dt: f32,
    coeff: f32,
    constants: &PhysicalConstants,
) -> Stability {
    if !scheme.is_explicit() {
        return Stability::Stable;
    }
    match equation {
        EquationKind::Heat if coeff > 0.5 => Stability::HeatBoundExceeded { coeff },
        // coeff is already the squared Courant number
        EquationKind::Wave if coeff > 1.0 => Stability::CflExceeded {
            courant: coeff.sqrt(),
        },
        EquationKind::ExponentialDecay if dt > 2.0 / constants.lambda => {
            Stability::DecayBoundExceeded {
                dt,
                limit: 2.0 / constants.lambda,
            }
        }
        _ => Stability::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const K: PhysicalConstants = PhysicalConstants {
        c: 50.0,
        alpha: 10.0,
        lambda: 10.0,
    };

    #[test]
    fn heat_coefficient_scales_with_dt_over_dx_squared() {
        let r = coefficient(EquationKind::Heat, SchemeKind::ForwardEuler, 0.002, 1.0, &K);
        assert_relative_eq!(r, 0.1, epsilon = 1e-6);
        let r = coefficient(EquationKind::Heat, SchemeKind::ForwardEuler, 0.002, 2.0, &K);
        assert_relative_eq!(r, 0.025, epsilon = 1e-6);
    }

    #[test]
    fn wave_coefficient_is_squared_courant_number() {
        let r = coefficient(EquationKind::Wave, SchemeKind::ForwardEuler, 0.01, 1.0, &K);
        assert_relative_eq!(r, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn decay_coefficient_depends_on_scheme() {
        let fe = coefficient(
            EquationKind::ExponentialDecay,
            SchemeKind::ForwardEuler,
            0.01,
            1.0,
            &K,
        );
        let be = coefficient(
            EquationKind::ExponentialDecay,
            SchemeKind::BackwardEuler,
            0.01,
            1.0,
            &K,
        );
        assert_relative_eq!(fe, 0.9, epsilon = 1e-6);
        assert_relative_eq!(be, 1.0 / 1.1, epsilon = 1e-6);
    }

    #[test]
    fn explicit_bounds_are_flagged() {
        let heat = check_stability(EquationKind::Heat, SchemeKind::ForwardEuler, 0.1, 5.0, &K);
        assert_eq!(heat, Stability::HeatBoundExceeded { coeff: 5.0 });

        let wave = check_stability(EquationKind::Wave, SchemeKind::ForwardEuler, 0.1, 4.0, &K);
        assert_eq!(wave, Stability::CflExceeded { courant: 2.0 });

        let decay = check_stability(
            EquationKind::ExponentialDecay,
            SchemeKind::ForwardEuler,
            0.3,
            -2.0,
            &K,
        );
        assert!(matches!(decay, Stability::DecayBoundExceeded { .. }));
        assert!(decay.to_string().contains("2/lambda"));
    }

    #[test]
    fn implicit_schemes_and_small_steps_are_stable() {
        let s = check_stability(EquationKind::Heat, SchemeKind::BackwardEuler, 0.1, 5.0, &K);
        assert!(s.is_stable());
        let s = check_stability(EquationKind::Heat, SchemeKind::ForwardEuler, 0.01, 0.5, &K);
        assert!(s.is_stable());
        let s = check_stability(
            EquationKind::ExponentialDecay,
            SchemeKind::ForwardEuler,
            0.2,
            -1.0,
            &K,
        );
        assert!(s.is_stable());
    }
}
