use crate::config::{BoundaryKind, BoundaryParams};
use crate::field::ScalarField;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Low,
    High,
}

#[derive(Clone, Copy, Debug)]
pub struct EdgeInputs {
    pub side: Side,
    pub adjacent: f32,
    pub wrapped: f32,
    pub original: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct BoundaryEnforcer {
    pub kind: BoundaryKind,
    pub params: BoundaryParams,
    pub cell_spacing: f32,
}

impl BoundaryEnforcer {
    pub fn new(kind: BoundaryKind, params: BoundaryParams, cell_spacing: f32) -> Self {
        Self {
            kind,
            params,
            cell_spacing,
        }
    }

    #[inline]
    pub fn edge_value(&self, e: EdgeInputs) -> f32 {
        let p = &self.params;
        match self.kind {
            BoundaryKind::Periodic => e.wrapped,
            BoundaryKind::Dirichlet => p.dirichlet_value,
            BoundaryKind::Zero => 0.0,
            BoundaryKind::Fixed => e.original,
            BoundaryKind::Neumann => {
                let step = self.cell_spacing * p.neumann_derivative;
                match e.side {
                    Side::Low => e.adjacent - step,
                    Side::High => e.adjacent + step,
                }
            }
            BoundaryKind::Reflective => e.adjacent,
            BoundaryKind::Robin => {
                (p.robin_beta * e.adjacent + p.robin_gamma) / (p.robin_beta + p.robin_alpha)
            }
        }
    }

    /// Rewrite the outer ring of `next`: left/right columns first, then the
    /// top/bottom rows, which win at the four corners.
    ///
    /// `original` is only read by [`BoundaryKind::Fixed`] and must have the same
    /// shape as `next`.
    pub fn apply(&self, next: &mut ScalarField, original: &ScalarField) {
        debug_assert!(next.same_shape(original));
        let (w, h) = (next.width(), next.height());

        for y in 0..h {
            let left = self.edge_value(EdgeInputs {
                side: Side::Low,
                adjacent: next.get(1, y),
                wrapped: next.get(w - 2, y),
                original: original.get(0, y),
            });
            next.set(0, y, left);

            let right = self.edge_value(EdgeInputs {
                side: Side::High,
                adjacent: next.get(w - 2, y),
                wrapped: next.get(1, y),
                original: original.get(w - 1, y),
            });
            next.set(w - 1, y, right);
        }

        for x in 0..w {
            let top = self.edge_value(EdgeInputs {
                side: Side::Low,
                adjacent: next.get(x, 1),
                wrapped: next.get(x, h - 2),
                original: original.get(x, 0),
            });
            next.set(x, 0, top);

            let bottom = self.edge_value(EdgeInputs {
                side: Side::High,
                adjacent: next.get(x, h - 2),
                wrapped: next.get(x, 1),
                original: original.get(x, h - 1),
            });
            next.set(x, h - 1, bottom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn enforcer(kind: BoundaryKind) -> BoundaryEnforcer {
        BoundaryEnforcer::new(kind, BoundaryParams::default(), 1.0)
    }

    /// 5x4 field with distinct values `(y * 5 + x) / 100`.
    fn ramp() -> ScalarField {
        let data = (0..20).map(|i| i as f32 / 100.0).collect();
        ScalarField::from_vec(5, 4, data)
    }

    fn ring(f: &ScalarField) -> Vec<(usize, usize)> {
        let (w, h) = (f.width(), f.height());
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| x == 0 || y == 0 || x == w - 1 || y == h - 1)
            .collect()
    }

    #[test]
    fn periodic_wraps_and_column_pass_wins_corners() {
        let mut f = ramp();
        let orig = f.clone();
        enforcer(BoundaryKind::Periodic).apply(&mut f, &orig);

        for y in 0..4 {
            assert_eq!(f.get(0, y), f.get(3, y));
            assert_eq!(f.get(4, y), f.get(1, y));
        }
        for x in 0..5 {
            assert_eq!(f.get(x, 0), f.get(x, 2));
            assert_eq!(f.get(x, 3), f.get(x, 1));
        }
        // (0,0) <- (0,2) <- (3,2)
        assert_eq!(f.get(0, 0), orig.get(3, 2));
        assert_eq!(f.get(4, 3), orig.get(1, 1));
    }

    #[test]
    fn constant_policies_fill_the_ring() {
        let orig = ramp();
        for (kind, value) in [(BoundaryKind::Zero, 0.0), (BoundaryKind::Dirichlet, 0.5)] {
            let mut f = ramp();
            enforcer(kind).apply(&mut f, &orig);
            for (x, y) in ring(&f) {
                assert_eq!(f.get(x, y), value, "{kind} at ({x},{y})");
            }
            assert_eq!(f.get(2, 1), orig.get(2, 1));
        }
    }

    #[test]
    fn fixed_copies_snapshot() {
        let snapshot = ScalarField::with_value(5, 4, 0.8);
        let mut f = ramp();
        enforcer(BoundaryKind::Fixed).apply(&mut f, &snapshot);
        for (x, y) in ring(&f) {
            assert_eq!(f.get(x, y), 0.8);
        }
        assert_eq!(f.get(1, 1), 0.06);
    }

    #[test]
    fn neumann_extrapolates_outward() {
        let orig = ramp();
        let mut f = ramp();
        BoundaryEnforcer::new(BoundaryKind::Neumann, BoundaryParams::default(), 0.5)
            .apply(&mut f, &orig);
        // left edge of row 1: next[1][1] - 0.5
        assert!((f.get(0, 1) - (0.06 - 0.5)).abs() < 1e-6);
        // right edge of row 2: next[2][3] + 0.5
        assert!((f.get(4, 2) - (0.13 + 0.5)).abs() < 1e-6);
        // top edge of column 2: next[1][2] - 0.5
        assert!((f.get(2, 0) - (0.07 - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn reflective_mirrors_and_default_robin_halves() {
        let orig = ramp();
        let mut reflective = ramp();
        let mut robin = ramp();
        enforcer(BoundaryKind::Reflective).apply(&mut reflective, &orig);
        enforcer(BoundaryKind::Robin).apply(&mut robin, &orig);

        for y in 1..3 {
            assert_eq!(reflective.get(0, y), orig.get(1, y));
            assert_eq!(reflective.get(4, y), orig.get(3, y));
            assert!((robin.get(0, y) - orig.get(1, y) / 2.0).abs() < 1e-6);
        }
        for x in 1..4 {
            assert_eq!(reflective.get(x, 3), orig.get(x, 2));
            assert!((robin.get(x, 0) - orig.get(x, 1) / 2.0).abs() < 1e-6);
        }
        // corner mirrors the already-mirrored left edge
        assert_eq!(reflective.get(0, 0), orig.get(1, 1));
        assert!((robin.get(0, 0) - orig.get(1, 1) / 4.0).abs() < 1e-6);
    }

    #[test]
    fn robin_uses_its_tunables() {
        let params = BoundaryParams {
            robin_alpha: 0.0,
            robin_beta: 2.0,
            robin_gamma: 1.0,
            ..BoundaryParams::default()
        };
        let orig = ramp();
        let mut f = ramp();
        BoundaryEnforcer::new(BoundaryKind::Robin, params, 1.0).apply(&mut f, &orig);
        // (2 * 0.06 + 1) / 2
        assert!((f.get(0, 1) - 0.56).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn only_the_ring_is_written(
            w in 3usize..9,
            h in 3usize..9,
            kind_idx in 0usize..7,
            seed in any::<u32>(),
        ) {
            let kind = BoundaryKind::ALL[kind_idx];
            let data = (0..w * h)
                .map(|i| ((i as u32).wrapping_mul(2654435761).wrapping_add(seed) % 1000) as f32 / 1000.0)
                .collect();
            let before = ScalarField::from_vec(w, h, data);
            let mut after = before.clone();
            enforcer(kind).apply(&mut after, &before);
            for y in 1..h - 1 {
                for x in 1..w - 1 {
                    prop_assert_eq!(after.get(x, y), before.get(x, y));
                }
            }
        }
    }
}
