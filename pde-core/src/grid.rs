use crate::config::EquationKind;
use crate::field::ScalarField;

pub struct StepBuffers<'a> {
    pub previous: &'a ScalarField,
    pub current: &'a ScalarField,
    pub next: &'a mut ScalarField,
    /// Previous Jacobi iterate for the implicit schemes.
    pub scratch: &'a mut ScalarField,
}

#[derive(Clone, Debug)]
pub struct GridState {
    previous: ScalarField,
    current: ScalarField,
    next: ScalarField,
    scratch: ScalarField,
}

impl GridState {
    /// `previous = current = seed`, `next = 0`.
    pub fn seeded(seed: &ScalarField) -> Self {
        let (w, h) = (seed.width(), seed.height());
        Self {
            previous: seed.clone(),
            current: seed.clone(),
            next: ScalarField::new(w, h),
            scratch: ScalarField::new(w, h),
        }
    }

    /// Discard history and reseed from `seed` in place.
    pub fn reseed(&mut self, seed: &ScalarField) {
        self.current.copy_from(seed);
        self.previous.copy_from(seed);
        self.next.fill(0.0);
    }

    pub fn width(&self) -> usize {
        self.current.width()
    }

    pub fn height(&self) -> usize {
        self.current.height()
    }

    pub fn previous(&self) -> &ScalarField {
        &self.previous
    }

    pub fn current(&self) -> &ScalarField {
        &self.current
    }

    pub fn next(&self) -> &ScalarField {
        &self.next
    }

    pub fn buffers(&mut self) -> StepBuffers<'_> {
        StepBuffers {
            previous: &self.previous,
            current: &self.current,
            next: &mut self.next,
            scratch: &mut self.scratch,
        }
    }

    /// Promote `next` to `current` once a step has filled it.
    pub fn rotate(&mut self, equation: EquationKind) {
        if equation.is_three_level() {
            self.rotate_three_level();
        } else {
            self.rotate_two_level();
        }
    }

    pub fn rotate_two_level(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// `previous ← current ← next`, old `previous` becomes the new `next`.
    pub fn rotate_three_level(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(value: f32) -> ScalarField {
        ScalarField::with_value(3, 3, value)
    }

    fn grid_with(prev: f32, cur: f32, next: f32) -> GridState {
        let mut grid = GridState::seeded(&tagged(cur));
        grid.previous.fill(prev);
        grid.next.fill(next);
        grid
    }

    #[test]
    fn seeding_zeroes_next() {
        let grid = GridState::seeded(&tagged(0.7));
        assert_eq!(grid.previous(), &tagged(0.7));
        assert_eq!(grid.current(), &tagged(0.7));
        assert_eq!(grid.next(), &tagged(0.0));
    }

    #[test]
    fn two_level_rotation_swaps_current_and_next() {
        let mut grid = grid_with(0.1, 0.2, 0.3);
        grid.rotate(EquationKind::Heat);
        assert_eq!(grid.previous().get(0, 0), 0.1);
        assert_eq!(grid.current().get(0, 0), 0.3);
        assert_eq!(grid.next().get(0, 0), 0.2);
    }

    #[test]
    fn three_level_rotation_cycles_all_buffers() {
        let mut grid = grid_with(0.1, 0.2, 0.3);
        let next_ptr = grid.next().as_slice().as_ptr();
        grid.rotate(EquationKind::Wave);
        assert_eq!(grid.previous().get(1, 1), 0.2);
        assert_eq!(grid.current().get(1, 1), 0.3);
        assert_eq!(grid.next().get(1, 1), 0.1);
        assert_eq!(grid.current().as_slice().as_ptr(), next_ptr);
    }

    #[test]
    fn reseed_restores_seed() {
        let mut grid = grid_with(0.1, 0.2, 0.3);
        grid.reseed(&tagged(0.9));
        assert_eq!(grid.previous(), &tagged(0.9));
        assert_eq!(grid.current(), &tagged(0.9));
        assert_eq!(grid.next(), &tagged(0.0));
    }
}
