/// Row-major `width * height` grid of `f32` samples.
///
/// Values produced by the solver stay in `[0, 1]` on interior cells; the
/// neumann edge policy may push edge cells outside that range, which the codec
/// clamps on output.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl ScalarField {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_value(width, height, 0.0)
    }

    pub fn with_value(width: usize, height: usize, value: f32) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width * height, "field size mismatch");
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Overwrite every sample with `other`'s, without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn copy_from(&mut self, other: &ScalarField) {
        assert!(
            self.width == other.width && self.height == other.height,
            "field shape mismatch"
        );
        self.data.copy_from_slice(&other.data);
    }

    pub fn same_shape(&self, other: &ScalarField) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_indexing() {
        let mut f = ScalarField::new(4, 3);
        f.set(3, 1, 0.25);
        assert_eq!(f.as_slice()[7], 0.25);
        assert_eq!(f.index(3, 1), 7);
        assert_eq!(f.get(3, 1), 0.25);
    }

    #[test]
    fn copy_from_keeps_allocation() {
        let src = ScalarField::with_value(3, 3, 0.5);
        let mut dst = ScalarField::new(3, 3);
        let ptr = dst.as_slice().as_ptr();
        dst.copy_from(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.as_slice().as_ptr(), ptr);
    }
}
