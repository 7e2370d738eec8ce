use num::Float;

/// Evenly spaced points over a closed interval, like `numpy.linspace`.
pub struct Linspace<F> {
    start: F,
    end: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(num_steps) if n > 1 => (max - min) / num_steps,
            _ => F::zero(),
        };

        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }

    /// Grid from `min` to `max` spaced by roughly `step`. Both ends are always included.
    pub fn with_step(min: F, max: F, step: F) -> Self {
        // floor mirrors how the grid is usually built from an arange-style step; a span that is
        // not a multiple of step still keeps `max` as the final point
        let num = ((max - min) / step).floor().to_usize().unwrap_or(0) + 1;

        Self::new(min, max, num.max(2))
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        // pin the last point so rounding never leaves it short of `max`
        if i + 1 == self.len && self.len > 1 {
            return Some(self.end);
        }

        Some(self.start + self.step * F::from(i)?)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_unit_step_grid() {
    let grid: Vec<f64> = Linspace::with_step(0., 100., 1.).collect();

    assert_eq!(grid.len(), 101);
    assert_eq!(grid[0], 0.);
    assert_eq!(grid[50], 50.);
    assert_eq!(grid[100], 100.);
}

#[test]
fn test_linspace() {
    assert_eq!(Linspace::new(0., 1., 5).collect::<Vec<f64>>(), vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(3., 9., 1).collect::<Vec<f64>>(), vec![3.]);
    assert_eq!(Linspace::<f64>::new(3., 9., 0).count(), 0);
}
