use num::Float;

use crate::error::{Error, Result};

/// Degree of membership of `x` in the triangle `(a, b, c)`.
///
/// The peak `b` always maps to one, which lets degenerate shoulders such as
/// `(0, 0, 50)` reach full membership at their edge.
pub fn membership<F: Float>(x: F, a: F, b: F, c: F) -> Result<F> {
    Triangle::new(a, b, c).map(|tri| tri.degree(x))
}

/// A triangular membership function with `a <= b <= c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle<F = f64> {
    a: F,
    b: F,
    c: F,
}

impl<F: Float> Triangle<F> {
    pub fn new(a: F, b: F, c: F) -> Result<Self> {
        if a.is_nan() || b.is_nan() || c.is_nan() {
            return Err(Error::InvalidParameter("triangle breakpoints must not be NaN".into()));
        }

        if a > b || b > c {
            return Err(Error::InvalidParameter(format!(
                "triangle breakpoints must satisfy a <= b <= c, got ({}, {}, {})",
                a.to_f64().unwrap_or(f64::NAN),
                b.to_f64().unwrap_or(f64::NAN),
                c.to_f64().unwrap_or(f64::NAN),
            )));
        }

        Ok(Self { a, b, c })
    }

    pub fn a(&self) -> F {
        self.a
    }

    pub fn b(&self) -> F {
        self.b
    }

    pub fn c(&self) -> F {
        self.c
    }

    pub fn breakpoints(&self) -> [F; 3] {
        [self.a, self.b, self.c]
    }

    pub fn degree(&self, x: F) -> F {
        let Self { a, b, c } = *self;

        if x == b {
            F::one()
        } else if x.is_nan() || x <= a || x >= c {
            F::zero()
        } else if x < b {
            (x - a) / (b - a)
        } else {
            (c - x) / (c - b)
        }
    }

    /// Evaluates the shape at every point of `universe`
    pub fn sample(&self, universe: &[F]) -> Vec<F> {
        universe.iter().map(|&x| self.degree(x)).collect()
    }

    pub(crate) fn within(&self, min: F, max: F) -> bool {
        self.a >= min && self.c <= max
    }
}

#[test]
fn test_zero_outside_support() {
    for x in [-1e9, -5., 0., 100., 100.5, 1e9, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(membership(x, 0., 50., 100.), Ok(0.));
    }

    assert_eq!(membership(50., 0., 50., 100.), Ok(1.));
    assert_eq!(membership(25., 0., 50., 100.), Ok(0.5));
    assert_eq!(membership(80., 0., 50., 100.), Ok(0.4));
}

#[test]
fn test_shoulders_peak_at_edge() {
    let low = Triangle::new(0., 0., 50.).unwrap();
    let high = Triangle::new(50., 100., 100.).unwrap();

    assert_eq!(low.degree(0.), 1.);
    assert_eq!(low.degree(20.), 0.6);
    assert_eq!(low.degree(50.), 0.);
    assert_eq!(high.degree(100.), 1.);
    assert_eq!(high.degree(70.), 0.4);
    assert_eq!(high.degree(50.), 0.);
}

#[test]
fn test_degree_always_in_unit_interval() {
    let shapes = [(0., 0., 50.), (0., 50., 100.), (50., 100., 100.), (10., 10., 10.), (-3., 1.5, 2.)];

    for (a, b, c) in shapes {
        let tri = Triangle::new(a, b, c).unwrap();
        let mut x = -20.;

        while x <= 120. {
            let d = tri.degree(x);
            assert!((0. ..=1.).contains(&d), "degree {d} for x={x} in {tri:?}");
            x += 0.37;
        }

        assert_eq!(tri.degree(f64::NAN), 0.);
    }
}

#[test]
fn test_invalid_parameters() {
    assert!(matches!(membership(1., 2., 1., 3.), Err(Error::InvalidParameter(_))));
    assert!(matches!(membership(1., 0., 4., 3.), Err(Error::InvalidParameter(_))));
    assert!(matches!(Triangle::new(0., f64::NAN, 1.), Err(Error::InvalidParameter(_))));
    assert!(Triangle::new(1.0f32, 1., 1.).is_ok());
}
