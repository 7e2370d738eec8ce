use num::Float;
use serde::{Deserialize, Serialize};

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => ProductionLink::Min.call(u, v),
            Self::Prod => ProductionLink::Prod.call(u, v),
            Self::BoundedProd => ProductionLink::BoundedProd.call(u, v),
            Self::DrasticProd => ProductionLink::DrasticProd.call(u, v),
        }
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => ProductionLink::Max.call(u, v),
            Self::ProbOr => ProductionLink::ProbOr.call(u, v),
            Self::BoundedSum => ProductionLink::BoundedSum.call(u, v),
            Self::DrasticSum => ProductionLink::DrasticSum.call(u, v),
        }
    }
}

/// How a rule's firing strength shapes its consequent membership.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Clip the consequent at the firing strength (Mamdani)
    #[default]
    Min,
    /// Scale the consequent by the firing strength (Larsen)
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, membership: F) -> F {
        match self {
            Self::Min => F::min(strength, membership),
            Self::Prod => strength * membership,
        }
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionLink {
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl ProductionLink {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }

    /// Folds `v` into `acc` element by element
    pub fn accumulate<F: Float>(self, acc: &mut [F], v: &[F]) {
        for (a, v) in acc.iter_mut().zip(v) {
            *a = self.call(*a, *v);
        }
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of Gravity
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Returns `None` when the membership encloses no area (or is empty)
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        if universe.len() < 2 || universe.len() != membership.len() {
            return None;
        }

        let two = F::one() + F::one();
        let areas: Vec<F> = universe
            .windows(2)
            .zip(membership.windows(2))
            .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
            .collect();
        let total_area = areas.iter().fold(F::zero(), |acc, a| acc + *a);

        if !(total_area > F::zero()) {
            return None;
        }

        match self {
            Self::Cog => {
                let three = two + F::one();
                let mut num = F::zero();

                for i in 0..areas.len() {
                    let base = universe[i + 1] - universe[i];
                    let area_rect = F::min(membership[i], membership[i + 1]) * base;
                    let center_rect = universe[i] + base / two;
                    let (area_tri, center_tri) = if membership[i + 1] == membership[i] {
                        (F::zero(), F::zero())
                    } else if membership[i + 1] > membership[i] {
                        (
                            base * (membership[i + 1] - membership[i]).abs() / two,
                            universe[i] + two / three * base,
                        )
                    } else {
                        (
                            base * (membership[i + 1] - membership[i]).abs() / two,
                            universe[i] + F::one() / three * base,
                        )
                    };

                    num = num + area_rect * center_rect + area_tri * center_tri;
                }

                Some(num / total_area)
            },
            Self::Boa => {
                let target = total_area / two;
                let mut cum_area = F::zero();

                for (i, area) in areas.iter().copied().enumerate() {
                    if cum_area + area >= target {
                        // linear split of the trapezoid the bisector falls into
                        let fraction = if area > F::zero() {
                            (target - cum_area) / area
                        } else {
                            F::zero()
                        };

                        return Some(universe[i] + fraction * (universe[i + 1] - universe[i]));
                    }

                    cum_area = cum_area + area;
                }

                universe.last().copied()
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(F::zero(), F::max);
                let at_max = universe
                    .iter()
                    .copied()
                    .zip(membership.iter().copied())
                    .filter_map(|(u, m)| if m == maximum { Some(u) } else { None });

                match self {
                    Self::Lom => at_max.reduce(F::max),
                    Self::Som => at_max.reduce(F::min),
                    _ => {
                        let (len, sum) = at_max.fold((F::zero(), F::zero()), |(len, sum), u| (len + F::one(), sum + u));

                        Some(sum / len)
                    },
                }
            },
        }
    }
}
