//! The arrival forecasting system: two months of history in, next month's volume out.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::inference::{FuzzySystem, InferenceEngine};
use crate::inputs::Inputs;
use crate::membership::Triangle;
use crate::rules::Rules;
use crate::terms::{Level, Terms};
use crate::variable::{Variable, Variables};

pub const ARRIVAL_LAST_MONTH: &str = "arrival_last_month";
pub const ARRIVAL_TWO_MONTHS_AGO: &str = "arrival_two_months_ago";
pub const PREDICTED_ARRIVAL: &str = "predicted_arrival";

/// Shared universe of every arrival variable
pub const DOMAIN: RangeInclusive<f64> = 0.0..=100.0;

/// Number of consequent breakpoints a gene vector can move.
pub const BREAKPOINT_GENES: usize = 5;

/// low, medium, high triangles evenly spread over `[min, max]`
pub fn standard_terms(min: f64, max: f64) -> Result<Terms> {
    let mid = min + (max - min) / 2.;

    Ok([
        (Level::Low, Triangle::new(min, min, mid)?),
        (Level::Medium, Triangle::new(min, mid, max)?),
        (Level::High, Triangle::new(mid, max, max)?),
    ]
    .into_iter()
    .collect())
}

/// Consequent terms with their free breakpoints moved by `genes`.
///
/// The genes drive, in order: low's right foot, medium's left foot, medium's peak,
/// medium's right foot and high's left foot. Each gene is clamped to `[0, 1]` and shifts its
/// breakpoint by up to a quarter of the domain either side of the default; `0.5` keeps it.
pub fn breakpoint_terms(genes: &[f64], min: f64, max: f64) -> Result<Terms> {
    if genes.len() != BREAKPOINT_GENES {
        return Err(Error::MalformedCandidate(format!(
            "expected {BREAKPOINT_GENES} genes to place consequent breakpoints, got {}",
            genes.len()
        )));
    }

    if let Some(gene) = genes.iter().find(|g| !g.is_finite()) {
        return Err(Error::MalformedCandidate(format!("gene {gene} is not finite")));
    }

    let span = max - min;
    let mid = min + span / 2.;
    let place = |default: f64, gene: f64| (default + (gene.clamp(0., 1.) - 0.5) * span / 2.).clamp(min, max);

    let low_c = place(mid, genes[0]);
    let medium_a = place(min, genes[1]);
    let medium_b = place(mid, genes[2]);
    let medium_c = place(max, genes[3]);
    let high_a = place(mid, genes[4]);

    Ok([
        (Level::Low, Triangle::new(min, min, low_c)?),
        (Level::Medium, Triangle::new(medium_a, medium_b, medium_c)?),
        (Level::High, Triangle::new(high_a, max, max)?),
    ]
    .into_iter()
    .collect())
}

/// Fuzzy model forecasting next month's arrivals from the previous two months.
pub struct ArrivalModel {
    system: FuzzySystem,
    engine: InferenceEngine,
    last_month: Variable,
    two_months_ago: Variable,
    predicted: Variable,
}

impl ArrivalModel {
    /// The model with evenly spread low, medium and high terms everywhere
    pub fn new(engine: InferenceEngine) -> Result<Self> {
        let (min, max) = (*DOMAIN.start(), *DOMAIN.end());

        Self::with_consequent_terms(engine, standard_terms(min, max)?)
    }

    /// The model with the consequent breakpoints placed by `genes`
    pub fn from_genes(engine: InferenceEngine, genes: &[f64]) -> Result<Self> {
        let (min, max) = (*DOMAIN.start(), *DOMAIN.end());

        Self::with_consequent_terms(engine, breakpoint_terms(genes, min, max)?)
    }

    pub fn with_consequent_terms(engine: InferenceEngine, predicted_terms: Terms) -> Result<Self> {
        let (min, max) = (*DOMAIN.start(), *DOMAIN.end());
        let mut vars = Variables::new();
        let last_month = vars.add(ARRIVAL_LAST_MONTH, DOMAIN, standard_terms(min, max)?, None)?;
        let two_months_ago = vars.add(ARRIVAL_TWO_MONTHS_AGO, DOMAIN, standard_terms(min, max)?, None)?;
        let predicted = vars.add(PREDICTED_ARRIVAL, DOMAIN, predicted_terms, None)?;
        let mut rules = Rules::with_capacity(5);

        rules.add(
            last_month.is(Level::Low).and(two_months_ago.is(Level::Low)),
            predicted,
            Level::Low,
        );
        rules.add(
            last_month.is(Level::Medium).and(two_months_ago.is(Level::Medium)),
            predicted,
            Level::Medium,
        );
        rules.add(
            last_month.is(Level::High).and(two_months_ago.is(Level::High)),
            predicted,
            Level::High,
        );
        rules.add(
            last_month.is(Level::Low).and(two_months_ago.is(Level::High)),
            predicted,
            Level::Medium,
        );
        rules.add(
            last_month.is(Level::High).and(two_months_ago.is(Level::Low)),
            predicted,
            Level::Medium,
        );
        // Mixed medium/low, medium/high pairs are left uncovered and fail with NoRuleFired

        Ok(Self {
            system: FuzzySystem::new(vars, rules)?,
            engine,
            last_month,
            two_months_ago,
            predicted,
        })
    }

    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    /// Predicted arrival volume given the last two months of arrivals
    pub fn forecast(&self, arrival_last_month: f64, arrival_two_months_ago: f64) -> Result<f64> {
        let inputs = Inputs::new()
            .with(self.last_month, arrival_last_month)
            .with(self.two_months_ago, arrival_two_months_ago);
        let outputs = self.engine.eval(&self.system, &inputs)?;

        outputs
            .get(self.predicted)
            .ok_or_else(|| Error::NoRuleFired(PREDICTED_ARRIVAL.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{AndOp, DefuzzificationOp};

    fn model() -> ArrivalModel {
        ArrivalModel::new(InferenceEngine::default()).unwrap()
    }

    #[test]
    fn test_medium_peak_forecasts_midpoint() {
        let value = model().forecast(50., 50.).unwrap();

        assert!((value - 50.).abs() < 1e-9, "forecast(50, 50) = {value}");
    }

    #[test]
    fn test_extremes() {
        let model = model();
        let low = model.forecast(0., 0.).unwrap();
        let high = model.forecast(100., 100.).unwrap();

        // centroids of the full strength shoulders
        assert!((low - 50. / 3.).abs() < 1e-9, "forecast(0, 0) = {low}");
        assert!((high - 250. / 3.).abs() < 1e-9, "forecast(100, 100) = {high}");
    }

    #[test]
    fn test_forecasts_stay_in_domain() {
        let model = model();

        for (x, y) in [(20., 30.), (70., 80.), (0., 100.), (100., 0.), (10., 15.), (85., 95.)] {
            let value = model.forecast(x, y).unwrap();
            assert!(DOMAIN.contains(&value), "forecast({x}, {y}) = {value}");
        }
    }

    #[test]
    fn test_contradicting_history_forecasts_medium() {
        let model = model();
        let rising = model.forecast(0., 100.).unwrap();
        let falling = model.forecast(100., 0.).unwrap();

        assert!((rising - 50.).abs() < 1e-9);
        assert!((falling - 50.).abs() < 1e-9);
    }

    #[test]
    fn test_uncovered_inputs_fire_no_rule() {
        let model = model();

        assert_eq!(model.forecast(50., 0.), Err(Error::NoRuleFired(PREDICTED_ARRIVAL.into())));
        assert_eq!(model.forecast(0., 50.), Err(Error::NoRuleFired(PREDICTED_ARRIVAL.into())));
        assert_eq!(model.forecast(100., 50.), Err(Error::NoRuleFired(PREDICTED_ARRIVAL.into())));
    }

    #[test]
    fn test_forecast_is_repeatable() {
        let model = model();

        assert_eq!(model.forecast(20., 30.), model.forecast(20., 30.));
        assert_eq!(model.forecast(70., 80.), model.forecast(70., 80.));
    }

    #[test]
    fn test_registry_lookup() {
        let model = model();
        let vars = model.system().variables();

        assert_eq!(vars.len(), 3);
        assert_eq!(
            vars.membership_function(PREDICTED_ARRIVAL, "medium"),
            Ok(&Triangle::new(0., 50., 100.).unwrap())
        );
        assert!(matches!(
            vars.membership_function(ARRIVAL_LAST_MONTH, "very_high"),
            Err(Error::UnknownTerm { .. })
        ));
        assert_eq!(model.system().rules().len(), 5);
    }

    #[test]
    fn test_neutral_genes_reproduce_standard_model() {
        let standard = model();
        let neutral = ArrivalModel::from_genes(InferenceEngine::default(), &[0.5; 5]).unwrap();

        for (x, y) in [(20., 30.), (70., 80.), (50., 50.), (0., 0.)] {
            assert_eq!(standard.forecast(x, y), neutral.forecast(x, y));
        }
    }

    #[test]
    fn test_genes_move_consequent_breakpoints() {
        let terms = breakpoint_terms(&[1., 0., 0., 1., 0.], 0., 100.).unwrap();

        assert_eq!(terms.get(Level::Low).map(Triangle::breakpoints), Some([0., 0., 75.]));
        assert_eq!(terms.get(Level::Medium).map(Triangle::breakpoints), Some([0., 25., 100.]));
        assert_eq!(terms.get(Level::High).map(Triangle::breakpoints), Some([25., 100., 100.]));

        // out of range genes saturate instead of breaking the triangle ordering
        let wild = breakpoint_terms(&[-7., 3., 9., -2., 14.], 0., 100.).unwrap();

        assert_eq!(wild.get(Level::Medium).map(Triangle::breakpoints), Some([25., 75., 75.]));

        let shifted = ArrivalModel::from_genes(InferenceEngine::default(), &[0.5, 0.5, 0.9, 0.5, 0.5]).unwrap();

        assert!(shifted.forecast(50., 50.).unwrap() > 50.);
    }

    #[test]
    fn test_malformed_genes() {
        assert!(matches!(breakpoint_terms(&[0.5; 4], 0., 100.), Err(Error::MalformedCandidate(_))));
        assert!(matches!(
            breakpoint_terms(&[0.5, f64::NAN, 0.5, 0.5, 0.5], 0., 100.),
            Err(Error::MalformedCandidate(_))
        ));
    }

    #[test]
    fn test_product_conjunction_and_bisector() {
        let engine = InferenceEngine::default()
            .with_and_op(AndOp::Prod)
            .with_defuzzification(DefuzzificationOp::Boa);
        let model = ArrivalModel::new(engine).unwrap();

        assert!((model.forecast(50., 50.).unwrap() - 50.).abs() < 1e-9);
        assert!(model.forecast(0., 0.).unwrap() < 25.);
    }
}
