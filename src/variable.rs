use std::collections::HashMap;
use std::ops::RangeInclusive;

use fixed_map::Map as FixedMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::{Error, Result};
use crate::linspace::Linspace;
use crate::membership::Triangle;
use crate::terms::{Level, Terms};

/// Grid spacing used when a variable is added without an explicit step.
pub const DEFAULT_STEP: f64 = 1.0;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Handle to a variable registered in [`Variables`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) VariableKey);

impl Variable {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

#[derive(Default)]
pub struct Variables {
    pub(crate) vars: SlotMap<VariableKey, LinguisticVariable>,
    by_name: HashMap<String, VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self {
            vars: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }

    /// If the step value is not provided, it defaults to [`DEFAULT_STEP`]
    pub fn add(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        terms: Terms,
        step: Option<f64>,
    ) -> Result<Variable> {
        let name = name.into();

        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateVariable(name));
        }

        let var = LinguisticVariable::new(name.clone(), universe_range, terms, step.unwrap_or(DEFAULT_STEP))?;
        let key = self.vars.insert(var);

        self.by_name.insert(name, key);

        Ok(Variable(key))
    }

    pub fn get(&self, var: Variable) -> Option<&LinguisticVariable> {
        self.vars.get(var.0)
    }

    pub fn find(&self, name: &str) -> Result<Variable> {
        self.by_name
            .get(name)
            .map(|key| Variable(*key))
            .ok_or_else(|| Error::UnknownVariable(name.to_owned()))
    }

    /// Looks up a membership function by variable and term name
    pub fn membership_function(&self, variable: &str, term: &str) -> Result<&Triangle> {
        let var = &self.vars[self.find(variable)?.0];
        let unknown = || Error::UnknownTerm {
            variable: variable.to_owned(),
            term: term.to_owned(),
        };
        let level = term.parse::<Level>().map_err(|_| unknown())?;

        var.term(level).map(|term| &term.shape).ok_or_else(unknown)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// A term's shape together with its membership sampled on the owning variable's universe.
pub struct Term {
    pub(crate) shape: Triangle,
    pub(crate) samples: Vec<f64>,
}

impl Term {
    pub fn shape(&self) -> &Triangle {
        &self.shape
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

pub struct LinguisticVariable {
    pub(crate) name: String,
    pub(crate) universe: Vec<f64>,
    pub(crate) min_u: f64,
    pub(crate) max_u: f64,
    pub(crate) terms: FixedMap<Level, Term>,
}

impl LinguisticVariable {
    fn new(name: String, universe_range: RangeInclusive<f64>, terms: Terms, step: f64) -> Result<Self> {
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !min_u.is_finite() || !max_u.is_finite() || min_u >= max_u {
            return Err(Error::InvalidParameter(format!(
                "variable `{name}` needs a finite domain with min < max, got [{min_u}, {max_u}]"
            )));
        }

        if !step.is_finite() || step <= 0. {
            return Err(Error::InvalidParameter(format!(
                "variable `{name}` needs a positive universe step, got {step}"
            )));
        }

        if terms.is_empty() {
            return Err(Error::InvalidParameter(format!("variable `{name}` has no terms")));
        }

        for (level, shape) in terms.iter() {
            if !shape.within(min_u, max_u) {
                return Err(Error::InvalidParameter(format!(
                    "term `{level}` of variable `{name}` spans {:?}, outside [{min_u}, {max_u}]",
                    shape.breakpoints(),
                )));
            }
        }

        // Breakpoints join the grid so every peak and foot is sampled exactly
        let mut universe: Vec<f64> = Linspace::with_step(min_u, max_u, step)
            .chain(terms.iter().flat_map(|(_, shape)| shape.breakpoints()))
            .collect();

        universe.sort_unstable_by(f64::total_cmp);
        universe.dedup();

        let mut sampled = FixedMap::new();

        for (level, shape) in terms.iter() {
            let samples = shape.sample(&universe);
            sampled.insert(level, Term { shape: *shape, samples });
        }

        Ok(Self {
            name,
            universe,
            min_u,
            max_u,
            terms: sampled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> RangeInclusive<f64> {
        self.min_u..=self.max_u
    }

    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    pub fn term(&self, level: Level) -> Option<&Term> {
        self.terms.get(level)
    }

    pub fn terms(&self) -> impl Iterator<Item = (Level, &Term)> {
        self.terms.iter()
    }

    /// Degree of `x` in the named term, or `UnknownTerm` when the variable lacks it
    pub fn degree(&self, level: Level, x: f64) -> Result<f64> {
        self.term(level)
            .map(|term| term.shape.degree(x))
            .ok_or_else(|| Error::UnknownTerm {
                variable: self.name.clone(),
                term: level.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: f64, b: f64, c: f64) -> Triangle {
        Triangle::new(a, b, c).unwrap()
    }

    fn low_high() -> Terms {
        [(Level::Low, tri(0., 0., 50.)), (Level::High, tri(50., 100., 100.))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_lookup_by_name() {
        let mut vars = Variables::new();
        let demand = vars.add("demand", 0. ..=100., low_high(), None).unwrap();

        assert_eq!(vars.find("demand"), Ok(demand));
        assert_eq!(vars.membership_function("demand", "High"), Ok(&tri(50., 100., 100.)));
        assert_eq!(
            vars.membership_function("demand", "medium"),
            Err(Error::UnknownTerm {
                variable: "demand".into(),
                term: "medium".into()
            })
        );
        assert_eq!(
            vars.membership_function("demand", "enormous"),
            Err(Error::UnknownTerm {
                variable: "demand".into(),
                term: "enormous".into()
            })
        );
        assert_eq!(
            vars.membership_function("supply", "low"),
            Err(Error::UnknownVariable("supply".into()))
        );
    }

    #[test]
    fn test_universe_includes_breakpoints() {
        let mut vars = Variables::new();
        let terms = [(Level::Medium, tri(12.5, 40.25, 77.))].into_iter().collect();
        let var = vars.add("x", 0. ..=100., terms, Some(10.)).unwrap();
        let var = vars.get(var).unwrap();

        assert_eq!(var.universe().len(), 11 + 3);
        assert!(var.universe().windows(2).all(|w| w[0] < w[1]));
        assert!(var.universe().contains(&40.25));

        let term = var.term(Level::Medium).unwrap();
        let peak = var.universe().iter().position(|u| *u == 40.25).unwrap();

        assert_eq!(term.samples().len(), var.universe().len());
        assert_eq!(term.samples()[peak], 1.);
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let mut vars = Variables::new();

        vars.add("x", 0. ..=100., low_high(), None).unwrap();

        assert_eq!(
            vars.add("x", 0. ..=100., low_high(), None).err(),
            Some(Error::DuplicateVariable("x".into()))
        );
        assert!(matches!(
            vars.add("y", 0. ..=40., low_high(), None),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            vars.add("z", 100. ..=0., low_high(), None),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            vars.add("w", 0. ..=100., low_high(), Some(0.)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            vars.add("v", 0. ..=100., Terms::new(), None),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(vars.len(), 1);
    }
}
