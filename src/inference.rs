use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::dsl::Expr;
use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::ops::*;
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::terms::Level;
use crate::variable::{LinguisticVariable, VariableKey, Variables};

/// Variables and rules bundled into a validated, read-only fuzzy system.
pub struct FuzzySystem {
    variables: Variables,
    rules: Rules,
}

impl FuzzySystem {
    /// Every proposition and consequence must name a registered variable and one of its terms.
    pub fn new(variables: Variables, rules: Rules) -> Result<Self> {
        let this = Self { variables, rules };

        for rule in this.rules.iter() {
            let (output, term) = rule.consequence;

            for (key, level) in rule.premise.propositions().into_iter().chain(Some((output, term))) {
                let var = this.variable(key)?;

                if var.term(level).is_none() {
                    return Err(Error::UnknownTerm {
                        variable: var.name.clone(),
                        term: level.to_string(),
                    });
                }
            }
        }

        Ok(this)
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub(crate) fn variable(&self, key: VariableKey) -> Result<&LinguisticVariable> {
        self.variables
            .vars
            .get(key)
            .ok_or_else(|| Error::UnknownVariable(format!("{key:?}")))
    }
}

/// Mamdani style inference: fuzzify, fire, imply, aggregate, defuzzify.
#[derive(Clone, Copy, Debug, Default)]
pub struct InferenceEngine {
    and_op: AndOp,
    or_op: OrOp,
    imp_op: ImplicationOp,
    prod_link: ProductionLink,
    defuzz_op: DefuzzificationOp,
}

impl InferenceEngine {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        prod_link: ProductionLink,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            prod_link,
            defuzz_op,
        }
    }

    pub fn with_and_op(self, and_op: AndOp) -> Self {
        Self { and_op, ..self }
    }

    pub fn with_defuzzification(self, defuzz_op: DefuzzificationOp) -> Self {
        Self { defuzz_op, ..self }
    }

    pub fn and_op(&self) -> AndOp {
        self.and_op
    }

    pub fn eval(&self, system: &FuzzySystem, inputs: &Inputs) -> Result<Outputs> {
        // Fuzzificate Facts
        // Crisp facts are clamped into their universe before membership lookups
        let mut facts = BTreeMap::new();

        for (key, value) in &inputs.0 {
            let var = system.variable(*key)?;

            if !value.is_finite() {
                return Err(Error::InvalidInput {
                    variable: var.name.clone(),
                    value: *value,
                });
            }

            let clamped = value.clamp(var.min_u, var.max_u);

            if clamped != *value {
                warn!(variable = %var.name, value, clamped, "input outside universe, clamping");
            }

            facts.insert(*key, clamped);
        }

        // Compute Rule Firing Strengths
        let strengths = system
            .rules
            .iter()
            .map(|rule| self.fire(&rule.premise, system, &facts))
            .collect::<Result<Vec<_>>>()?;

        debug!(?strengths, "rules fired");

        // Accumulate Term Activations
        let mut activations: BTreeMap<VariableKey, BTreeMap<Level, f64>> = BTreeMap::new();

        for (rule, strength) in system.rules.iter().zip(&strengths) {
            let (var_key, term) = rule.consequence;
            let activation = activations.entry(var_key).or_default().entry(term).or_insert(0.);

            *activation = self.prod_link.call(*activation, *strength);
        }

        // Aggregate And Defuzzificate
        let mut defuzzified = BTreeMap::new();

        for (var_key, terms) in activations {
            let var = system.variable(var_key)?;

            if terms.values().all(|activation| *activation <= 0.) {
                return Err(Error::NoRuleFired(var.name.clone()));
            }

            let mut aggregated: Option<Vec<f64>> = None;

            for (level, activation) in terms {
                let samples = var
                    .term(level)
                    .ok_or_else(|| Error::UnknownTerm {
                        variable: var.name.clone(),
                        term: level.to_string(),
                    })?
                    .samples();
                let implied: Vec<f64> = samples.iter().map(|m| self.imp_op.call(activation, *m)).collect();

                match aggregated.as_mut() {
                    None => aggregated = Some(implied),
                    Some(agg) => self.prod_link.accumulate(agg, &implied),
                }
            }

            let value = aggregated
                .and_then(|agg| self.defuzz_op.call(&var.universe, &agg))
                .ok_or_else(|| Error::NoRuleFired(var.name.clone()))?;

            debug!(variable = %var.name, value, "defuzzified");
            defuzzified.insert(var_key, value);
        }

        Ok(Outputs::new(defuzzified, strengths))
    }

    fn fire(&self, expr: &Expr, system: &FuzzySystem, facts: &BTreeMap<VariableKey, f64>) -> Result<f64> {
        match expr {
            Expr::Is(var_key, term) => {
                let var = system.variable(*var_key)?;
                let fact = facts
                    .get(var_key)
                    .ok_or_else(|| Error::MissingInput(var.name.clone()))?;

                var.degree(*term, *fact)
            },
            Expr::And(exprs) => self.combine(exprs, system, facts, |u, v| self.and_op.call(u, v)),
            Expr::Or(exprs) => self.combine(exprs, system, facts, |u, v| self.or_op.call(u, v)),
        }
    }

    fn combine(
        &self,
        exprs: &[Expr],
        system: &FuzzySystem,
        facts: &BTreeMap<VariableKey, f64>,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<f64> {
        let mut combined = None;

        for expr in exprs {
            let degree = self.fire(expr, system, facts)?;

            combined = Some(match combined {
                None => degree,
                Some(acc) => op(acc, degree),
            });
        }

        Ok(combined.unwrap_or(0.))
    }
}
