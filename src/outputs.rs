use std::collections::BTreeMap;

use crate::variable::{Variable, VariableKey};

#[derive(Debug)]
pub struct Outputs {
    defuzzified: BTreeMap<VariableKey, f64>,
    firing_strengths: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(defuzzified: BTreeMap<VariableKey, f64>, firing_strengths: Vec<f64>) -> Self {
        Self {
            defuzzified,
            firing_strengths,
        }
    }

    /// Crisp value inferred for an output variable
    pub fn get(&self, var: Variable) -> Option<f64> {
        self.defuzzified.get(&var.0).copied()
    }

    /// Strength each rule fired with, in rule base order
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }
}
