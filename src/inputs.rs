use std::collections::BTreeMap;

use crate::variable::{Variable, VariableKey};

/// Crisp facts handed to the inference engine, one per antecedent variable.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) BTreeMap<VariableKey, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(BTreeMap::new())
    }

    pub fn add(&mut self, var: Variable, val: f64) {
        self.0.insert(var.0, val);
    }

    pub fn with(mut self, var: Variable, val: f64) -> Self {
        self.add(var, val);
        self
    }
}
