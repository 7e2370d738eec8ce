use crate::dsl::Expr;
use crate::terms::Level;
use crate::variable::{Variable, VariableKey};

#[derive(Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, premise: Expr, output: Variable, term: Level) {
        self.0.push(Rule {
            premise,
            consequence: (output.0, term),
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) premise: Expr,
    pub(crate) consequence: (VariableKey, Level),
}

impl Rule {
    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    pub fn consequence(&self) -> (VariableKey, Level) {
        self.consequence
    }
}
