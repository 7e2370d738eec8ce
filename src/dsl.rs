use crate::terms::Level;
use crate::variable::{Variable, VariableKey};

/// A rule premise: propositions joined by conjunctions and disjunctions.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(VariableKey, Level),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn or(self, rhs: Expr) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(rhs);
                Expr::Or(exprs)
            },
            lhs => Expr::Or(vec![lhs, rhs]),
        }
    }

    pub fn and(self, rhs: Expr) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(rhs);
                Expr::And(exprs)
            },
            lhs => Expr::And(vec![lhs, rhs]),
        }
    }

    /// Every `(variable, term)` proposition in the premise, left to right
    pub fn propositions(&self) -> Vec<(VariableKey, Level)> {
        let mut props = Vec::new();

        fn parse(expr: &Expr, out: &mut Vec<(VariableKey, Level)>) {
            match expr {
                Expr::Is(var_key, term) => out.push((*var_key, *term)),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
            }
        }

        parse(self, &mut props);

        props
    }
}

impl Variable {
    pub fn is(self, term: Level) -> Expr {
        Expr::Is(self.0, term)
    }
}

#[test]
fn test_chained_and_flattens() {
    use slotmap::SlotMap;

    let mut keys = SlotMap::<VariableKey, ()>::with_key();
    let a = Variable(keys.insert(()));
    let b = Variable(keys.insert(()));
    let c = Variable(keys.insert(()));

    let premise = a.is(Level::Low).and(b.is(Level::High)).and(c.is(Level::Medium));

    assert!(matches!(&premise, Expr::And(exprs) if exprs.len() == 3));
    assert_eq!(
        premise.propositions(),
        vec![(a.0, Level::Low), (b.0, Level::High), (c.0, Level::Medium)]
    );

    let either = a.is(Level::Low).or(b.is(Level::Low).and(c.is(Level::Low)));

    assert_eq!(either.propositions().len(), 3);
}
