//! This crate prunes the domains of finite-domain constraint networks.
//! Constraints are tables of satisfying tuples; the propagators (plain
//! backtracking, forward checking and generalized arc consistency) are
//! meant to be driven by a backtracking search.

pub mod constraint;
pub mod futoshiki;

mod csp;
mod error;
mod ordering;
mod propagate;
mod search;
mod variable;

use std::fmt;
use std::ops;

pub use constraint::{Constraint, ConstraintId};
pub use csp::{Checkpoint, Csp, Model};
pub use error::{Error, Result};
pub use ordering::VarOrder;
pub use propagate::{Propagation, Propagator};
pub use search::BacktrackSearch;
pub use variable::Variable;

/// A variable token, indexing into the network's variables.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VarId(usize);

impl VarId {
    /// The position of the variable in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// The type of a variable's value.
pub type Val = i32;

/// A pruned (variable, value) pair.
pub type Prune = (VarId, Val);

/// A dictionary mapping variables to the solution value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    vars: Vec<Val>,
}

impl Solution {
    pub fn values(&self) -> &[Val] {
        &self.vars
    }
}

impl ops::Index<VarId> for Solution {
    type Output = Val;
    fn index(&self, var: VarId) -> &Val {
        let VarId(idx) = var;
        &self.vars[idx]
    }
}
