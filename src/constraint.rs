//! Table constraints.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::{Error, Result, Val, VarId, Variable};

/// A constraint identifier, indexing into the network's constraints.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A relation over an ordered scope, given as the set of satisfying
/// tuples.  Column `i` of every tuple holds the value of `scope[i]`.
#[derive(Clone)]
pub struct Constraint {
    name: String,
    scope: Vec<VarId>,

    // The satisfying tuples, in insertion order.
    tuples: Vec<Box<[Val]>>,
    members: HashSet<Box<[Val]>>,

    // (scope position, value) -> indices into `tuples` with that value
    // at that position.
    supports: HashMap<(usize, Val), Vec<usize>>,
}

impl Constraint {
    /// Create a constraint without any satisfying tuples.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// let a = model.new_var("a", 1..=3);
    /// let b = model.new_var("b", 1..=3);
    ///
    /// let mut lt = csp_propagators::Constraint::new("a<b", vec![a, b]);
    /// lt.add_satisfying_tuples(vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
    /// model.add_constraint(lt);
    /// ```
    pub fn new<S: Into<String>>(name: S, scope: Vec<VarId>) -> Self {
        Constraint {
            name: name.into(),
            scope,
            tuples: Vec::new(),
            members: HashSet::new(),
            supports: HashMap::new(),
        }
    }

    /// Add satisfying tuples.  Tuples already present are ignored.
    ///
    /// Tuple shape is validated when the model is built.
    pub fn add_satisfying_tuples<I, T>(&mut self, tuples: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<Val>>,
    {
        for tuple in tuples {
            let tuple = tuple.into().into_boxed_slice();
            if self.members.contains(&tuple) {
                continue;
            }

            let tidx = self.tuples.len();
            for (pos, &val) in tuple.iter().enumerate() {
                self.supports.entry((pos, val)).or_default().push(tidx);
            }
            self.members.insert(tuple.clone());
            self.tuples.push(tuple);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &[VarId] {
        &self.scope
    }

    /// The satisfying tuples, in insertion order.
    pub fn tuples(&self) -> impl Iterator<Item = &[Val]> + '_ {
        self.tuples.iter().map(|t| &t[..])
    }

    pub fn num_tuples(&self) -> usize {
        self.tuples.len()
    }

    /// Count the unassigned variables of the scope.
    pub fn n_unassigned(&self, vars: &[Variable]) -> usize {
        self.scope
            .iter()
            .filter(|&&var| !vars[var.0].is_assigned())
            .count()
    }

    /// List the unassigned variables of the scope, in scope order.
    pub fn unassigned_vars(&self, vars: &[Variable]) -> Vec<VarId> {
        self.scope
            .iter()
            .copied()
            .filter(|&var| !vars[var.0].is_assigned())
            .collect()
    }

    /// Check whether the values (aligned with the scope) satisfy the
    /// constraint.
    pub fn check(&self, values: &[Val]) -> bool {
        self.members.contains(values)
    }

    /// Check whether `var = val` has a support: a satisfying tuple with
    /// `val` in `var`'s column, whose other entries match assigned
    /// variables exactly and are still in the current domain of the
    /// unassigned ones.
    pub fn has_support(&self, vars: &[Variable], var: VarId, val: Val) -> bool {
        let pos = match self.scope.iter().position(|&v| v == var) {
            Some(pos) => pos,
            None => return false,
        };

        let candidates = match self.supports.get(&(pos, val)) {
            Some(candidates) => candidates,
            None => return false,
        };

        candidates.iter().any(|&tidx| {
            let tuple = &self.tuples[tidx];
            self.scope
                .iter()
                .zip(tuple.iter())
                .enumerate()
                .all(|(i, (&other, &v))| i == pos || is_available(&vars[other.0], v))
        })
    }

    /// Validate the tuples against the variables' original domains.
    pub(crate) fn validate(&self, vars: &[Variable]) -> Result<()> {
        for (i, &var) in self.scope.iter().enumerate() {
            if var.0 >= vars.len() {
                return Err(Error::UnknownVariable {
                    constraint: self.name.clone(),
                    var,
                });
            }
            if self.scope[..i].contains(&var) {
                return Err(Error::DuplicateScopeVariable {
                    constraint: self.name.clone(),
                    var: vars[var.0].name().to_string(),
                });
            }
        }

        for tuple in self.tuples.iter() {
            if tuple.len() != self.scope.len() {
                return Err(Error::TupleArity {
                    constraint: self.name.clone(),
                    tuple: tuple.to_vec(),
                    expected: self.scope.len(),
                    found: tuple.len(),
                });
            }

            for (&var, &val) in self.scope.iter().zip(tuple.iter()) {
                let var = &vars[var.0];
                if !var.in_domain(val) {
                    return Err(Error::ValueOutOfDomain {
                        constraint: self.name.clone(),
                        var: var.name().to_string(),
                        value: val,
                    });
                }
            }
        }

        Ok(())
    }
}

fn is_available(var: &Variable, val: Val) -> bool {
    match var.assigned_value() {
        Some(assigned) => assigned == val,
        None => var.in_cur_domain(val),
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("tuples", &self.tuples.len())
            .finish()
    }
}
