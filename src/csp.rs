//! The constraint network and the model used to build it.

use log::debug;
use std::collections::HashSet;
use std::fmt;
use std::ops;

use crate::constraint::ConstraintId;
use crate::{Constraint, Error, Prune, Result, Solution, Val, VarId, Variable};

/// A constraint network under construction.
///
/// Variables and constraints are enumerated in insertion order, which
/// fixes the tie-breaking of the variable orderings.
#[derive(Clone, Debug, Default)]
pub struct Model {
    // The name and original domain of each variable.
    domains: Vec<(String, Vec<Val>)>,

    constraints: Vec<Constraint>,
}

/// A constraint network: the variables, the constraints, and the list of
/// constraints that each variable appears in.
#[derive(Clone)]
pub struct Csp {
    vars: Vec<Variable>,
    constraints: Vec<Constraint>,

    // The constraints that each variable appears in, in insertion order.
    // Built once; the network never gains or loses constraints.
    cons_with_var: Vec<Vec<ConstraintId>>,
}

/// The prunes of one propagator call, restored in reverse order when the
/// checkpoint is dropped.
pub struct Checkpoint<'a> {
    csp: &'a mut Csp,
    pruned: Vec<Prune>,
}

/*--------------------------------------------------------------*/

impl Model {
    /// Allocate a new model.
    ///
    /// # Examples
    ///
    /// ```
    /// csp_propagators::Model::new();
    /// ```
    pub fn new() -> Self {
        Model::default()
    }

    /// Add a variable with the given original domain.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// let x = model.new_var("x", 1..=9);
    /// let y = model.new_var("y", vec![2, 4, 8]);
    /// ```
    pub fn new_var<S, D>(&mut self, name: S, domain: D) -> VarId
    where
        S: Into<String>,
        D: IntoIterator<Item = Val>,
    {
        let var = VarId(self.domains.len());
        self.domains.push((name.into(), domain.into_iter().collect()));
        var
    }

    /// Allocate a 1d vector of variables sharing the same domain.
    pub fn new_vars<D>(&mut self, n: usize, domain: D) -> Vec<VarId>
    where
        D: IntoIterator<Item = Val> + Clone,
    {
        let mut vars = Vec::with_capacity(n);
        for _ in 0..n {
            let name = format!("x{}", self.domains.len());
            vars.push(self.new_var(name, domain.clone()));
        }
        vars
    }

    /// Allocate a 2d array of variables sharing the same domain.  The
    /// variable in row `y`, column `x` is named `(y, x)`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// let vars = model.new_vars_2d(3, 3, 1..=9);
    /// assert_eq!(vars[1].len(), 3);
    /// ```
    pub fn new_vars_2d<D>(&mut self, width: usize, height: usize, domain: D) -> Vec<Vec<VarId>>
    where
        D: IntoIterator<Item = Val> + Clone,
    {
        let mut vars = Vec::with_capacity(height);
        for y in 0..height {
            let row = (0..width)
                .map(|x| self.new_var(format!("({}, {})", y, x), domain.clone()))
                .collect();
            vars.push(row);
        }
        vars
    }

    pub fn num_vars(&self) -> usize {
        self.domains.len()
    }

    /// The original domain of a variable.
    ///
    /// # Panics
    ///
    /// Panics if the variable does not belong to this model.
    pub fn domain(&self, var: VarId) -> &[Val] {
        &self.domains[var.0].1
    }

    pub fn var_name(&self, var: VarId) -> &str {
        &self.domains[var.0].0
    }

    /// Add a constraint to the model.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        let cid = ConstraintId(self.constraints.len());
        self.constraints.push(constraint);
        cid
    }

    /// Add a constraint given by its satisfying tuples.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// let x = model.new_var("x", 1..=4);
    /// model.table("x is even", vec![x], vec![vec![2], vec![4]]);
    /// ```
    pub fn table<S, I, T>(&mut self, name: S, scope: Vec<VarId>, tuples: I) -> ConstraintId
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<Vec<Val>>,
    {
        let mut constraint = Constraint::new(name, scope);
        constraint.add_satisfying_tuples(tuples);
        self.add_constraint(constraint)
    }

    /// Add a binary not-equal constraint.
    pub fn not_equal(&mut self, a: VarId, b: VarId) -> ConstraintId {
        let name = format!("{} != {}", self.var_name(a), self.var_name(b));
        let tuples = self.tuples_where(&[a, b], |vals| vals.len() < 2 || vals[0] != vals[1]);
        self.table(name, vec![a, b], tuples)
    }

    /// Add a binary `a < b` constraint.
    pub fn less_than(&mut self, a: VarId, b: VarId) -> ConstraintId {
        let name = format!("{} < {}", self.var_name(a), self.var_name(b));
        let tuples = self.tuples_where(&[a, b], |vals| vals.len() < 2 || vals[0] < vals[1]);
        self.table(name, vec![a, b], tuples)
    }

    /// Add an All Different constraint as a single table over the
    /// variables.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut model = csp_propagators::Model::new();
    /// let vars = model.new_vars(3, 1..=3);
    ///
    /// model.all_different(&vars);
    /// ```
    pub fn all_different<'a, I>(&mut self, vars: I) -> ConstraintId
    where
        I: IntoIterator<Item = &'a VarId>,
    {
        let scope: Vec<VarId> = vars.into_iter().copied().collect();
        let names: Vec<&str> = scope.iter().map(|&var| self.var_name(var)).collect();
        let name = format!("all-diff [{}]", names.join(", "));

        let tuples = self.tuples_where(&scope, |vals| match vals.split_last() {
            Some((last, rest)) => !rest.contains(last),
            None => true,
        });
        self.table(name, scope, tuples)
    }

    /// Enumerate the tuples over the variables' original domains accepted
    /// by `keep`.  `keep` sees every prefix as it is extended, so that
    /// hopeless prefixes are cut early.
    fn tuples_where<F>(&self, scope: &[VarId], mut keep: F) -> Vec<Vec<Val>>
    where
        F: FnMut(&[Val]) -> bool,
    {
        let mut out = Vec::new();
        let mut prefix = Vec::with_capacity(scope.len());
        self.extend_tuples(scope, &mut prefix, &mut keep, &mut out);
        out
    }

    fn extend_tuples<F>(
        &self,
        scope: &[VarId],
        prefix: &mut Vec<Val>,
        keep: &mut F,
        out: &mut Vec<Vec<Val>>,
    ) where
        F: FnMut(&[Val]) -> bool,
    {
        if prefix.len() == scope.len() {
            out.push(prefix.clone());
            return;
        }

        let VarId(idx) = scope[prefix.len()];
        for &val in self.domains[idx].1.iter() {
            prefix.push(val);
            if keep(prefix) {
                self.extend_tuples(scope, prefix, keep, out);
            }
            prefix.pop();
        }
    }

    /// Validate the model and freeze it into a constraint network.
    pub fn build(self) -> Result<Csp> {
        let mut vars = Vec::with_capacity(self.domains.len());
        for (name, domain) in self.domains {
            if domain.is_empty() {
                return Err(Error::EmptyDomain(name));
            }
            let mut seen = HashSet::new();
            for &val in domain.iter() {
                if !seen.insert(val) {
                    return Err(Error::DuplicateDomainValue { var: name, value: val });
                }
            }
            vars.push(Variable::new(name, domain));
        }

        for constraint in self.constraints.iter() {
            constraint.validate(&vars)?;
        }

        let mut cons_with_var = vec![Vec::new(); vars.len()];
        for (cidx, constraint) in self.constraints.iter().enumerate() {
            for &VarId(idx) in constraint.scope() {
                cons_with_var[idx].push(ConstraintId(cidx));
            }
        }

        debug!(
            "Built network with {} variables and {} constraints",
            vars.len(),
            self.constraints.len()
        );

        Ok(Csp {
            vars,
            constraints: self.constraints,
            cons_with_var,
        })
    }
}

/*--------------------------------------------------------------*/

impl Csp {
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// All variables, indexed by [`VarId::index`].
    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn var(&self, var: VarId) -> &Variable {
        &self.vars[var.0]
    }

    /// Get an iterator over every variable token, in insertion order.
    pub fn var_ids(&self) -> impl Iterator<Item = VarId> {
        (0..self.vars.len()).map(VarId)
    }

    /// Get an iterator over the unassigned variables, in insertion order.
    pub fn unassigned_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.var_ids().filter(move |&var| !self.vars[var.0].is_assigned())
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, cid: ConstraintId) -> &Constraint {
        &self.constraints[cid.0]
    }

    /// Get an iterator over every constraint token, in insertion order.
    pub fn constraint_ids(&self) -> impl Iterator<Item = ConstraintId> {
        (0..self.constraints.len()).map(ConstraintId)
    }

    /// The constraints whose scope mentions the variable.
    pub fn cons_with_var(&self, var: VarId) -> &[ConstraintId] {
        &self.cons_with_var[var.0]
    }

    pub fn is_assigned(&self, var: VarId) -> bool {
        self.vars[var.0].is_assigned()
    }

    /// Assign a variable.  See [`Variable::assign`].
    pub fn assign(&mut self, var: VarId, val: Val) {
        self.vars[var.0].assign(val);
    }

    pub fn unassign(&mut self, var: VarId) {
        self.vars[var.0].unassign();
    }

    /// Prune a value from a variable.  See [`Variable::prune_value`].
    pub fn prune(&mut self, var: VarId, val: Val) {
        self.vars[var.0].prune_value(val);
    }

    /// Restore a pruned value.  See [`Variable::restore_value`].
    pub fn restore(&mut self, var: VarId, val: Val) {
        self.vars[var.0].restore_value(val);
    }

    /// Take ownership of a propagator's prunes.  They are restored, most
    /// recent first, when the returned checkpoint is dropped.
    pub fn checkpoint(&mut self, pruned: Vec<Prune>) -> Checkpoint<'_> {
        Checkpoint { csp: self, pruned }
    }

    /// Snapshot the assignment, or None if a variable is unassigned.
    pub fn solution(&self) -> Option<Solution> {
        let vars = self
            .vars
            .iter()
            .map(|var| var.assigned_value())
            .collect::<Option<Vec<_>>>()?;
        Some(Solution { vars })
    }

    /// Unassign every variable and undo every prune.
    pub fn reset(&mut self) {
        for var in self.vars.iter_mut() {
            var.unassign();
            var.restore_domain();
        }
    }
}

impl fmt::Debug for Csp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Csp={{")?;
        for var in self.vars.iter() {
            writeln!(f)?;
            write!(f, "  {:?}", var)?;
        }
        write!(f, "}}")?;
        Ok(())
    }
}

/*--------------------------------------------------------------*/

impl Checkpoint<'_> {
    /// The prunes this checkpoint will restore, in the order performed.
    pub fn pruned(&self) -> &[Prune] {
        &self.pruned
    }
}

impl ops::Deref for Checkpoint<'_> {
    type Target = Csp;

    fn deref(&self) -> &Csp {
        &*self.csp
    }
}

impl ops::DerefMut for Checkpoint<'_> {
    fn deref_mut(&mut self) -> &mut Csp {
        &mut *self.csp
    }
}

impl Drop for Checkpoint<'_> {
    fn drop(&mut self) {
        for &(var, val) in self.pruned.iter().rev() {
            self.csp.restore(var, val);
        }
    }
}

impl fmt::Debug for Checkpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoint")
            .field("pruned", &self.pruned)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Model};

    #[test]
    fn test_no_vars() {
        let csp = Model::new().build().expect("empty model");
        assert_eq!(csp.num_vars(), 0);
        assert!(csp.solution().is_some());
    }

    #[test]
    fn test_cons_with_var_index() {
        let mut model = Model::new();
        let vars = model.new_vars(3, 1..=3);
        let c0 = model.not_equal(vars[0], vars[1]);
        let c1 = model.not_equal(vars[1], vars[2]);
        let csp = model.build().expect("valid model");

        assert_eq!(csp.cons_with_var(vars[0]), &[c0]);
        assert_eq!(csp.cons_with_var(vars[1]), &[c0, c1]);
        assert_eq!(csp.cons_with_var(vars[2]), &[c1]);
    }

    #[test]
    fn test_unassigned_vars_in_order() {
        let mut model = Model::new();
        let vars = model.new_vars(3, 1..=2);
        let mut csp = model.build().expect("valid model");
        csp.assign(vars[1], 2);
        assert_eq!(csp.unassigned_vars().collect::<Vec<_>>(), vec![vars[0], vars[2]]);
    }

    #[test]
    fn test_checkpoint_restores_in_reverse() {
        let mut model = Model::new();
        let x = model.new_var("x", 1..=3);
        let mut csp = model.build().expect("valid model");

        csp.prune(x, 1);
        csp.prune(x, 3);
        {
            let checkpoint = csp.checkpoint(vec![(x, 1), (x, 3)]);
            assert_eq!(checkpoint.var(x).cur_domain_size(), 1);
        }
        assert_eq!(csp.var(x).cur_domain().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_debug_lists_variables() {
        let mut model = Model::new();
        let x = model.new_var("x", 1..=3);
        let y = model.new_var("y", 1..=2);
        let mut csp = model.build().expect("valid model");
        csp.assign(x, 2);
        csp.prune(y, 1);

        assert_eq!(format!("{:?}", csp), "Csp={\n  Var(x: =2)\n  Var(y: 2)}");
    }

    #[test]
    fn test_builders() {
        let mut model = Model::new();
        let a = model.new_var("a", 1..=3);
        let b = model.new_var("b", 1..=3);
        let c = model.new_var("c", 1..=3);
        let ne = model.not_equal(a, b);
        let lt = model.less_than(a, b);
        let ad = model.all_different(&[a, b, c]);
        let csp = model.build().expect("valid model");

        assert_eq!(csp.constraint(ne).num_tuples(), 6);
        assert_eq!(csp.constraint(lt).num_tuples(), 3);
        assert_eq!(csp.constraint(ad).num_tuples(), 6);
    }

    #[test]
    fn test_bad_domains() {
        let mut model = Model::new();
        model.new_var("e", Vec::new());
        assert_eq!(model.build().err(), Some(Error::EmptyDomain("e".to_string())));

        let mut model = Model::new();
        model.new_var("d", vec![1, 1]);
        assert_eq!(
            model.build().err(),
            Some(Error::DuplicateDomainValue {
                var: "d".to_string(),
                value: 1
            })
        );
    }

    #[test]
    fn test_duplicate_scope() {
        let mut model = Model::new();
        let a = model.new_var("a", 1..=2);
        model.not_equal(a, a);
        assert!(matches!(
            model.build(),
            Err(Error::DuplicateScopeVariable { .. })
        ));
    }
}
