//! A single network variable and its prunable domain.

use bit_set::BitSet;
use std::collections::HashMap;
use std::fmt;

use crate::Val;

/// A variable with a fixed original domain and a current domain.
///
/// The current domain is the subsequence of the original domain whose
/// positions are set in the `present` mask.  Assignment and pruning are
/// independent: an assigned variable keeps its mask so that backtracking
/// can resume from it.
#[derive(Clone)]
pub struct Variable {
    name: String,

    // The original domain, in insertion order.
    domain: Vec<Val>,

    // Value -> position in `domain`.
    position: HashMap<Val, usize>,

    // Positions of the values that have not been pruned.
    present: BitSet,

    assigned: Option<Val>,
}

impl Variable {
    pub(crate) fn new(name: String, domain: Vec<Val>) -> Self {
        let position = domain
            .iter()
            .enumerate()
            .map(|(idx, &val)| (val, idx))
            .collect();
        let present = (0..domain.len()).collect();

        Variable {
            name,
            domain,
            position,
            present,
            assigned: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The original domain.
    pub fn domain(&self) -> &[Val] {
        &self.domain
    }

    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }

    /// Check whether the value belongs to the original domain.
    pub fn in_domain(&self, val: Val) -> bool {
        self.position.contains_key(&val)
    }

    /// Get an iterator over the current domain, in original-domain order.
    pub fn cur_domain(&self) -> impl Iterator<Item = Val> + '_ {
        self.present.iter().map(move |idx| self.domain[idx])
    }

    pub fn cur_domain_size(&self) -> usize {
        self.present.len()
    }

    pub fn in_cur_domain(&self, val: Val) -> bool {
        self.position
            .get(&val)
            .map_or(false, |&idx| self.present.contains(idx))
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned.is_some()
    }

    pub fn assigned_value(&self) -> Option<Val> {
        self.assigned
    }

    /// Assign a value from the current domain.
    ///
    /// # Panics
    ///
    /// Panics if the variable is already assigned, or if the value is
    /// not in the current domain.
    pub fn assign(&mut self, val: Val) {
        if let Some(old) = self.assigned {
            panic!("`{}` already assigned to {}", self.name, old);
        }
        if !self.in_cur_domain(val) {
            panic!("`{}`: {} is not in the current domain", self.name, val);
        }

        self.assigned = Some(val);
    }

    pub fn unassign(&mut self) {
        self.assigned = None;
    }

    /// Remove a value from the current domain.
    ///
    /// # Panics
    ///
    /// Panics if the value is not currently present.
    pub fn prune_value(&mut self, val: Val) {
        let idx = self.position_of(val);
        if !self.present.remove(idx) {
            panic!("`{}`: {} pruned twice", self.name, val);
        }
    }

    /// Put a pruned value back into the current domain.
    ///
    /// # Panics
    ///
    /// Panics if the value was not pruned.
    pub fn restore_value(&mut self, val: Val) {
        let idx = self.position_of(val);
        if !self.present.insert(idx) {
            panic!("`{}`: {} restored twice", self.name, val);
        }
    }

    /// Undo every prune, making the current domain the original one.
    pub fn restore_domain(&mut self) {
        self.present = (0..self.domain.len()).collect();
    }

    fn position_of(&self, val: Val) -> usize {
        match self.position.get(&val) {
            Some(&idx) => idx,
            None => panic!("`{}`: {} is not in the domain", self.name, val),
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Var({}:", self.name)?;
        match self.assigned {
            Some(val) => write!(f, " ={}", val)?,
            None => {
                for val in self.cur_domain() {
                    write!(f, " {}", val)?;
                }
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::Variable;

    fn var() -> Variable {
        Variable::new("v".to_string(), vec![3, 1, 2])
    }

    #[test]
    fn test_cur_domain_keeps_original_order() {
        let mut v = var();
        v.prune_value(1);
        assert_eq!(v.cur_domain().collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(v.cur_domain_size(), 2);
        assert_eq!(v.domain_size(), 3);
    }

    #[test]
    fn test_prune_restore_round_trip() {
        let mut v = var();
        let before = v.cur_domain().collect::<Vec<_>>();
        v.prune_value(2);
        assert!(!v.in_cur_domain(2));
        v.restore_value(2);
        assert_eq!(v.cur_domain().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_assign_keeps_mask() {
        let mut v = var();
        v.assign(1);
        assert_eq!(v.assigned_value(), Some(1));
        assert_eq!(v.cur_domain_size(), 3);
        v.unassign();
        assert!(!v.is_assigned());
    }

    #[test]
    #[should_panic(expected = "pruned twice")]
    fn test_double_prune() {
        let mut v = var();
        v.prune_value(3);
        v.prune_value(3);
    }

    #[test]
    #[should_panic(expected = "restored twice")]
    fn test_double_restore() {
        let mut v = var();
        v.restore_value(3);
    }

    #[test]
    #[should_panic(expected = "not in the current domain")]
    fn test_assign_pruned_value() {
        let mut v = var();
        v.prune_value(2);
        v.assign(2);
    }

    #[test]
    fn test_restore_domain() {
        let mut v = var();
        v.prune_value(3);
        v.prune_value(2);
        v.restore_domain();
        assert_eq!(v.cur_domain().collect::<Vec<_>>(), vec![3, 1, 2]);
    }
}
