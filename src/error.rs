use thiserror::Error;

use crate::{Val, VarId};

/// Errors raised while building a constraint network.
///
/// Dead ends found during propagation are not errors; see
/// [`Propagation`](crate::Propagation).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("constraint `{constraint}`: tuple {tuple:?} has {found} values, scope has {expected}")]
    TupleArity {
        constraint: String,
        tuple: Vec<Val>,
        expected: usize,
        found: usize,
    },

    #[error("constraint `{constraint}`: value {value} is not in the domain of `{var}`")]
    ValueOutOfDomain {
        constraint: String,
        var: String,
        value: Val,
    },

    #[error("constraint `{constraint}` refers to unknown variable {var}")]
    UnknownVariable { constraint: String, var: VarId },

    #[error("constraint `{constraint}` mentions `{var}` more than once")]
    DuplicateScopeVariable { constraint: String, var: String },

    #[error("variable `{var}` lists value {value} twice")]
    DuplicateDomainValue { var: String, value: Val },

    #[error("variable `{0}` has an empty domain")]
    EmptyDomain(String),

    #[error("board is empty")]
    EmptyBoard,

    #[error("board row {row} has {found} tokens, expected {expected}")]
    RaggedBoard {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board row {row}, column {col}: unexpected token `{token}`")]
    BadToken {
        row: usize,
        col: usize,
        token: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
