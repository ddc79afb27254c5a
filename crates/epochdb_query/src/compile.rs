//! Clause compilation: terms become predicate closures plus captured
//! variable names.

use crate::error::{QueryError, QueryResult};
use crate::term::{Clause, Operand, Pred, Query, Term};
use epochdb_core::Item;
use std::sync::Arc;

/// A compiled clause: three predicates aligned with the EAV positions, and
/// the variable name (if any) each position binds.
#[derive(Clone)]
pub struct PredicateClause {
    /// Predicates in EAV order.
    pub preds: [Pred; 3],
    /// Captured variable names in EAV order; `None` for literals and
    /// wildcards.
    pub vars: [Option<String>; 3],
}

/// Compiles every clause of a query.
///
/// Fails with [`QueryError::MalformedClause`] when a variable token is
/// malformed, a binary predicate does not have exactly one variable side,
/// or a clause binds no variable at all.
pub fn compile_query(query: &Query) -> QueryResult<Vec<PredicateClause>> {
    query.clauses.iter().map(compile_clause).collect()
}

/// Compiles one clause.
pub fn compile_clause(clause: &Clause) -> QueryResult<PredicateClause> {
    let (pe, ve) = compile_term(&clause.e)?;
    let (pa, va) = compile_term(&clause.a)?;
    let (pv, vv) = compile_term(&clause.v)?;
    if ve.is_none() && va.is_none() && vv.is_none() {
        return Err(QueryError::malformed("clause binds no variable"));
    }
    Ok(PredicateClause {
        preds: [pe, pa, pv],
        vars: [ve, va, vv],
    })
}

fn compile_term(term: &Term) -> QueryResult<(Pred, Option<String>)> {
    match term {
        Term::Var(name) => Ok((always_true(), var_name(name)?)),
        Term::Wild => Ok((always_true(), None)),
        Term::Lit(item) => {
            let lit = item.clone();
            let pred: Pred = Arc::new(move |x: &Item| *x == lit);
            Ok((pred, None))
        }
        Term::Unary { pred, var } => Ok((Arc::clone(pred), var_name(var)?)),
        Term::Binary { pred, left, right } => match (left, right) {
            (Operand::Lit(lit), Operand::Var(var)) => {
                let p = Arc::clone(pred);
                let lit = lit.clone();
                let pred: Pred = Arc::new(move |x: &Item| (*p)(&lit, x));
                Ok((pred, var_name(var)?))
            }
            (Operand::Var(var), Operand::Lit(lit)) => {
                let p = Arc::clone(pred);
                let lit = lit.clone();
                let pred: Pred = Arc::new(move |x: &Item| (*p)(x, &lit));
                Ok((pred, var_name(var)?))
            }
            _ => Err(QueryError::malformed(
                "binary predicate needs exactly one variable side",
            )),
        },
    }
}

/// Validates a variable token. The wildcard `_` is accepted but captures
/// nothing; every other token must start with `?`.
fn var_name(token: &str) -> QueryResult<Option<String>> {
    if token == "_" {
        return Ok(None);
    }
    if token.starts_with('?') && token.len() > 1 {
        return Ok(Some(token.to_string()));
    }
    Err(QueryError::malformed(format!(
        "variable must be `_` or start with `?`: {token:?}"
    )))
}

fn always_true() -> Pred {
    Arc::new(|_: &Item| true)
}
