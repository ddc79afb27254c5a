//! Query syntax: terms, clauses, and the query record.

use epochdb_core::Item;
use std::fmt;
use std::sync::Arc;

/// A compiled unary predicate over one datom component.
pub type Pred = Arc<dyn Fn(&Item) -> bool + Send + Sync>;

/// A binary predicate; one side is a literal, the other the bound variable.
pub type BinPred = Arc<dyn Fn(&Item, &Item) -> bool + Send + Sync>;

/// One side of a binary predicate application.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A variable token (`?x`, or the wildcard `_`).
    Var(String),
    /// A literal component.
    Lit(Item),
}

impl Operand {
    /// Creates a variable operand.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Operand::Var(name.into())
    }

    /// Creates a literal operand.
    #[must_use]
    pub fn lit(item: impl Into<Item>) -> Self {
        Operand::Lit(item.into())
    }
}

/// One term of a clause, in one of the accepted shapes.
///
/// - a bare variable (`?id`) or the wildcard `_`
/// - a literal component
/// - a unary predicate applied to a variable
/// - a binary predicate with the variable on either side and a literal on
///   the other, e.g. `(> 200 ?b)`
#[derive(Clone)]
pub enum Term {
    /// A variable token. `_` matches anything and never binds.
    Var(String),
    /// The wildcard: matches anything, never binds.
    Wild,
    /// A literal component, matched by equality.
    Lit(Item),
    /// A unary predicate application `(pred ?x)`.
    Unary {
        /// The predicate.
        pred: Pred,
        /// The variable it binds.
        var: String,
    },
    /// A binary predicate application, e.g. `(> ?b 200)` or `(> 200 ?b)`.
    /// Exactly one operand must be a variable.
    Binary {
        /// The predicate, applied as `pred(left, right)`.
        pred: BinPred,
        /// The left operand.
        left: Operand,
        /// The right operand.
        right: Operand,
    },
}

impl Term {
    /// Creates a variable term.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    /// Creates the wildcard term.
    #[must_use]
    pub fn wild() -> Self {
        Term::Wild
    }

    /// Creates a literal term.
    #[must_use]
    pub fn lit(item: impl Into<Item>) -> Self {
        Term::Lit(item.into())
    }

    /// Creates a unary predicate term.
    #[must_use]
    pub fn unary(
        pred: impl Fn(&Item) -> bool + Send + Sync + 'static,
        var: impl Into<String>,
    ) -> Self {
        Term::Unary {
            pred: Arc::new(pred),
            var: var.into(),
        }
    }

    /// Creates a binary predicate term.
    #[must_use]
    pub fn binary(
        pred: impl Fn(&Item, &Item) -> bool + Send + Sync + 'static,
        left: Operand,
        right: Operand,
    ) -> Self {
        Term::Binary {
            pred: Arc::new(pred),
            left,
            right,
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => f.debug_tuple("Var").field(name).finish(),
            Term::Wild => f.write_str("Wild"),
            Term::Lit(item) => f.debug_tuple("Lit").field(item).finish(),
            Term::Unary { var, .. } => f.debug_struct("Unary").field("var", var).finish_non_exhaustive(),
            Term::Binary { left, right, .. } => f
                .debug_struct("Binary")
                .field("left", left)
                .field("right", right)
                .finish_non_exhaustive(),
        }
    }
}

/// A `[e-term, a-term, v-term]` triple.
#[derive(Debug, Clone)]
pub struct Clause {
    /// The entity term.
    pub e: Term,
    /// The attribute-name term.
    pub a: Term,
    /// The value term.
    pub v: Term,
}

impl Clause {
    /// Creates a clause from its three terms in EAV order.
    #[must_use]
    pub fn new(e: Term, a: Term, v: Term) -> Self {
        Self { e, a, v }
    }
}

/// A query: the variables to project and the clauses to satisfy.
///
/// # Example
///
/// ```rust,ignore
/// let query = Query::find(["?id", "?b"])
///     .where_clause(Clause::new(
///         Term::var("?id"),
///         Term::lit(Item::attr("test/bp-systolic")),
///         Term::binary(preds::gt, Operand::lit(200i64), Operand::var("?b")),
///     ));
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    /// The variables whose bindings are kept in the result rows.
    pub find: Vec<String>,
    /// The clauses, all of which a result must satisfy.
    pub clauses: Vec<Clause>,
}

impl Query {
    /// Starts a query projecting the given variables.
    #[must_use]
    pub fn find<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            find: vars.into_iter().map(Into::into).collect(),
            clauses: Vec::new(),
        }
    }

    /// Adds a clause.
    #[must_use]
    pub fn where_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_clauses() {
        let q = Query::find(["?id", "?v"])
            .where_clause(Clause::new(Term::var("?id"), Term::wild(), Term::var("?v")));
        assert_eq!(q.find, vec!["?id".to_string(), "?v".to_string()]);
        assert_eq!(q.clauses.len(), 1);
    }

    #[test]
    fn term_debug_is_stable() {
        let t = Term::binary(|_, _| true, Operand::lit(1i64), Operand::var("?x"));
        let s = format!("{t:?}");
        assert!(s.contains("Binary"));
        assert!(s.contains("?x"));
    }
}
