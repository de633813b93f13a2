//! Small helper constructors for building `Expr` trees directly in Rust.
//!
//! This is the "builder used for error messages" spec.md §1 keeps in
//! scope. Primitive types and error-message subexpressions could instead
//! be built with a `dhall_expr!`-style quasiquote macro that embeds
//! *surface syntax*, but that needs a parser; since the parser is out of
//! scope, plain functions give the same ergonomics without one.
use std::collections::BTreeMap;

use crate::expr::{rc, Const, Expr, ExprF, LetBinding};
use crate::label::Label;

pub fn const_type<A>() -> Expr<A> {
    rc(ExprF::Const(Const::Type))
}
pub fn const_kind<A>() -> Expr<A> {
    rc(ExprF::Const(Const::Kind))
}

pub fn v<A>(name: impl Into<Label>) -> Expr<A> {
    Expr::var(name)
}

pub fn lam<A>(x: impl Into<Label>, t: Expr<A>, b: Expr<A>) -> Expr<A> {
    rc(ExprF::Lam(x.into(), t, b))
}

/// `Pi "_" a b` renders as `a -> b`; callers wanting a non-dependent
/// function type should pass `"_"`.
pub fn pi<A>(x: impl Into<Label>, t: Expr<A>, b: Expr<A>) -> Expr<A> {
    rc(ExprF::Pi(x.into(), t, b))
}

pub fn fn_type<A>(from: Expr<A>, to: Expr<A>) -> Expr<A> {
    pi("_", from, to)
}

pub fn app<A>(f: Expr<A>, a: Expr<A>) -> Expr<A> {
    rc(ExprF::App(f, a))
}

pub fn apps<A>(f: Expr<A>, args: impl IntoIterator<Item = Expr<A>>) -> Expr<A> {
    args.into_iter().fold(f, app)
}

pub fn let_in<A>(bindings: Vec<LetBinding<A>>, body: Expr<A>) -> Expr<A> {
    rc(ExprF::Lets(bindings, body))
}

pub fn bool_<A>() -> Expr<A> {
    rc(ExprF::Bool)
}
pub fn bool_lit<A>(b: bool) -> Expr<A> {
    rc(ExprF::BoolLit(b))
}
pub fn natural<A>() -> Expr<A> {
    rc(ExprF::Natural)
}
pub fn natural_lit<A>(n: u64) -> Expr<A> {
    rc(ExprF::NaturalLit(n))
}
pub fn integer<A>() -> Expr<A> {
    rc(ExprF::Integer)
}
pub fn integer_lit<A>(n: i64) -> Expr<A> {
    rc(ExprF::IntegerLit(n))
}
pub fn double_<A>() -> Expr<A> {
    rc(ExprF::Double)
}
pub fn text<A>() -> Expr<A> {
    rc(ExprF::Text)
}
pub fn text_lit<A>(s: impl Into<String>) -> Expr<A> {
    rc(ExprF::TextLit(s.into()))
}

pub fn maybe<A>(t: Expr<A>) -> Expr<A> {
    rc(ExprF::Maybe(t))
}
pub fn list<A>(t: Expr<A>) -> Expr<A> {
    rc(ExprF::List(t))
}
pub fn list_lit<A>(t: Expr<A>, xs: Vec<Expr<A>>) -> Expr<A> {
    rc(ExprF::ListLit(t, xs))
}

pub fn record_type<A>(kts: impl IntoIterator<Item = (Label, Expr<A>)>) -> Expr<A> {
    rc(ExprF::Record(kts.into_iter().collect::<BTreeMap<_, _>>()))
}
pub fn record_lit<A>(kvs: impl IntoIterator<Item = (Label, Expr<A>)>) -> Expr<A> {
    rc(ExprF::RecordLit(kvs.into_iter().collect::<BTreeMap<_, _>>()))
}
pub fn field<A>(r: Expr<A>, k: impl Into<Label>) -> Expr<A> {
    rc(ExprF::Field(r, k.into()))
}

/// `forall(a : Type) -> a -> a`-shaped quantifier over one type variable,
/// handy for the `Nothing_`/`Just_`/`*Fold`/`*Build` primitive types
/// (spec.md §4.6), which are all "forall(a : Type) -> ...".
pub fn forall_a<A>(a: Label, body: Expr<A>) -> Expr<A> {
    pi(a, const_type(), body)
}
