use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::label::Label;

/// The sort tag. Two sorts, one axiom (`Type : Kind`), matching the
/// reduced PTS this calculus implements (spec.md §3, §4.6) — the real
/// `dhall-rust` additionally carries a `Sort` above `Kind`, which this
/// calculus deliberately drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Const {
    Type,
    Kind,
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Const::Type => f.write_str("Type"),
            Const::Kind => f.write_str("Kind"),
        }
    }
}

/// Where an `Embed` payload points. The core never looks past structural
/// equality on this (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Path {
    File(PathBuf),
    URL(String),
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Path::File(p) => write!(f, "{}", p.display()),
            Path::URL(u) => write!(f, "{}", u),
        }
    }
}

/// The uninhabited payload type, used once all `Embed`s have been
/// resolved away. Modeled as a zero-variant enum so the compiler proves
/// any `X` is unreachable; see `X::absurd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum X {}

impl X {
    /// Eliminate an impossible value to anything. Never actually called:
    /// its body is unreachable because `X` has no constructors.
    pub fn absurd<T>(&self) -> T {
        match *self {}
    }
}

impl fmt::Display for X {
    fn fmt(&self, _f: &mut fmt::Formatter) -> fmt::Result {
        self.absurd()
    }
}

/// `f64` wrapper giving us `Eq`/`Ord`/`Hash` via the bit pattern, so that
/// `Expr` as a whole can support structural equality (needed by the
/// type checker's syntactic `==`, spec.md §4.6/§9).
#[derive(Debug, Clone, Copy)]
pub struct NaiveDouble(f64);

impl From<f64> for NaiveDouble {
    fn from(x: f64) -> Self {
        NaiveDouble(x)
    }
}
impl From<NaiveDouble> for f64 {
    fn from(x: NaiveDouble) -> Self {
        x.0
    }
}
impl PartialEq for NaiveDouble {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for NaiveDouble {}
impl fmt::Display for NaiveDouble {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One binding of a `let f a1 : t1 ... an : tn = rhs` group (spec.md §3,
/// "Let binding group"). `args` may be empty, in which case the group is
/// a plain `let f = rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetBinding<A> {
    pub name: Label,
    pub args: Vec<(Label, Expr<A>)>,
    pub rhs: Expr<A>,
}

impl<A> LetBinding<A> {
    pub fn new(name: Label, args: Vec<(Label, Expr<A>)>, rhs: Expr<A>) -> Self {
        LetBinding { name, args, rhs }
    }
}

/// The expression functor: one layer of the tree, parameterized over the
/// type of subexpressions (always `Expr<A>` once tied the knot) and over
/// the embedded-reference payload `A`. Named `ExprF` for the same reason
/// any such functor is: it mirrors `Expr` in shape but isn't recursive
/// itself — see `Expr` below, which is where the indirection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprF<A> {
    Const(Const),
    Var(Label),
    Lam(Label, Expr<A>, Expr<A>),
    Pi(Label, Expr<A>, Expr<A>),
    App(Expr<A>, Expr<A>),
    Lets(Vec<LetBinding<A>>, Expr<A>),
    Annot(Expr<A>, Expr<A>),

    Bool,
    BoolLit(bool),
    BoolAnd(Expr<A>, Expr<A>),
    BoolOr(Expr<A>, Expr<A>),
    BoolIf(Expr<A>, Expr<A>, Expr<A>),

    Natural,
    NaturalLit(u64),
    NaturalFold,
    NaturalPlus(Expr<A>, Expr<A>),
    NaturalTimes(Expr<A>, Expr<A>),

    Integer,
    IntegerLit(i64),

    Double,
    DoubleLit(NaiveDouble),

    Text,
    TextLit(String),
    TextAppend(Expr<A>, Expr<A>),

    Maybe(Expr<A>),
    Nothing_,
    Just_,

    List(Expr<A>),
    ListLit(Expr<A>, Vec<Expr<A>>),
    ListBuild,
    ListFold,

    /// Ordered ascending by key, per spec.md's "canonical order" invariant.
    /// Using a `BTreeMap` makes this an invariant of the representation
    /// rather than something each consumer must remember to sort for at
    /// comparison and printing time.
    Record(BTreeMap<Label, Expr<A>>),
    RecordLit(BTreeMap<Label, Expr<A>>),
    Field(Expr<A>, Label),

    Embed(A),
}

/// The recursive tree, tying the `ExprF` knot behind an `Rc` so cloning a
/// subexpression (ubiquitous in substitution and normalization) is O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr<A>(Rc<ExprF<A>>);

pub fn rc<A>(x: ExprF<A>) -> Expr<A> {
    Expr(Rc::new(x))
}

impl<A> std::ops::Deref for Expr<A> {
    type Target = ExprF<A>;
    fn deref(&self) -> &ExprF<A> {
        &self.0
    }
}

impl<A> Expr<A> {
    pub fn as_ref(&self) -> &ExprF<A> {
        &self.0
    }

    pub fn var(x: impl Into<Label>) -> Self {
        rc(ExprF::Var(x.into()))
    }

    pub fn embed(a: A) -> Self {
        rc(ExprF::Embed(a))
    }

    /// `map f e` — functorial action on the embedded payload, leaving
    /// every binder and constructor shape untouched (spec.md §4.2).
    pub fn map<B>(&self, f: &mut impl FnMut(&A) -> B) -> Expr<B> {
        self.bind(&mut |a| Expr::embed(f(a)))
    }

    /// `bind k e` — replace every `Embed p` by the subexpression `k(p)`,
    /// threading through all binders without renaming, since `Embed`
    /// payloads are always closed (spec.md §4.2).
    pub fn bind<B>(&self, k: &mut impl FnMut(&A) -> Expr<B>) -> Expr<B> {
        use ExprF::*;
        let e = match self.as_ref() {
            Const(c) => Const(*c),
            Var(x) => Var(x.clone()),
            Lam(x, t, b) => Lam(x.clone(), t.bind(k), b.bind(k)),
            Pi(x, t, b) => Pi(x.clone(), t.bind(k), b.bind(k)),
            App(f, a) => App(f.bind(k), a.bind(k)),
            Lets(ls, e) => Lets(
                ls.iter()
                    .map(|l| LetBinding {
                        name: l.name.clone(),
                        args: l
                            .args
                            .iter()
                            .map(|(n, t)| (n.clone(), t.bind(k)))
                            .collect(),
                        rhs: l.rhs.bind(k),
                    })
                    .collect(),
                e.bind(k),
            ),
            Annot(x, t) => Annot(x.bind(k), t.bind(k)),
            Bool => Bool,
            BoolLit(b) => BoolLit(*b),
            BoolAnd(x, y) => BoolAnd(x.bind(k), y.bind(k)),
            BoolOr(x, y) => BoolOr(x.bind(k), y.bind(k)),
            BoolIf(c, t, e) => BoolIf(c.bind(k), t.bind(k), e.bind(k)),
            Natural => Natural,
            NaturalLit(n) => NaturalLit(*n),
            NaturalFold => NaturalFold,
            NaturalPlus(x, y) => NaturalPlus(x.bind(k), y.bind(k)),
            NaturalTimes(x, y) => NaturalTimes(x.bind(k), y.bind(k)),
            Integer => Integer,
            IntegerLit(n) => IntegerLit(*n),
            Double => Double,
            DoubleLit(n) => DoubleLit(*n),
            Text => Text,
            TextLit(s) => TextLit(s.clone()),
            TextAppend(x, y) => TextAppend(x.bind(k), y.bind(k)),
            Maybe(t) => Maybe(t.bind(k)),
            Nothing_ => Nothing_,
            Just_ => Just_,
            List(t) => List(t.bind(k)),
            ListLit(t, xs) => {
                ListLit(t.bind(k), xs.iter().map(|x| x.bind(k)).collect())
            }
            ListBuild => ListBuild,
            ListFold => ListFold,
            Record(kts) => {
                Record(kts.iter().map(|(l, t)| (l.clone(), t.bind(k))).collect())
            }
            RecordLit(kvs) => RecordLit(
                kvs.iter().map(|(l, v)| (l.clone(), v.bind(k))).collect(),
            ),
            Field(r, l) => Field(r.bind(k), l.clone()),
            Embed(a) => return k(a),
        };
        rc(e)
    }
}

impl Expr<X> {
    /// An `Expr<X>` has no embeds left; lift it to any other payload
    /// type without touching the tree (spec.md §3: "X (uninhabited)").
    pub fn vacuous<B>(&self) -> Expr<B> {
        self.bind(&mut |a: &X| a.absurd())
    }
}

impl<A> Expr<A> {
    /// Does this expression have any free variable at all? Walks the
    /// tree tracking the names bound so far, the same shape of walk
    /// substitution and equivalence both do.
    pub fn is_closed(&self) -> bool {
        fn go<A>(e: &Expr<A>, bound: &mut Vec<Label>) -> bool {
            use ExprF::*;
            match e.as_ref() {
                Var(x) => bound.contains(x),
                Lam(x, t, b) | Pi(x, t, b) => {
                    if !go(t, bound) {
                        return false;
                    }
                    bound.push(x.clone());
                    let ok = go(b, bound);
                    bound.pop();
                    ok
                }
                App(f, a) => go(f, bound) && go(a, bound),
                Lets(ls, body) => {
                    let base = bound.len();
                    let mut ok = true;
                    for l in ls {
                        let before_args = bound.len();
                        for (n, t) in &l.args {
                            ok = ok && go(t, bound);
                            bound.push(n.clone());
                        }
                        ok = ok && go(&l.rhs, bound);
                        bound.truncate(before_args);
                        bound.push(l.name.clone());
                    }
                    ok = ok && go(body, bound);
                    bound.truncate(base);
                    ok
                }
                Annot(x, t) => go(x, bound) && go(t, bound),
                BoolAnd(x, y) | BoolOr(x, y) | NaturalPlus(x, y) | NaturalTimes(x, y)
                | TextAppend(x, y) => go(x, bound) && go(y, bound),
                BoolIf(c, t, e) => go(c, bound) && go(t, bound) && go(e, bound),
                Maybe(t) | List(t) => go(t, bound),
                ListLit(t, xs) => go(t, bound) && xs.iter().all(|x| go(x, bound)),
                Record(kts) => kts.values().all(|t| go(t, bound)),
                RecordLit(kvs) => kvs.values().all(|v| go(v, bound)),
                Field(r, _) => go(r, bound),
                Const(_) | Bool | BoolLit(_) | Natural | NaturalLit(_) | NaturalFold
                | Integer | IntegerLit(_) | Double | DoubleLit(_) | Text | TextLit(_)
                | Nothing_ | Just_ | ListBuild | ListFold | Embed(_) => true,
            }
        }
        go(self, &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_lambda_over_its_own_variable_is_closed() {
        let e: Expr<X> = rc(ExprF::Lam(
            Label::from("x"),
            rc(ExprF::Bool),
            Expr::var("x"),
        ));
        assert!(e.is_closed());
    }

    #[test]
    fn a_bare_variable_is_not_closed() {
        let e: Expr<X> = Expr::var("x");
        assert!(!e.is_closed());
    }

    #[test]
    fn a_let_body_referencing_only_bound_names_is_closed() {
        let e: Expr<X> = rc(ExprF::Lets(
            vec![LetBinding::new(Label::from("x"), vec![], rc(ExprF::NaturalLit(1)))],
            Expr::var("x"),
        ));
        assert!(e.is_closed());
    }
}
