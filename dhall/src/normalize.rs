//! β-reduction plus primitive-rule reduction for the built-in
//! folds/builders (spec.md §4.4).
//!
//! Normalization is not guaranteed to terminate on ill-typed input — the
//! `Natural/fold` unrolling loop below is only finite because
//! well-typedness guarantees its first argument really is a `NaturalLit`
//! (spec.md §7, §9).
use std::collections::BTreeMap;

use dhall_core::{rc, Expr, ExprF, Label, LetBinding};

use crate::subst::subst;

/// Reduce an expression to normal form. Payload-generic: `Embed` is never
/// inspected or descended into (spec.md §4.4, last bullet).
pub fn normalize<A: Clone>(e: &Expr<A>) -> Expr<A> {
    use ExprF::*;
    match e.as_ref() {
        App(f, a) => {
            let f = normalize(f);
            let a = normalize(a);
            if let Lam(x, _, b) = f.as_ref() {
                return normalize(&subst(x, &a, b));
            }
            let app_expr = rc(App(f, a));
            try_fuse(&app_expr).unwrap_or(app_expr)
        }

        Lets(ls, body) => normalize(&desugar_lets(ls, body)),

        Annot(x, _) => normalize(x),

        Lam(x, t, b) => rc(Lam(x.clone(), normalize(t), normalize(b))),
        Pi(x, t, b) => rc(Pi(x.clone(), normalize(t), normalize(b))),

        BoolAnd(a, b) => {
            let a = normalize(a);
            let b = normalize(b);
            match (a.as_ref(), b.as_ref()) {
                (BoolLit(x), BoolLit(y)) => rc(BoolLit(*x && *y)),
                _ => rc(BoolAnd(a, b)),
            }
        }
        BoolOr(a, b) => {
            let a = normalize(a);
            let b = normalize(b);
            match (a.as_ref(), b.as_ref()) {
                (BoolLit(x), BoolLit(y)) => rc(BoolLit(*x || *y)),
                _ => rc(BoolOr(a, b)),
            }
        }
        BoolIf(c, t, f) => {
            let c = normalize(c);
            match c.as_ref() {
                BoolLit(true) => normalize(t),
                BoolLit(false) => normalize(f),
                _ => rc(BoolIf(c, normalize(t), normalize(f))),
            }
        }

        NaturalPlus(a, b) => {
            let a = normalize(a);
            let b = normalize(b);
            match (a.as_ref(), b.as_ref()) {
                (NaturalLit(x), NaturalLit(y)) => rc(NaturalLit(x + y)),
                _ => rc(NaturalPlus(a, b)),
            }
        }
        NaturalTimes(a, b) => {
            let a = normalize(a);
            let b = normalize(b);
            match (a.as_ref(), b.as_ref()) {
                (NaturalLit(x), NaturalLit(y)) => rc(NaturalLit(x * y)),
                _ => rc(NaturalTimes(a, b)),
            }
        }

        TextAppend(a, b) => {
            let a = normalize(a);
            let b = normalize(b);
            match (a.as_ref(), b.as_ref()) {
                (TextLit(x), TextLit(y)) => rc(TextLit(format!("{}{}", x, y))),
                _ => rc(TextAppend(a, b)),
            }
        }

        Field(r, k) => {
            let r = normalize(r);
            match r.as_ref() {
                RecordLit(kvs) => match kvs.get(k) {
                    Some(v) => normalize(v),
                    None => rc(Field(r, k.clone())),
                },
                _ => rc(Field(r, k.clone())),
            }
        }

        Maybe(t) => rc(Maybe(normalize(t))),
        List(t) => rc(List(normalize(t))),
        ListLit(t, xs) => rc(ListLit(normalize(t), xs.iter().map(normalize).collect())),

        Record(kts) => rc(Record(
            kts.iter()
                .map(|(k, t)| (k.clone(), normalize(t)))
                .collect::<BTreeMap<_, _>>(),
        )),
        RecordLit(kvs) => rc(RecordLit(
            kvs.iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect::<BTreeMap<_, _>>(),
        )),

        Var(_) | Const(_) | Bool | BoolLit(_) | Natural | NaturalLit(_)
        | NaturalFold | Integer | IntegerLit(_) | Double | DoubleLit(_)
        | Text | TextLit(_) | Nothing_ | Just_ | ListBuild | ListFold
        | Embed(_) => e.clone(),
    }
}

/// Desugar `let`s by right-folding into nested substitutions (spec.md
/// §4.4): for the leftmost binding, build `λargs. rhs` and substitute it
/// for the bound name in the (already-desugared) remainder.
///
/// This is independent from how `subst` itself walks a `Lets` block
/// (spec.md §4.3, §9) — both must agree on the final normal form, which
/// is exercised directly in the tests module below.
fn desugar_lets<A: Clone>(ls: &[LetBinding<A>], body: &Expr<A>) -> Expr<A> {
    match ls.split_first() {
        None => body.clone(),
        Some((l, rest)) => {
            let lambda = l.args.iter().rev().fold(l.rhs.clone(), |acc, (n, t)| {
                rc(ExprF::Lam(n.clone(), t.clone(), acc))
            });
            let remainder = desugar_lets(rest, body);
            subst(&l.name, &lambda, &remainder)
        }
    }
}

fn apply_all<A: Clone>(f: Expr<A>, args: &[Expr<A>]) -> Expr<A> {
    args.iter().fold(f, |acc, a| rc(ExprF::App(acc, a.clone())))
}

/// Peel off a chain of `App` nodes, returning the head and the arguments
/// in application order (leftmost argument first).
fn unwind_app<A: Clone>(e: &Expr<A>) -> (Expr<A>, Vec<Expr<A>>) {
    let mut args = Vec::new();
    let mut cur = e.clone();
    while let ExprF::App(f, a) = cur.as_ref() {
        args.push(a.clone());
        cur = f.clone();
    }
    args.reverse();
    (cur, args)
}

/// The three fusion rewrites (spec.md §4.4): `Natural/fold`, `List/build`,
/// `List/fold`. Returns `None` when the application isn't (yet, or ever)
/// saturated with the right shape of arguments, in which case the
/// normally-reconstructed `App` spine is kept as-is.
fn try_fuse<A: Clone>(e: &Expr<A>) -> Option<Expr<A>> {
    use ExprF::*;
    let (head, args) = unwind_app(e);
    match head.as_ref() {
        NaturalFold if args.len() >= 4 => {
            let n = match args[0].as_ref() {
                NaturalLit(n) => *n,
                _ => return None,
            };
            let succ = &args[2];
            let zero = &args[3];
            let mut acc = zero.clone();
            for _ in 0..n {
                acc = normalize(&rc(App(succ.clone(), acc)));
            }
            Some(finish(acc, &args[4..]))
        }
        ListBuild if args.len() >= 2 => {
            let t = &args[0];
            let k = &args[1];
            try_list_build(t, k).map(|lst| finish(lst, &args[2..]))
        }
        ListFold if args.len() >= 5 => {
            let xs = match args[1].as_ref() {
                ListLit(_, xs) => xs,
                _ => return None,
            };
            let cons = &args[3];
            let nil = &args[4];
            let mut acc = nil.clone();
            for x in xs.iter().rev() {
                acc = normalize(&rc(App(rc(App(cons.clone(), x.clone())), acc)));
            }
            Some(finish(acc, &args[5..]))
        }
        _ => None,
    }
}

fn finish<A: Clone>(result: Expr<A>, extra_args: &[Expr<A>]) -> Expr<A> {
    if extra_args.is_empty() {
        result
    } else {
        normalize(&apply_all(result, extra_args))
    }
}

/// `List/build t k` is fused by instantiating `k` at `List t` with the
/// free variables literally named `"Cons"`/`"Nil"` and checking whether
/// the normalized result is a well-formed `Cons`-spine (spec.md §4.4:
/// "Detection is a two-pass scan: a check predicate verifies the spine
/// shape; only if it holds does reconstruction proceed"). Matching on
/// the literal names `"Cons"`/`"Nil"` is fragile under shadowing — spec.md
/// §9 calls this out explicitly as a hazard to preserve, not fix.
fn try_list_build<A: Clone>(t: &Expr<A>, k: &Expr<A>) -> Option<Expr<A>> {
    use ExprF::*;
    let cons: Label = "Cons".into();
    let nil: Label = "Nil".into();
    let probe = apply_all(
        k.clone(),
        &[rc(List(t.clone())), rc(Var(cons.clone())), rc(Var(nil.clone()))],
    );
    let probe_nf = normalize(&probe);

    let mut elems = Vec::new();
    let mut cur = probe_nf;
    loop {
        match cur.as_ref() {
            Var(n) if *n == nil => return Some(rc(ListLit(t.clone(), elems))),
            App(f1, rest) => match f1.as_ref() {
                App(f0, elem) => match f0.as_ref() {
                    Var(n) if *n == cons => {
                        elems.push(elem.clone());
                        cur = rest.clone();
                    }
                    _ => return None,
                },
                _ => return None,
            },
            _ => return None,
        }
    }
}

/// Exceeding the recursion-depth budget is a caller-visible error, never
/// undefined behavior, on a fixed-size call stack (spec.md §5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: usize,
}

impl std::fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "expression nesting exceeds the configured depth limit ({})",
            self.limit
        )
    }
}
impl std::error::Error for DepthExceeded {}

/// Shared by `subst`'s and `equivalence`'s checked entry points too: all
/// three walks recurse on the same tree shape, so the same depth bound
/// protects all of them against the same fixed-size call stack.
pub(crate) fn syntactic_depth<A>(e: &Expr<A>) -> usize {
    use ExprF::*;
    match e.as_ref() {
        Var(_) | Const(_) | Bool | BoolLit(_) | Natural | NaturalLit(_)
        | NaturalFold | Integer | IntegerLit(_) | Double | DoubleLit(_)
        | Text | TextLit(_) | Nothing_ | Just_ | ListBuild | ListFold
        | Embed(_) => 1,
        Lam(_, a, b) | Pi(_, a, b) => 1 + syntactic_depth(a).max(syntactic_depth(b)),
        App(a, b) | BoolAnd(a, b) | BoolOr(a, b) | NaturalPlus(a, b)
        | NaturalTimes(a, b) | TextAppend(a, b) | Annot(a, b) => {
            1 + syntactic_depth(a).max(syntactic_depth(b))
        }
        BoolIf(a, b, c) => {
            1 + syntactic_depth(a).max(syntactic_depth(b)).max(syntactic_depth(c))
        }
        Maybe(a) | List(a) | Field(a, _) => 1 + syntactic_depth(a),
        ListLit(t, xs) => {
            1 + xs.iter().map(syntactic_depth).fold(syntactic_depth(t), usize::max)
        }
        Record(kts) => 1 + kts.values().map(syntactic_depth).max().unwrap_or(0),
        RecordLit(kvs) => 1 + kvs.values().map(syntactic_depth).max().unwrap_or(0),
        Lets(ls, body) => {
            let bindings_max = ls
                .iter()
                .flat_map(|l| {
                    l.args
                        .iter()
                        .map(|(_, t)| syntactic_depth(t))
                        .chain(std::iter::once(syntactic_depth(&l.rhs)))
                })
                .max()
                .unwrap_or(0);
            1 + bindings_max.max(syntactic_depth(body))
        }
    }
}

/// As `normalize`, but rejects input whose syntactic nesting exceeds
/// `max_depth` up front instead of risking a stack overflow while
/// recursing (spec.md §5 / SPEC_FULL.md §12.5).
pub fn normalize_checked<A: Clone>(
    e: &Expr<A>,
    max_depth: usize,
) -> Result<Expr<A>, DepthExceeded> {
    if syntactic_depth(e) > max_depth {
        return Err(DepthExceeded { limit: max_depth });
    }
    Ok(normalize(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhall_core::{builder::*, X};

    #[test]
    fn beta_reduces_and_folds_arithmetic() {
        // (λ(x : Natural) → x + +1) +2  ⇒  +3
        let e: Expr<X> = app(
            lam("x", natural(), rc(ExprF::NaturalPlus(v("x"), natural_lit(1)))),
            natural_lit(2),
        );
        assert_eq!(normalize(&e), natural_lit(3));
    }

    #[test]
    fn if_true_picks_then_branch() {
        let e: Expr<X> = rc(ExprF::BoolIf(bool_lit(true), natural_lit(1), natural_lit(2)));
        assert_eq!(normalize(&e), natural_lit(1));
    }

    #[test]
    fn record_projection_on_literal() {
        let e: Expr<X> = field(
            record_lit(vec![
                (Label::from("foo"), bool_lit(true)),
                (Label::from("bar"), text_lit("hi")),
            ]),
            "bar",
        );
        assert_eq!(normalize(&e), text_lit("hi"));
    }

    #[test]
    fn list_build_cons_nil_fuses_to_list_literal() {
        let k: Expr<X> = lam(
            "list",
            const_type(),
            lam(
                "cons",
                pi("_", natural(), pi("_", v("list"), v("list"))),
                lam(
                    "nil",
                    v("list"),
                    app(
                        app(v("cons"), natural_lit(1)),
                        app(app(v("cons"), natural_lit(2)), v("nil")),
                    ),
                ),
            ),
        );
        let e: Expr<X> = apps(rc(ExprF::ListBuild), vec![natural(), k]);
        assert_eq!(
            normalize(&e),
            list_lit(natural(), vec![natural_lit(1), natural_lit(2)])
        );
    }

    #[test]
    fn list_fold_folds_a_literal_list() {
        let xs: Expr<X> = list_lit(natural(), vec![natural_lit(1), natural_lit(2)]);
        let cons: Expr<X> = lam(
            "x",
            natural(),
            lam("acc", natural(), rc(ExprF::NaturalPlus(v("x"), v("acc")))),
        );
        let e: Expr<X> = apps(
            rc(ExprF::ListFold),
            vec![natural(), xs, natural(), cons, natural_lit(0)],
        );
        assert_eq!(normalize(&e), natural_lit(3));
    }

    #[test]
    fn natural_fold_unrolls_succ_applications() {
        let succ: Expr<X> = lam("x", natural(), rc(ExprF::NaturalPlus(v("x"), natural_lit(1))));
        let e: Expr<X> = apps(
            rc(ExprF::NaturalFold),
            vec![natural_lit(3), natural(), succ, natural_lit(0)],
        );
        assert_eq!(normalize(&e), natural_lit(3));
    }

    #[test]
    fn malformed_list_build_spine_is_left_unreduced() {
        // `k` ignores `cons`/`nil` and just returns a literal, which is
        // not itself `Nil` — the check predicate must reject this.
        let k: Expr<X> = lam(
            "list",
            const_type(),
            lam(
                "cons",
                pi("_", natural(), pi("_", v("list"), v("list"))),
                lam("nil", v("list"), natural_lit(0)),
            ),
        );
        let e: Expr<X> = apps(rc(ExprF::ListBuild), vec![natural(), k]);
        let result = normalize(&e);
        assert!(matches!(result.as_ref(), ExprF::App(_, _)));
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let e: Expr<X> = app(
            lam("x", natural(), rc(ExprF::NaturalPlus(v("x"), natural_lit(1)))),
            natural_lit(2),
        );
        let once = normalize(&e);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn lets_and_normalize_agree_on_desugaring() {
        // let f (x : Natural) = x + +1 in f +2
        let lets: Expr<X> = rc(ExprF::Lets(
            vec![LetBinding::new(
                Label::from("f"),
                vec![(Label::from("x"), natural())],
                rc(ExprF::NaturalPlus(v("x"), natural_lit(1))),
            )],
            app(v("f"), natural_lit(2)),
        ));
        assert_eq!(normalize(&lets), natural_lit(3));
    }

    #[test]
    fn depth_checked_rejects_deep_input() {
        let mut e: Expr<X> = natural_lit(0);
        for _ in 0..50 {
            e = rc(ExprF::NaturalPlus(e, natural_lit(1)));
        }
        assert!(normalize_checked(&e, 10).is_err());
        assert!(normalize_checked(&e, 1000).is_ok());
    }
}
