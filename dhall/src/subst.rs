//! Capture-avoiding substitution (spec.md §4.3).
//!
//! Capture is avoided by *shadowing*, not by renaming: under a binder that
//! reuses the name being substituted, the body is left untouched while the
//! binder's own type annotation is still substituted into. No fresh names
//! are ever generated — sound here because every `Embed` payload is closed
//! (spec.md §9, "Capture avoidance without renaming").
use std::collections::BTreeMap;

use dhall_core::{rc, Expr, ExprF, Label};

use crate::normalize::{syntactic_depth, DepthExceeded};

/// As `subst`, but rejects a `t` whose syntactic nesting exceeds
/// `max_depth` up front rather than risking a stack overflow while
/// recursing (spec.md §5 / SPEC_FULL.md §12.5).
pub fn subst_checked<A: Clone>(
    x: &Label,
    e0: &Expr<A>,
    t: &Expr<A>,
    max_depth: usize,
) -> Result<Expr<A>, DepthExceeded> {
    if syntactic_depth(t) > max_depth {
        return Err(DepthExceeded { limit: max_depth });
    }
    Ok(subst(x, e0, t))
}

/// `subst x e0 t` — replace free occurrences of `x` in `t` by `e0`.
pub fn subst<A: Clone>(x: &Label, e0: &Expr<A>, t: &Expr<A>) -> Expr<A> {
    use ExprF::*;
    match t.as_ref() {
        Var(y) => {
            if y == x {
                e0.clone()
            } else {
                t.clone()
            }
        }
        Lam(y, a, b) => {
            let a = subst(x, e0, a);
            let b = if y == x { b.clone() } else { subst(x, e0, b) };
            rc(Lam(y.clone(), a, b))
        }
        Pi(y, a, b) => {
            let a = subst(x, e0, a);
            let b = if y == x { b.clone() } else { subst(x, e0, b) };
            rc(Pi(y.clone(), a, b))
        }
        App(f, a) => rc(App(subst(x, e0, f), subst(x, e0, a))),
        Lets(ls, body) => {
            let mut in_scope = true;
            let mut new_ls = Vec::with_capacity(ls.len());
            for l in ls {
                let mut local_flag = in_scope;
                let mut new_args = Vec::with_capacity(l.args.len());
                for (name, ty) in &l.args {
                    let ty = if local_flag {
                        subst(x, e0, ty)
                    } else {
                        ty.clone()
                    };
                    new_args.push((name.clone(), ty));
                    if name == x {
                        local_flag = false;
                    }
                }
                let rhs = if local_flag {
                    subst(x, e0, &l.rhs)
                } else {
                    l.rhs.clone()
                };
                new_ls.push(dhall_core::LetBinding {
                    name: l.name.clone(),
                    args: new_args,
                    rhs,
                });
                if &l.name == x {
                    in_scope = false;
                }
            }
            let body = if in_scope {
                subst(x, e0, body)
            } else {
                body.clone()
            };
            rc(Lets(new_ls, body))
        }
        Annot(a, ty) => rc(Annot(subst(x, e0, a), subst(x, e0, ty))),

        Const(_) | Bool | Natural | NaturalFold | Integer | Double | Text
        | ListBuild | ListFold | Nothing_ | Just_ | BoolLit(_) | NaturalLit(_)
        | IntegerLit(_) | DoubleLit(_) | TextLit(_) | Embed(_) => t.clone(),

        BoolAnd(a, b) => rc(BoolAnd(subst(x, e0, a), subst(x, e0, b))),
        BoolOr(a, b) => rc(BoolOr(subst(x, e0, a), subst(x, e0, b))),
        BoolIf(c, a, b) => {
            rc(BoolIf(subst(x, e0, c), subst(x, e0, a), subst(x, e0, b)))
        }
        NaturalPlus(a, b) => rc(NaturalPlus(subst(x, e0, a), subst(x, e0, b))),
        NaturalTimes(a, b) => rc(NaturalTimes(subst(x, e0, a), subst(x, e0, b))),
        TextAppend(a, b) => rc(TextAppend(subst(x, e0, a), subst(x, e0, b))),

        Maybe(a) => rc(Maybe(subst(x, e0, a))),
        List(a) => rc(List(subst(x, e0, a))),
        ListLit(ty, xs) => rc(ListLit(
            subst(x, e0, ty),
            xs.iter().map(|e| subst(x, e0, e)).collect(),
        )),

        Record(kts) => rc(Record(
            kts.iter()
                .map(|(k, v)| (k.clone(), subst(x, e0, v)))
                .collect::<BTreeMap<_, _>>(),
        )),
        RecordLit(kvs) => rc(RecordLit(
            kvs.iter()
                .map(|(k, v)| (k.clone(), subst(x, e0, v)))
                .collect::<BTreeMap<_, _>>(),
        )),
        Field(r, k) => rc(Field(subst(x, e0, r), k.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhall_core::{builder::*, X};

    #[test]
    fn substitutes_free_variable() {
        let e0: Expr<X> = bool_lit(true);
        let t: Expr<X> = v("x");
        assert_eq!(subst(&Label::from("x"), &e0, &t), e0);
    }

    #[test]
    fn leaves_other_variables_alone() {
        let e0: Expr<X> = bool_lit(true);
        let t: Expr<X> = v("y");
        assert_eq!(subst(&Label::from("x"), &e0, &t), t);
    }

    #[test]
    fn shadowing_lambda_body_is_untouched() {
        // subst x e (λ(x : Bool) → x) = λ(x : subst x e Bool) → x
        let e0: Expr<X> = bool_lit(true);
        let body: Expr<X> = lam("x", bool_(), v("x"));
        let result = subst(&Label::from("x"), &e0, &body);
        assert_eq!(result, body);
    }

    #[test]
    fn substitutes_into_binder_type_even_when_shadowed() {
        let e0: Expr<X> = bool_lit(true);
        // λ(x : x) → x  — the annotation's `x` is still free there
        let body: Expr<X> = lam("x", v("x"), v("x"));
        let result = subst(&Label::from("x"), &e0, &body);
        assert_eq!(result, lam("x", bool_lit(true), v("x")));
    }

    #[test]
    fn distributes_through_application() {
        let e0: Expr<X> = natural_lit(2);
        let t: Expr<X> = app(v("x"), v("x"));
        let result = subst(&Label::from("x"), &e0, &t);
        assert_eq!(result, app(natural_lit(2), natural_lit(2)));
    }

    #[test]
    fn depth_checked_rejects_deep_input() {
        let mut t: Expr<X> = v("x");
        for _ in 0..50 {
            t = app(t, natural_lit(0));
        }
        let e0: Expr<X> = natural_lit(1);
        assert!(subst_checked(&Label::from("x"), &e0, &t, 10).is_err());
        assert!(subst_checked(&Label::from("x"), &e0, &t, 1000).is_ok());
    }
}
