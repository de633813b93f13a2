//! `e₁ ≡ e₂` (spec.md §4.5): normalize both sides, then decide
//! α-equivalence with a correspondence stack of bound-name pairs.
//!
//! This is the boundary-level equivalence operation. It is deliberately
//! kept separate from the type checker's internal fast-path comparisons
//! (`dhall::typecheck`, spec.md §9 "Structural vs. equivalence
//! comparison in the type checker"), which compare already-normalized
//! subterms with plain syntactic `==` and never re-run this walk.
use dhall_core::{Expr, ExprF, Label};

use crate::normalize::{normalize, syntactic_depth, DepthExceeded};

/// Is `xl` (as seen on the left) the same bound variable as `xr` (as seen
/// on the right), given the stack of name-pairs introduced by enclosing
/// binders? Plays the role a de-Bruijn-shift comparison would, but over
/// names directly since this calculus carries no indices.
fn same_bound_name(xl: &Label, xr: &Label, ctx: &[(Label, Label)]) -> bool {
    // Find the innermost binder each name resolves to; they must be the
    // same frame. A name that resolves to no frame on either side (i.e.
    // the same free variable on both sides) is also accepted.
    let resolved_l = ctx.iter().rev().position(|(l, _)| l == xl);
    let resolved_r = ctx.iter().rev().position(|(_, r)| r == xr);
    match (resolved_l, resolved_r) {
        (Some(il), Some(ir)) => il == ir,
        (None, None) => xl == xr,
        _ => false,
    }
}

fn go<A: PartialEq>(ctx: &mut Vec<(Label, Label)>, el: &Expr<A>, er: &Expr<A>) -> bool {
    use ExprF::*;
    match (el.as_ref(), er.as_ref()) {
        (Const(a), Const(b)) => a == b,
        (Var(xl), Var(xr)) => same_bound_name(xl, xr, ctx),
        (Lam(xl, tl, bl), Lam(xr, tr, br)) | (Pi(xl, tl, bl), Pi(xr, tr, br)) => {
            if !go(ctx, tl, tr) {
                return false;
            }
            ctx.push((xl.clone(), xr.clone()));
            let eq = go(ctx, bl, br);
            ctx.pop();
            eq
        }
        (App(fl, al), App(fr, ar)) => go(ctx, fl, fr) && go(ctx, al, ar),
        (Annot(xl, tl), Annot(xr, tr)) => go(ctx, xl, xr) && go(ctx, tl, tr),

        (Bool, Bool) | (Natural, Natural) | (NaturalFold, NaturalFold)
        | (Integer, Integer) | (Double, Double) | (Text, Text)
        | (ListBuild, ListBuild) | (ListFold, ListFold) | (Nothing_, Nothing_)
        | (Just_, Just_) => true,
        (BoolLit(a), BoolLit(b)) => a == b,
        (NaturalLit(a), NaturalLit(b)) => a == b,
        (IntegerLit(a), IntegerLit(b)) => a == b,
        (DoubleLit(a), DoubleLit(b)) => a == b,
        (TextLit(a), TextLit(b)) => a == b,
        (Embed(a), Embed(b)) => a == b,

        (BoolAnd(al, bl), BoolAnd(ar, br))
        | (BoolOr(al, bl), BoolOr(ar, br))
        | (NaturalPlus(al, bl), NaturalPlus(ar, br))
        | (NaturalTimes(al, bl), NaturalTimes(ar, br))
        | (TextAppend(al, bl), TextAppend(ar, br)) => go(ctx, al, ar) && go(ctx, bl, br),
        (BoolIf(cl, tl, el_), BoolIf(cr, tr, er_)) => {
            go(ctx, cl, cr) && go(ctx, tl, tr) && go(ctx, el_, er_)
        }

        (Maybe(tl), Maybe(tr)) | (List(tl), List(tr)) => go(ctx, tl, tr),
        (ListLit(tl, xsl), ListLit(tr, xsr)) => {
            go(ctx, tl, tr)
                && xsl.len() == xsr.len()
                && xsl.iter().zip(xsr.iter()).all(|(a, b)| go(ctx, a, b))
        }
        (Field(rl, kl), Field(rr, kr)) => kl == kr && go(ctx, rl, rr),

        (Record(ktsl), Record(ktsr)) | (RecordLit(ktsl), RecordLit(ktsr)) => {
            // BTreeMap iteration is already canonical (ascending) order.
            ktsl.len() == ktsr.len()
                && ktsl
                    .iter()
                    .zip(ktsr.iter())
                    .all(|((kl, vl), (kr, vr))| kl == kr && go(ctx, vl, vr))
        }

        // `Lets` never survives normalization (spec.md §4.4), so it
        // cannot appear on either side here.
        (Lets(_, _), _) | (_, Lets(_, _)) => unreachable!("equivalence operates on normal forms"),

        (_, _) => false,
    }
}

/// `e₁ ≡ e₂`: normalize both sides and decide α-equivalence.
pub fn equivalent<A: Clone + PartialEq>(e1: &Expr<A>, e2: &Expr<A>) -> bool {
    let n1 = normalize(e1);
    let n2 = normalize(e2);
    go(&mut Vec::new(), &n1, &n2)
}

/// As `equivalent`, but rejects either side up front if its syntactic
/// nesting exceeds `max_depth` (spec.md §5 / SPEC_FULL.md §12.5).
pub fn equivalent_checked<A: Clone + PartialEq>(
    e1: &Expr<A>,
    e2: &Expr<A>,
    max_depth: usize,
) -> Result<bool, DepthExceeded> {
    if syntactic_depth(e1) > max_depth || syntactic_depth(e2) > max_depth {
        return Err(DepthExceeded { limit: max_depth });
    }
    Ok(equivalent(e1, e2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhall_core::{builder::*, rc, X};

    #[test]
    fn reflexive_on_a_literal() {
        let e: Expr<X> = natural_lit(2);
        assert!(equivalent(&e, &e));
    }

    #[test]
    fn alpha_equivalent_lambdas_are_equivalent() {
        let e1: Expr<X> = lam("x", bool_(), v("x"));
        let e2: Expr<X> = lam("y", bool_(), v("y"));
        assert!(equivalent(&e1, &e2));
    }

    #[test]
    fn distinct_bound_variable_usage_is_not_equivalent() {
        // λ(x:Bool) → λ(y:Bool) → x  vs.  λ(x:Bool) → λ(y:Bool) → y
        let e1: Expr<X> = lam("x", bool_(), lam("y", bool_(), v("x")));
        let e2: Expr<X> = lam("x", bool_(), lam("y", bool_(), v("y")));
        assert!(!equivalent(&e1, &e2));
    }

    #[test]
    fn equivalence_holds_up_to_normalization() {
        // (λ(x:Natural)→x) +2  ≡  +2
        let e1: Expr<X> = app(lam("x", natural(), v("x")), natural_lit(2));
        let e2: Expr<X> = natural_lit(2);
        assert!(equivalent(&e1, &e2));
    }

    #[test]
    fn record_field_order_does_not_affect_equivalence() {
        let e1: Expr<X> = record_lit(vec![
            (Label::from("a"), bool_lit(true)),
            (Label::from("b"), natural_lit(1)),
        ]);
        let e2: Expr<X> = record_lit(vec![
            (Label::from("b"), natural_lit(1)),
            (Label::from("a"), bool_lit(true)),
        ]);
        assert!(equivalent(&e1, &e2));
    }

    #[test]
    fn different_constants_are_not_equivalent() {
        let e1: Expr<X> = rc(ExprF::Const(dhall_core::Const::Type));
        let e2: Expr<X> = rc(ExprF::Const(dhall_core::Const::Kind));
        assert!(!equivalent(&e1, &e2));
    }

    #[test]
    fn depth_checked_rejects_deep_input() {
        let mut e: Expr<X> = natural_lit(0);
        for _ in 0..50 {
            e = rc(ExprF::NaturalPlus(e, natural_lit(1)));
        }
        let small: Expr<X> = natural_lit(0);
        assert!(equivalent_checked(&e, &small, 10).is_err());
        assert!(equivalent_checked(&e, &small, 1000).is_ok());
    }
}
