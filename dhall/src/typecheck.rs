//! Synthesis-only type checking over the two-sort PTS (spec.md §4.6).
//!
//! All binders are annotated, so this is inference in the narrow sense of
//! "compute the type of an expression from the types of its parts" rather
//! than unification — there is no solving for unknown types anywhere in
//! this module (spec.md §1, Non-goals: "unification or higher-order
//! inference").
//!
//! Equality checks inside the checker (`Pi`, `App`, `Annot`, `ListLit`,
//! ...) are plain structural `==` on already-normalized subterms, not the
//! boundary `equivalent` operation (`crate::equivalence`) — re-running
//! full equivalence here would renormalize repeatedly and make checking
//! quadratic in expression size (spec.md §9). This matches a known
//! over-strictness in the rules this calculus is distilled from and is
//! reproduced verbatim rather than "fixed" (spec.md §9, SPEC_FULL.md §13).
use std::fmt;

use dhall_core::{rc, Const, Context, Expr, ExprF, Label, LetBinding};
use itertools::Itertools;

use crate::normalize::normalize;
use crate::subst::subst;

use self::TypeMessage::*;

/// `(s1, s2) -> s3` for the four PTS rules this calculus has: `(*,*)->*`,
/// `(□,*)->*`, `(*,□)->□`, `(□,□)->□` (spec.md §4.6 header).
fn pts_rule(a: Const, b: Const) -> Const {
    match (a, b) {
        (_, Const::Type) => Const::Type,
        (Const::Kind, Const::Kind) => Const::Kind,
        (Const::Type, Const::Kind) => Const::Kind,
    }
}

fn natural_fold_type() -> Expr<dhall_core::X> {
    use dhall_core::builder::*;
    fn_type(
        natural(),
        pi(
            "natural",
            const_type(),
            fn_type(fn_type(v("natural"), v("natural")), fn_type(v("natural"), v("natural"))),
        ),
    )
}

fn list_build_type() -> Expr<dhall_core::X> {
    use dhall_core::builder::*;
    pi(
        "a",
        const_type(),
        fn_type(
            pi(
                "list",
                const_type(),
                fn_type(
                    fn_type(v("a"), fn_type(v("list"), v("list"))),
                    fn_type(v("list"), v("list")),
                ),
            ),
            list(v("a")),
        ),
    )
}

fn list_fold_type() -> Expr<dhall_core::X> {
    use dhall_core::builder::*;
    pi(
        "a",
        const_type(),
        fn_type(
            list(v("a")),
            pi(
                "list",
                const_type(),
                fn_type(
                    fn_type(v("a"), fn_type(v("list"), v("list"))),
                    fn_type(v("list"), v("list")),
                ),
            ),
        ),
    )
}

fn nothing_type() -> Expr<dhall_core::X> {
    use dhall_core::builder::*;
    pi("a", const_type(), maybe(v("a")))
}

fn just_type() -> Expr<dhall_core::X> {
    use dhall_core::builder::*;
    pi("a", const_type(), fn_type(v("a"), maybe(v("a"))))
}

/// Which operand of a binary boolean primitive was at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// The closed error taxonomy (spec.md §7). Every field carries enough to
/// render the explanation plus the offending sub-expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMessage {
    UnboundVariable,
    InvalidInputType(Expr<dhall_core::X>),
    InvalidOutputType(Expr<dhall_core::X>),
    NotAFunction(Expr<dhall_core::X>),
    TypeMismatch(Expr<dhall_core::X>, Expr<dhall_core::X>),
    AnnotMismatch(Expr<dhall_core::X>, Expr<dhall_core::X>, Expr<dhall_core::X>),
    Untyped(Const),
    InvalidElement(usize, Expr<dhall_core::X>, Expr<dhall_core::X>, Expr<dhall_core::X>),
    InvalidMaybeTypeParam(Expr<dhall_core::X>),
    InvalidListTypeParam(Expr<dhall_core::X>),
    InvalidListType(Expr<dhall_core::X>),
    InvalidPredicate(Expr<dhall_core::X>, Expr<dhall_core::X>),
    IfBranchMismatch(Expr<dhall_core::X>, Expr<dhall_core::X>, Expr<dhall_core::X>, Expr<dhall_core::X>),
    InvalidFieldType(Label, Expr<dhall_core::X>),
    NotARecord(Label, Expr<dhall_core::X>, Expr<dhall_core::X>),
    MissingField(Label, Expr<dhall_core::X>),
    CantAnd(Side, Expr<dhall_core::X>, Expr<dhall_core::X>),
    CantOr(Side, Expr<dhall_core::X>, Expr<dhall_core::X>),
    CantAppend(Expr<dhall_core::X>, Expr<dhall_core::X>),
    CantAdd(Expr<dhall_core::X>, Expr<dhall_core::X>),
    CantMultiply(Expr<dhall_core::X>, Expr<dhall_core::X>),
}

impl TypeMessage {
    /// The one-line error label spec.md §4.7 wants ahead of the longer
    /// explanation. `std::error::Error::description` would have been the
    /// obvious home for this, but it's deprecated since the 2018 edition,
    /// so it's exposed here as a plain method instead of overriding it.
    pub fn label(&self) -> &'static str {
        match self {
            UnboundVariable => "Unbound variable",
            InvalidInputType(_) => "Invalid function input type",
            InvalidOutputType(_) => "Invalid function output type",
            NotAFunction(_) => "Not a function",
            TypeMismatch(_, _) => "Wrong type of function argument",
            AnnotMismatch(_, _, _) => "Expression doesn't match annotation",
            Untyped(_) => "Kind has no type",
            InvalidElement(_, _, _, _) => "List element has the wrong type",
            InvalidMaybeTypeParam(_) => "Invalid type parameter for Optional",
            InvalidListTypeParam(_) => "Invalid type parameter for List",
            InvalidListType(_) => "Invalid type for list literal",
            InvalidPredicate(_, _) => "Invalid predicate for if",
            IfBranchMismatch(_, _, _, _) => "if branches must have matching types",
            InvalidFieldType(_, _) => "Invalid field type",
            NotARecord(_, _, _) => "Not a record",
            MissingField(_, _) => "Missing record field",
            CantAnd(_, _, _) => "&& only works on Bool",
            CantOr(_, _, _) => "|| only works on Bool",
            CantAppend(_, _) => "++ only works on Text",
            CantAdd(_, _) => "+ only works on Natural",
            CantMultiply(_, _) => "* only works on Natural",
        }
    }
}

impl fmt::Display for TypeMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use dhall_core::pretty;
        writeln!(f, "{}", self.label())?;
        writeln!(f)?;
        match self {
            UnboundVariable => f.write_str(include_str!("errors/UnboundVariable.txt")),
            TypeMismatch(expected, actual) => {
                let template = include_str!("errors/TypeMismatch.txt");
                let s = template
                    .replace("$txt0", &pretty(expected))
                    .replace("$txt1", &pretty(actual));
                f.write_str(&s)
            }
            InvalidInputType(t) => write!(
                f,
                "A function's input type must have kind `Type` or `Kind`.\n\n{}",
                pretty(t)
            ),
            InvalidOutputType(t) => write!(
                f,
                "A function's output type must have kind `Type` or `Kind`.\n\n{}",
                pretty(t)
            ),
            NotAFunction(e) => write!(f, "Expected a function, found:\n\n{}", pretty(e)),
            AnnotMismatch(e, annotated, inferred) => write!(
                f,
                "{}\n\nwas annotated as\n\n{}\n\nbut its inferred type is\n\n{}",
                pretty(e),
                pretty(annotated),
                pretty(inferred)
            ),
            Untyped(c) => write!(f, "`{}` has no type, kind, or sort", c),
            InvalidElement(i, elem, expected, actual) => write!(
                f,
                "List element {} has type\n\n{}\n\nbut the list's element type is\n\n{}\n\nOffending element:\n\n{}",
                i,
                pretty(actual),
                pretty(expected),
                pretty(elem)
            ),
            InvalidMaybeTypeParam(t) => {
                write!(f, "`Optional` expects an argument of type `Type`, got:\n\n{}", pretty(t))
            }
            InvalidListTypeParam(t) => {
                write!(f, "`List` expects an argument of type `Type`, got:\n\n{}", pretty(t))
            }
            InvalidListType(t) => write!(
                f,
                "A list literal's element-type annotation must have type `Type`, got:\n\n{}",
                pretty(t)
            ),
            InvalidPredicate(e, t) => write!(
                f,
                "The predicate of an `if` must have type `Bool`. Got:\n\n{}\n\nof type\n\n{}",
                pretty(e),
                pretty(t)
            ),
            IfBranchMismatch(then_e, else_e, then_t, else_t) => write!(
                f,
                "The `then` and `else` branches must have the same type.\n\nthen: {}\n  : {}\n\nelse: {}\n  : {}",
                pretty(then_e),
                pretty(then_t),
                pretty(else_e),
                pretty(else_t)
            ),
            InvalidFieldType(k, t) => {
                write!(f, "The type of field `{}` is not a term:\n\n{}", k, pretty(t))
            }
            NotARecord(k, e, t) => write!(
                f,
                "Cannot access field `{}` of\n\n{}\n\nwhich has type\n\n{}\n\n(not a record type)",
                k,
                pretty(e),
                pretty(t)
            ),
            MissingField(k, record_ty) => write!(
                f,
                "Field `{}` is missing from record type\n\n{}",
                k,
                pretty(record_ty)
            ),
            CantAnd(side, e, t) => render_bool_op(f, "&&", *side, e, t),
            CantOr(side, e, t) => render_bool_op(f, "||", *side, e, t),
            CantAppend(e, t) => write!(
                f,
                "`++` requires both operands to have type `Text`. The offending side has type\n\n{}\n\nOffending expression:\n\n{}",
                pretty(t),
                pretty(e)
            ),
            CantAdd(e, t) => {
                render_arith_op(f, "+", e, t)
            }
            CantMultiply(e, t) => {
                render_arith_op(f, "*", e, t)
            }
        }
    }
}

fn render_bool_op(
    f: &mut fmt::Formatter,
    op: &str,
    side: Side,
    e: &Expr<dhall_core::X>,
    t: &Expr<dhall_core::X>,
) -> fmt::Result {
    use dhall_core::pretty;
    write!(
        f,
        "`{}` requires both operands to have type `Bool`. The {} side has type\n\n{}\n\nOffending expression:\n\n{}",
        op,
        side,
        pretty(t),
        pretty(e)
    )
}

/// `NaturalPlus`/`NaturalTimes` diagnostics hint at `+n` when the offending
/// operand is an `IntegerLit n` (spec.md §4.6, "NaturalPlus/Times" row).
fn render_arith_op(
    f: &mut fmt::Formatter,
    op: &str,
    e: &Expr<dhall_core::X>,
    t: &Expr<dhall_core::X>,
) -> fmt::Result {
    use dhall_core::pretty;
    write!(
        f,
        "`{}` requires both operands to have type `Natural`. The offending operand has type\n\n{}\n\nOffending expression:\n\n{}",
        op,
        pretty(t),
        pretty(e)
    )?;
    if let ExprF::IntegerLit(n) = e.as_ref() {
        if *n >= 0 {
            write!(f, "\n\nDid you mean `+{}` (a `Natural` literal) instead?", n)?;
        }
    }
    Ok(())
}

/// A type error together with the context and offending sub-expression it
/// occurred under (spec.md §4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub context: Context<Expr<dhall_core::X>>,
    pub current: Expr<dhall_core::X>,
    pub message: TypeMessage,
}

impl TypeError {
    fn new(context: &Context<Expr<dhall_core::X>>, current: Expr<dhall_core::X>, message: TypeMessage) -> Self {
        TypeError {
            context: context.clone(),
            current,
            message,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use dhall_core::pretty;
        if !self.context.is_empty() {
            // Oldest-first, one `(name : type)` per line (spec.md §4.7).
            let dump = self
                .context
                .to_list()
                .into_iter()
                .rev()
                .map(|(name, ty)| format!("{} : {}", name, pretty(&ty)))
                .join("\n");
            writeln!(f, "{}", dump)?;
            writeln!(f, "...")?;
        }
        writeln!(f, "{}", pretty(&self.current))?;
        writeln!(f)?;
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TypeError {}

type Ctx = Context<Expr<dhall_core::X>>;
type X = dhall_core::X;

/// `typeWith(ctx, e)` (spec.md §4.6 and §6).
pub fn type_with(ctx: &Ctx, e: &Expr<X>) -> Result<Expr<X>, TypeError> {
    use ExprF::*;
    let mkerr = |msg: TypeMessage| TypeError::new(ctx, e.clone(), msg);

    match e.as_ref() {
        Const(Const::Type) => Ok(rc(ExprF::Const(Const::Kind))),
        Const(Const::Kind) => Err(mkerr(Untyped(Const::Kind))),

        Var(x) => ctx.lookup(x).cloned().ok_or_else(|| mkerr(UnboundVariable)),

        Lam(x, a, b) => {
            let ctx2 = ctx.insert(x.clone(), a.clone());
            let b_ty = type_with(&ctx2, b)?;
            let result = rc(Pi(x.clone(), a.clone(), b_ty));
            // Validate well-formedness of the resulting Pi (spec.md §4.6,
            // "Lam" row: "also synthesize the type of that Pi").
            type_with(ctx, &result)?;
            Ok(result)
        }

        Pi(x, a, b) => {
            let ta = type_with(ctx, a)?;
            let ta_n = normalize(&ta);
            let k1 = match ta_n.as_ref() {
                Const(c) => *c,
                _ => return Err(mkerr(InvalidInputType(a.clone()))),
            };

            let ctx2 = ctx.insert(x.clone(), a.clone());
            let tb = type_with(&ctx2, b)?;
            let tb_n = normalize(&tb);
            let k2 = match tb_n.as_ref() {
                Const(c) => *c,
                _ => return Err(mkerr(InvalidOutputType(b.clone()))),
            };

            Ok(rc(Const(pts_rule(k1, k2))))
        }

        App(f, a) => {
            let tf = type_with(ctx, f)?;
            let tf_n = normalize(&tf);
            let (x, a1, b) = match tf_n.as_ref() {
                Pi(x, a1, b) => (x.clone(), a1.clone(), b.clone()),
                _ => return Err(mkerr(NotAFunction(f.clone()))),
            };
            let a2 = type_with(ctx, a)?;
            let a2_n = normalize(&a2);
            if a1 != a2_n {
                return Err(mkerr(TypeMismatch(a1, a2_n)));
            }
            Ok(subst(&x, a, &b))
        }

        Lets(ls, body) => {
            let mut ctx = ctx.clone();
            for l in ls {
                let rhs_lambda = build_let_lambda(l);
                let tr = type_with(&ctx, &rhs_lambda)?;
                ctx = ctx.insert(l.name.clone(), tr);
            }
            type_with(&ctx, body)
        }

        Annot(x, t) => {
            let inferred = type_with(ctx, x)?;
            let inferred_n = normalize(&inferred);
            let t_n = normalize(t);
            if t_n != inferred_n {
                return Err(mkerr(AnnotMismatch(x.clone(), t_n, inferred_n)));
            }
            Ok(t_n)
        }

        Bool => Ok(rc(Const(Const::Type))),
        BoolLit(_) => Ok(rc(Bool)),
        Natural => Ok(rc(Const(Const::Type))),
        NaturalLit(_) => Ok(rc(Natural)),
        Integer => Ok(rc(Const(Const::Type))),
        IntegerLit(_) => Ok(rc(Integer)),
        Double => Ok(rc(Const(Const::Type))),
        DoubleLit(_) => Ok(rc(Double)),
        Text => Ok(rc(Const(Const::Type))),
        TextLit(_) => Ok(rc(Text)),

        NaturalFold => Ok(natural_fold_type()),
        ListBuild => Ok(list_build_type()),
        ListFold => Ok(list_fold_type()),
        Nothing_ => Ok(nothing_type()),
        Just_ => Ok(just_type()),

        BoolAnd(a, b) => {
            check_bool_operand(ctx, a, Side::Left, CantAnd)?;
            check_bool_operand(ctx, b, Side::Right, CantAnd)?;
            Ok(rc(Bool))
        }
        BoolOr(a, b) => {
            check_bool_operand(ctx, a, Side::Left, CantOr)?;
            check_bool_operand(ctx, b, Side::Right, CantOr)?;
            Ok(rc(Bool))
        }
        BoolIf(x, y, z) => {
            let tx = type_with(ctx, x)?;
            let tx_n = normalize(&tx);
            if !matches!(tx_n.as_ref(), Bool) {
                return Err(mkerr(InvalidPredicate(x.clone(), tx_n)));
            }
            let ty = type_with(ctx, y)?;
            let tz = type_with(ctx, z)?;
            let ty_n = normalize(&ty);
            let tz_n = normalize(&tz);
            if ty_n != tz_n {
                return Err(mkerr(IfBranchMismatch(y.clone(), z.clone(), ty_n, tz_n)));
            }
            Ok(ty_n)
        }

        NaturalPlus(a, b) => {
            check_natural_operand(ctx, a, CantAdd)?;
            check_natural_operand(ctx, b, CantAdd)?;
            Ok(rc(Natural))
        }
        NaturalTimes(a, b) => {
            check_natural_operand(ctx, a, CantMultiply)?;
            check_natural_operand(ctx, b, CantMultiply)?;
            Ok(rc(Natural))
        }
        TextAppend(a, b) => {
            check_text_operand(ctx, a)?;
            check_text_operand(ctx, b)?;
            Ok(rc(Text))
        }

        Maybe(t) => {
            require_type_sort(ctx, t, InvalidMaybeTypeParam)?;
            Ok(rc(Const(Const::Type)))
        }
        List(t) => {
            require_type_sort(ctx, t, InvalidListTypeParam)?;
            Ok(rc(Const(Const::Type)))
        }
        ListLit(t, xs) => {
            require_type_sort(ctx, t, InvalidListType)?;
            let t_n = normalize(t);
            for (i, x) in xs.iter().enumerate() {
                let tx = type_with(ctx, x)?;
                let tx_n = normalize(&tx);
                if tx_n != t_n {
                    return Err(mkerr(InvalidElement(i, x.clone(), t_n, tx_n)));
                }
            }
            Ok(rc(List(t.clone())))
        }

        Record(kts) => {
            for (k, t) in kts {
                require_type_sort(ctx, t, |t| InvalidFieldType(k.clone(), t))?;
            }
            Ok(rc(Const(Const::Type)))
        }
        RecordLit(kvs) => {
            let mut kts = std::collections::BTreeMap::new();
            for (k, v) in kvs {
                let tv = type_with(ctx, v)?;
                kts.insert(k.clone(), tv);
            }
            Ok(rc(Record(kts)))
        }
        Field(r, k) => {
            let tr = type_with(ctx, r)?;
            let tr_n = normalize(&tr);
            match tr_n.as_ref() {
                Record(kts) => kts
                    .get(k)
                    .cloned()
                    .ok_or_else(|| mkerr(MissingField(k.clone(), tr_n.clone()))),
                _ => Err(mkerr(NotARecord(k.clone(), r.clone(), tr_n))),
            }
        }

        Embed(p) => p.absurd(),
    }
}

/// `typeOf(e)` — as `type_with` in the empty context (spec.md §6).
pub fn type_of(e: &Expr<X>) -> Result<Expr<X>, TypeError> {
    type_with(&Context::empty(), e)
}

fn build_let_lambda(l: &LetBinding<X>) -> Expr<X> {
    l.args
        .iter()
        .rev()
        .fold(l.rhs.clone(), |acc, (n, t)| rc(ExprF::Lam(n.clone(), t.clone(), acc)))
}

fn check_bool_operand(
    ctx: &Ctx,
    e: &Expr<X>,
    side: Side,
    err: impl FnOnce(Side, Expr<X>, Expr<X>) -> TypeMessage,
) -> Result<(), TypeError> {
    let t = type_with(ctx, e)?;
    let t_n = normalize(&t);
    if !matches!(t_n.as_ref(), ExprF::Bool) {
        return Err(TypeError::new(ctx, e.clone(), err(side, e.clone(), t_n)));
    }
    Ok(())
}

fn check_natural_operand(
    ctx: &Ctx,
    e: &Expr<X>,
    err: impl FnOnce(Expr<X>, Expr<X>) -> TypeMessage,
) -> Result<(), TypeError> {
    let t = type_with(ctx, e)?;
    let t_n = normalize(&t);
    if !matches!(t_n.as_ref(), ExprF::Natural) {
        return Err(TypeError::new(ctx, e.clone(), err(e.clone(), t_n)));
    }
    Ok(())
}

fn check_text_operand(ctx: &Ctx, e: &Expr<X>) -> Result<(), TypeError> {
    let t = type_with(ctx, e)?;
    let t_n = normalize(&t);
    if !matches!(t_n.as_ref(), ExprF::Text) {
        return Err(TypeError::new(ctx, e.clone(), CantAppend(e.clone(), t_n)));
    }
    Ok(())
}

fn require_type_sort(
    ctx: &Ctx,
    t: &Expr<X>,
    err: impl FnOnce(Expr<X>) -> TypeMessage,
) -> Result<(), TypeError> {
    let kind = type_with(ctx, t)?;
    let kind_n = normalize(&kind);
    if !matches!(kind_n.as_ref(), ExprF::Const(Const::Type)) {
        return Err(TypeError::new(ctx, t.clone(), err(t.clone())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhall_core::builder::*;

    #[test]
    fn lambda_of_bool_has_function_type() {
        let e: Expr<X> = lam("x", bool_(), v("x"));
        assert_eq!(type_of(&e).unwrap(), fn_type(bool_(), bool_()));
    }

    #[test]
    fn kind_is_untyped() {
        let e: Expr<X> = rc(ExprF::Const(Const::Kind));
        let err = type_of(&e).unwrap_err();
        assert_eq!(err.message, Untyped(Const::Kind));
    }

    #[test]
    fn unbound_variable_is_reported() {
        let e: Expr<X> = v("x");
        let err = type_of(&e).unwrap_err();
        assert_eq!(err.message, UnboundVariable);
    }

    #[test]
    fn if_of_naturals_has_natural_type() {
        let e: Expr<X> = rc(ExprF::BoolIf(bool_lit(true), natural_lit(1), natural_lit(2)));
        assert_eq!(type_of(&e).unwrap(), natural());
    }

    #[test]
    fn list_literal_with_matching_element_type() {
        let e: Expr<X> = list_lit(natural(), vec![natural_lit(1), natural_lit(2)]);
        assert_eq!(type_of(&e).unwrap(), list(natural()));
    }

    #[test]
    fn list_literal_with_mismatched_annotation_is_rejected() {
        let e: Expr<X> = list_lit(bool_(), vec![natural_lit(1)]);
        let err = type_of(&e).unwrap_err();
        assert_eq!(err.message, InvalidElement(0, natural_lit(1), bool_(), natural()));
    }

    #[test]
    fn field_projection_yields_field_type() {
        let e: Expr<X> = field(
            record_lit(vec![(Label::from("foo"), bool_lit(true)), (Label::from("bar"), text_lit("hi"))]),
            "bar",
        );
        assert_eq!(type_of(&e).unwrap(), text());
    }

    #[test]
    fn missing_field_is_reported() {
        let e: Expr<X> = field(record_lit(vec![(Label::from("bar"), text_lit("hi"))]), "baz");
        let err = type_of(&e).unwrap_err();
        assert!(matches!(err.message, MissingField(_, _)));
    }

    #[test]
    fn natural_plus_of_a_bool_is_rejected() {
        let e: Expr<X> = rc(ExprF::NaturalPlus(natural_lit(1), bool_lit(true)));
        let err = type_of(&e).unwrap_err();
        assert!(matches!(err.message, CantAdd(_, _)));
    }

    #[test]
    fn bool_and_with_a_natural_operand_names_the_side() {
        let e: Expr<X> = rc(ExprF::BoolAnd(natural_lit(1), bool_lit(true)));
        let err = type_of(&e).unwrap_err();
        assert_eq!(err.message, CantAnd(Side::Left, natural_lit(1), natural()));
    }

    #[test]
    fn annot_mismatch_is_reported() {
        let e: Expr<X> = rc(ExprF::Annot(bool_lit(true), natural()));
        let err = type_of(&e).unwrap_err();
        assert!(matches!(err.message, AnnotMismatch(_, _, _)));
    }

    #[test]
    fn record_type_and_literal_agree() {
        let ty: Expr<X> = record_type(vec![(Label::from("a"), bool_())]);
        assert_eq!(type_of(&ty).unwrap(), const_type());
    }

    #[test]
    fn pi_type_type_is_type() {
        let e: Expr<X> = pi("a", const_type(), v("a"));
        assert_eq!(type_of(&e).unwrap(), const_type());
    }

    #[test]
    fn lets_extend_the_context_left_to_right() {
        // let x = True let y = x in y  :  Bool
        let e: Expr<X> = rc(ExprF::Lets(
            vec![
                LetBinding::new(Label::from("x"), vec![], bool_lit(true)),
                LetBinding::new(Label::from("y"), vec![], v("x")),
            ],
            v("y"),
        ));
        assert_eq!(type_of(&e).unwrap(), bool_());
    }

    #[test]
    fn error_display_includes_label_and_context() {
        let ctx = Context::empty().insert(Label::from("n"), natural());
        let err = type_with(&ctx, &v("missing")).unwrap_err();
        let text = format!("{}", err);
        assert!(text.contains("n : Natural"));
        assert!(text.contains("Unbound variable"));
    }
}
