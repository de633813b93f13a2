//! The operations over the data model `dhall_core` defines: capture-aware
//! substitution (§4.3), normalization (§4.4), α-equivalence-after-
//! normalization (§4.5), and the synthesis-only type checker (§4.6) with
//! its diagnostic taxonomy (§4.7) — spec.md's whole "hard part", as laid
//! out in SPEC_FULL.md §10.
//!
//! `dhall_core::pretty` is re-exported here too since `typecheck`'s error
//! messages and this crate's own tests both need it, and a consumer of
//! `dhall` shouldn't have to separately depend on `dhall_core` just to
//! call `pretty`.
pub mod equivalence;
pub mod normalize;
pub mod subst;
pub mod typecheck;

pub use dhall_core::pretty;
pub use equivalence::{equivalent, equivalent_checked};
pub use normalize::{normalize, normalize_checked, DepthExceeded};
pub use subst::{subst, subst_checked};
pub use typecheck::{type_of, type_with, Side, TypeError, TypeMessage};
