use crate::label::Label;

/// An ordered association of variable names to values, with last-in-first-out
/// lookup: `insert` prepends (conceptually — see below), `lookup` returns the
/// most recently inserted binding for a name, and shadowing is resolved by
/// overlay rather than by deleting the shadowed entry (spec.md §4.1).
///
/// Used throughout `dhall/src/typecheck.rs` as `ctx.insert(x, t)`.
/// Internally we push onto the end of a `Vec` and search from the back,
/// which gives the same "newest wins" semantics as prepending while
/// keeping `insert` O(1) amortized instead of O(n).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context<V> {
    entries: Vec<(Label, V)>,
}

impl<V: Clone> Context<V> {
    pub fn empty() -> Self {
        Context { entries: Vec::new() }
    }

    /// Alias for `empty`, for callers expecting the usual constructor name.
    pub fn new() -> Self {
        Self::empty()
    }

    /// Returns a new context with `(name, value)` overlaid on top of `self`.
    /// `self` is left untouched; contexts are persistent values.
    pub fn insert(&self, name: Label, value: V) -> Self {
        let mut entries = self.entries.clone();
        entries.push((name, value));
        Context { entries }
    }

    /// The most recently inserted binding for `name`, if any.
    pub fn lookup(&self, name: &Label) -> Option<&V> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// All entries, newest-first (as spec.md §4.1 mandates).
    pub fn to_list(&self) -> Vec<(Label, V)> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for Context<V> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_most_recent_binding() {
        let ctx = Context::empty()
            .insert(Label::from("x"), 1)
            .insert(Label::from("y"), 2)
            .insert(Label::from("x"), 3);
        assert_eq!(ctx.lookup(&Label::from("x")), Some(&3));
        assert_eq!(ctx.lookup(&Label::from("y")), Some(&2));
        assert_eq!(ctx.lookup(&Label::from("z")), None);
    }

    #[test]
    fn to_list_is_newest_first() {
        let ctx = Context::empty()
            .insert(Label::from("a"), 1)
            .insert(Label::from("b"), 2);
        assert_eq!(
            ctx.to_list(),
            vec![(Label::from("b"), 2), (Label::from("a"), 1)]
        );
    }

    #[test]
    fn insert_does_not_mutate_the_original() {
        let base = Context::empty().insert(Label::from("x"), 1);
        let _extended = base.insert(Label::from("x"), 2);
        assert_eq!(base.lookup(&Label::from("x")), Some(&1));
    }
}
