use std::borrow::{Borrow, BorrowMut};

use crate::query::TwoPhase;
use crate::DocId;

/// Sentinel value returned when a DocSet has been entirely consumed.
///
/// This is not u32::MAX as one would have expected, due to the lack of SSE2 instructions
/// to compare [u32; 4].
pub const TERMINATED: DocId = i32::MAX as u32;

/// Value reported by [`DocSet::doc()`] before the first call to `.advance()` or `.seek()`.
///
/// It is neither a valid doc id nor `TERMINATED`: code comparing positions
/// has to check for it explicitly.
pub const NOT_STARTED: DocId = u32::MAX;

/// Represents an iterable set of sorted doc ids.
///
/// A `DocSet` is a forward-only cursor. It starts unpositioned
/// (`doc() == NOT_STARTED`) and is positioned on its first document by the
/// first call to `.advance()` or `.seek()`. Once `TERMINATED` has been returned,
/// every subsequent call returns `TERMINATED`.
pub trait DocSet: Send {
    /// Goes to the next element.
    ///
    /// The DocId of the next element is returned.
    /// In other words we should always have :
    /// ```ignore
    /// let doc = docset.advance();
    /// assert_eq!(doc, docset.doc());
    /// ```
    ///
    /// If we reached the end of the `DocSet`, [`TERMINATED`] should be returned.
    ///
    /// Calling `.advance()` on a terminated `DocSet` should be supported, and [`TERMINATED`]
    /// should be returned.
    fn advance(&mut self) -> DocId;

    /// Advances the `DocSet` forward until reaching the target, or going to the
    /// lowest [`DocId`] greater than the target.
    ///
    /// If the current document is already greater or equal to the target, the
    /// `DocSet` does not move and the current document is returned. Calling
    /// `.seek(target)` twice in a row with the same target is therefore harmless.
    ///
    /// If the end of the `DocSet` is reached, [`TERMINATED`] is returned.
    ///
    /// Calling `.seek(target)` on a terminated `DocSet` is legal. Implementation
    /// of `DocSet` should support it.
    ///
    /// Calling `seek(TERMINATED)` is also legal and is the normal way to consume a `DocSet`.
    fn seek(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc();
        if doc == NOT_STARTED {
            doc = self.advance();
        }
        while doc < target {
            doc = self.advance();
        }
        doc
    }

    /// Returns the current document.
    ///
    /// Right after creating a new `DocSet`, the docset is not positioned and
    /// [`NOT_STARTED`] is returned.
    ///
    /// If the `DocSet` is exhausted, `.doc()` returns [`TERMINATED`].
    fn doc(&self) -> DocId;

    /// Returns a best-effort estimate of the number of documents this `DocSet`
    /// will yield.
    ///
    /// The cost is only used to pick an execution strategy. It never affects
    /// the set of documents returned.
    fn cost(&self) -> u64;

    /// Returns the two-phase view of this `DocSet`, if confirming a match is more
    /// expensive than generating a candidate.
    ///
    /// When a view is returned, `.doc()` reports the position of its approximation.
    /// Conjunctions drive the approximation and only call
    /// [`TwoPhase::matches()`] once every other conjunct agrees on a candidate.
    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        None
    }

    /// Returns the number of documents remaining in the `DocSet`.
    /// Calling this method consumes the `DocSet`.
    fn count(&mut self) -> u32 {
        let mut count = 0u32;
        while self.advance() != TERMINATED {
            count += 1u32;
        }
        count
    }
}

impl DocSet for &mut dyn DocSet {
    fn advance(&mut self) -> DocId {
        (**self).advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        (**self).seek(target)
    }

    fn doc(&self) -> DocId {
        (**self).doc()
    }

    fn cost(&self) -> u64 {
        (**self).cost()
    }

    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        (**self).two_phase()
    }

    fn count(&mut self) -> u32 {
        (**self).count()
    }
}

impl<TDocSet: DocSet + ?Sized> DocSet for Box<TDocSet> {
    #[inline]
    fn advance(&mut self) -> DocId {
        let unboxed: &mut TDocSet = self.borrow_mut();
        unboxed.advance()
    }

    #[inline]
    fn seek(&mut self, target: DocId) -> DocId {
        let unboxed: &mut TDocSet = self.borrow_mut();
        unboxed.seek(target)
    }

    #[inline]
    fn doc(&self) -> DocId {
        let unboxed: &TDocSet = self.borrow();
        unboxed.doc()
    }

    fn cost(&self) -> u64 {
        let unboxed: &TDocSet = self.borrow();
        unboxed.cost()
    }

    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        let unboxed: &mut TDocSet = self.borrow_mut();
        unboxed.two_phase()
    }

    fn count(&mut self) -> u32 {
        let unboxed: &mut TDocSet = self.borrow_mut();
        unboxed.count()
    }
}

#[cfg(test)]
mod tests {
    use super::{DocSet, NOT_STARTED, TERMINATED};
    use crate::DocId;

    /// Only implements the required methods, to exercise the default `seek`.
    struct RangeDocSet {
        docs: Vec<DocId>,
        cursor: Option<usize>,
    }

    impl RangeDocSet {
        fn new(docs: Vec<DocId>) -> RangeDocSet {
            RangeDocSet { docs, cursor: None }
        }
    }

    impl DocSet for RangeDocSet {
        fn advance(&mut self) -> DocId {
            let next = self.cursor.map(|cursor| cursor + 1).unwrap_or(0);
            self.cursor = Some(next.min(self.docs.len()));
            self.doc()
        }

        fn doc(&self) -> DocId {
            match self.cursor {
                None => NOT_STARTED,
                Some(cursor) => self.docs.get(cursor).copied().unwrap_or(TERMINATED),
            }
        }

        fn cost(&self) -> u64 {
            self.docs.len() as u64
        }
    }

    #[test]
    fn test_default_seek_from_not_started() {
        let mut docset = RangeDocSet::new(vec![3, 7, 9]);
        assert_eq!(docset.doc(), NOT_STARTED);
        assert_eq!(docset.seek(0), 3);
        assert_eq!(docset.doc(), 3);
    }

    #[test]
    fn test_default_seek_first_greater_or_equal() {
        let mut docset = RangeDocSet::new(vec![5, 6, 8, 12, 20]);
        assert_eq!(docset.advance(), 5);
        assert_eq!(docset.seek(10), 12);
        assert_eq!(docset.advance(), 20);
        assert_eq!(docset.advance(), TERMINATED);
    }

    #[test]
    fn test_default_seek_is_idempotent() {
        let mut docset = RangeDocSet::new(vec![5, 6, 8, 12, 20]);
        assert_eq!(docset.seek(7), 8);
        assert_eq!(docset.seek(7), 8);
        assert_eq!(docset.seek(8), 8);
        assert_eq!(docset.advance(), 12);
    }

    #[test]
    fn test_terminated_is_sticky() {
        let mut docset = RangeDocSet::new(vec![1]);
        assert_eq!(docset.advance(), 1);
        assert_eq!(docset.advance(), TERMINATED);
        assert_eq!(docset.advance(), TERMINATED);
        assert_eq!(docset.seek(3), TERMINATED);
        assert_eq!(docset.doc(), TERMINATED);
    }

    #[test]
    fn test_boxed_docset_count() {
        let mut docset: Box<dyn DocSet> = Box::new(RangeDocSet::new(vec![1, 4, 9]));
        assert_eq!(docset.advance(), 1);
        assert_eq!(docset.count(), 2);
        assert_eq!(docset.doc(), TERMINATED);
    }
}
