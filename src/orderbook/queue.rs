//! Per-level FIFO queue of reconstructed orders

use rust_decimal::Decimal;

/// Ordered sequence of synthetic order quantities for one price level.
///
/// Index 0 is the oldest order. Every entry is strictly positive; delta
/// arithmetic never drains the queue (a zero aggregate deletes the whole
/// level instead).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQueue {
    orders: Vec<Decimal>,
}

impl OrderQueue {
    /// Create a queue holding a single order, the starting fiction for a
    /// level whose aggregate has just been observed.
    pub fn seeded(qty: Decimal) -> Self {
        Self { orders: vec![qty] }
    }

    /// Exact sum of all entries.
    pub fn sum(&self) -> Decimal {
        self.orders.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Individual quantities in FIFO order.
    pub fn orders(&self) -> &[Decimal] {
        &self.orders
    }

    /// Append a new order to the back of the queue. Callers guarantee
    /// `qty > 0`.
    pub fn push_back(&mut self, qty: Decimal) {
        self.orders.push(qty);
    }

    /// Remove the first entry equal to `diff`, scanning from the back.
    ///
    /// A cancellation is more likely to target a recently placed order, so
    /// the newest matching entry wins ties. Returns whether an entry was
    /// removed.
    pub fn remove_exact(&mut self, diff: Decimal) -> bool {
        for i in (0..self.orders.len()).rev() {
            if self.orders[i] == diff {
                self.orders.remove(i);
                return true;
            }
        }
        false
    }

    /// Absorb a shortfall into the largest resting order.
    ///
    /// If the largest order exceeds `diff` it is reduced in place; otherwise
    /// it is removed whole and any remaining shortfall is dropped (the next
    /// delta touching this level observes the lower sum and self-corrects).
    pub fn reduce_largest(&mut self, diff: Decimal) {
        let Some(idx) = self.largest_index() else {
            return;
        };
        if self.orders[idx] > diff {
            self.orders[idx] -= diff;
        } else {
            self.orders.remove(idx);
        }
    }

    /// Largest entry, if any.
    pub fn max_order(&self) -> Option<Decimal> {
        self.orders.iter().copied().max()
    }

    /// Lowest index holding the maximum value. Oldest wins ties, biasing
    /// toward FIFO consumption at the head of the queue.
    fn largest_index(&self) -> Option<usize> {
        let mut largest: Option<usize> = None;
        for (i, qty) in self.orders.iter().enumerate() {
            match largest {
                None => largest = Some(i),
                Some(j) if *qty > self.orders[j] => largest = Some(i),
                _ => {}
            }
        }
        largest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn queue(entries: &[Decimal]) -> OrderQueue {
        let mut q = OrderQueue::default();
        for &e in entries {
            q.push_back(e);
        }
        q
    }

    #[test]
    fn sum_and_len() {
        let q = queue(&[dec!(5), dec!(2.5)]);
        assert_eq!(q.sum(), dec!(7.5));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn seeded_holds_single_order() {
        let q = OrderQueue::seeded(dec!(3.2));
        assert_eq!(q.orders(), &[dec!(3.2)]);
        assert_eq!(q.sum(), dec!(3.2));
    }

    #[test]
    fn remove_exact_prefers_newest() {
        let mut q = queue(&[dec!(2.5), dec!(5), dec!(2.5)]);
        assert!(q.remove_exact(dec!(2.5)));
        assert_eq!(q.orders(), &[dec!(2.5), dec!(5)]);
    }

    #[test]
    fn remove_exact_matches_decimal_equality() {
        // 2.50 and 2.5 are the same decimal value
        let mut q = queue(&[dec!(5), dec!(2.50)]);
        assert!(q.remove_exact(dec!(2.5)));
        assert_eq!(q.orders(), &[dec!(5)]);
    }

    #[test]
    fn remove_exact_without_match() {
        let mut q = queue(&[dec!(5), dec!(2.5)]);
        assert!(!q.remove_exact(dec!(1)));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn reduce_largest_partial() {
        let mut q = queue(&[dec!(5), dec!(2.5)]);
        q.reduce_largest(dec!(1));
        assert_eq!(q.orders(), &[dec!(4), dec!(2.5)]);
    }

    #[test]
    fn reduce_largest_removes_whole_entry() {
        let mut q = queue(&[dec!(5), dec!(2.5)]);
        q.reduce_largest(dec!(7.4));
        assert_eq!(q.orders(), &[dec!(2.5)]);
    }

    #[test]
    fn reduce_largest_exact_removes_entry() {
        let mut q = queue(&[dec!(5), dec!(2.5)]);
        q.reduce_largest(dec!(5));
        assert_eq!(q.orders(), &[dec!(2.5)]);
    }

    #[test]
    fn reduce_largest_oldest_wins_ties() {
        let mut q = queue(&[dec!(3), dec!(1), dec!(3)]);
        q.reduce_largest(dec!(1));
        assert_eq!(q.orders(), &[dec!(2), dec!(1), dec!(3)]);
    }

    #[test]
    fn max_order() {
        let q = queue(&[dec!(1), dec!(4), dec!(2)]);
        assert_eq!(q.max_order(), Some(dec!(4)));
        assert_eq!(OrderQueue::default().max_order(), None);
    }
}
