//! Single-slot mailbox holding a machine's current `(state, context)` pair.
//!
//! The cell is a capacity-1 mailbox: `take` empties it and `put` refills it.
//! Whoever holds the pair while the cell is empty owns the machine. Waiters
//! queue on a fair semaphore with a single permit, so they are woken in
//! arrival order and exactly one waiter is released per stored pair.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::trace;

/// The unit of storage and exchange: a state plus its context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePair<S, C> {
    pub state: S,
    pub context: C,
}

impl<S, C> StatePair<S, C> {
    pub fn new(state: S, context: C) -> Self {
        Self { state, context }
    }

    pub fn into_parts(self) -> (S, C) {
        (self.state, self.context)
    }
}

impl<S, C> From<(S, C)> for StatePair<S, C> {
    fn from((state, context): (S, C)) -> Self {
        Self { state, context }
    }
}

/// Capacity-1 concurrent mailbox for a [`StatePair`].
///
/// # Example
///
/// ```rust
/// use mailbox_fsm::core::{StateCell, StatePair};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cell = StateCell::new(StatePair::new("idle", 0u32));
///
/// let pair = cell.take().await;
/// assert!(!cell.is_occupied());
///
/// cell.put(StatePair::new("busy", pair.context + 1));
/// assert_eq!(cell.take().await, StatePair::new("busy", 1));
/// # }
/// ```
pub struct StateCell<S, C> {
    slot: Mutex<Option<StatePair<S, C>>>,
    occupied: Semaphore,
}

impl<S, C> StateCell<S, C> {
    /// Create a cell that already holds `initial`.
    pub fn new(initial: StatePair<S, C>) -> Self {
        Self {
            slot: Mutex::new(Some(initial)),
            occupied: Semaphore::new(1),
        }
    }

    /// Wait until the cell holds a pair, then remove and return it.
    ///
    /// Dropping the returned future before it completes leaves the cell
    /// untouched.
    pub async fn take(&self) -> StatePair<S, C> {
        match self.occupied.acquire().await {
            Ok(permit) => permit.forget(),
            Err(_) => unreachable!("state cell semaphore is never closed"),
        }
        self.claim()
    }

    /// Remove and return the pair if the cell is occupied right now.
    pub fn try_take(&self) -> Option<StatePair<S, C>> {
        let permit = self.occupied.try_acquire().ok()?;
        permit.forget();
        Some(self.claim())
    }

    /// Store a pair into the empty cell and wake the next waiter.
    ///
    /// # Panics
    ///
    /// Panics if the cell is already occupied. That can only happen when a
    /// `put` is issued without a matching `take`, which breaks mutual
    /// exclusion and is not recoverable.
    pub fn put(&self, pair: StatePair<S, C>) {
        let mut slot = self.slot.lock();
        assert!(
            slot.is_none(),
            "StateCell::put on an occupied cell: put without a matching take"
        );
        *slot = Some(pair);
        drop(slot);

        self.occupied.add_permits(1);
        trace!("state cell released");
    }

    /// Take the pair and wrap it in a guard that guarantees it is put back.
    pub async fn checkout(&self) -> Checkout<'_, S, C> {
        let original = self.take().await;
        Checkout {
            cell: self,
            original: Some(original),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.slot.lock().is_some()
    }

    fn claim(&self) -> StatePair<S, C> {
        let pair = self.slot.lock().take();
        match pair {
            Some(pair) => {
                trace!("state cell taken");
                pair
            }
            None => panic!("state cell permit granted while the slot was empty"),
        }
    }
}

/// Exclusive ownership of a cell's pair.
///
/// The cell stays empty for as long as the checkout lives. [`commit`]
/// stores a replacement pair; dropping the checkout in any other way (early
/// return, panic, or cancellation of the owning future) restores the
/// original pair untouched.
///
/// [`commit`]: Checkout::commit
pub struct Checkout<'a, S, C> {
    cell: &'a StateCell<S, C>,
    original: Option<StatePair<S, C>>,
}

impl<S, C> Checkout<'_, S, C> {
    /// The pair that was in the cell when it was checked out.
    pub fn pair(&self) -> &StatePair<S, C> {
        match &self.original {
            Some(pair) => pair,
            None => unreachable!("checkout holds its pair until commit or drop"),
        }
    }

    /// Store `pair` in place of the original and release the cell.
    pub fn commit(mut self, pair: StatePair<S, C>) {
        self.original = None;
        self.cell.put(pair);
    }
}

impl<S, C> Drop for Checkout<'_, S, C> {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            self.cell.put(original);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn new_cell_starts_occupied() {
        let cell = StateCell::new(StatePair::new("initial", 1));
        assert!(cell.is_occupied());

        let pair = cell.take().await;
        assert_eq!(pair, StatePair::new("initial", 1));
        assert!(!cell.is_occupied());
    }

    #[tokio::test]
    async fn put_refills_empty_cell() {
        let cell = StateCell::new(StatePair::new("a", 0));
        let _ = cell.take().await;

        cell.put(StatePair::new("b", 1));

        assert!(cell.is_occupied());
        assert_eq!(cell.take().await.into_parts(), ("b", 1));
    }

    #[test]
    fn try_take_on_empty_cell_returns_none() {
        let cell = StateCell::new(StatePair::new("a", 0));

        assert!(cell.try_take().is_some());
        assert!(cell.try_take().is_none());
    }

    #[test]
    #[should_panic(expected = "occupied cell")]
    fn put_on_occupied_cell_panics() {
        let cell = StateCell::new(StatePair::new("a", 0));
        cell.put(StatePair::new("b", 1));
    }

    #[tokio::test]
    async fn dropped_checkout_restores_original_pair() {
        let cell = StateCell::new(StatePair::new("a", String::from("ctx")));

        {
            let checkout = cell.checkout().await;
            assert_eq!(checkout.pair().state, "a");
            assert!(!cell.is_occupied());
        }

        assert_eq!(
            cell.take().await,
            StatePair::new("a", String::from("ctx"))
        );
    }

    #[tokio::test]
    async fn committed_checkout_stores_new_pair() {
        let cell = StateCell::new(StatePair::new("a", 0));

        let checkout = cell.checkout().await;
        let next = StatePair::new("b", checkout.pair().context + 1);
        checkout.commit(next);

        assert_eq!(cell.take().await, StatePair::new("b", 1));
    }

    #[tokio::test]
    async fn waiter_is_released_by_put() {
        let cell = Arc::new(StateCell::new(StatePair::new(0u32, ())));
        let held = cell.take().await;

        let waiter = {
            let cell = Arc::clone(&cell);
            tokio::spawn(async move { cell.take().await })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        cell.put(StatePair::new(held.state + 1, ()));
        let pair = waiter.await.unwrap();
        assert_eq!(pair.state, 1);
    }

    #[tokio::test]
    async fn waiters_are_served_in_arrival_order() {
        let cell = Arc::new(StateCell::new(StatePair::new(Vec::<usize>::new(), ())));
        let held = cell.take().await;

        let mut handles = Vec::new();
        for id in 0..4 {
            let cell = Arc::clone(&cell);
            handles.push(tokio::spawn(async move {
                let mut pair = cell.take().await;
                pair.state.push(id);
                cell.put(pair);
            }));
            // Let each waiter enqueue before spawning the next.
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
        }

        cell.put(held);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cell.take().await.state, vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_take_leaves_cell_usable() {
        let cell = StateCell::new(StatePair::new("a", 0));
        let held = cell.take().await;

        let timed_out = tokio::time::timeout(Duration::from_millis(50), cell.take()).await;
        assert!(timed_out.is_err());

        cell.put(held);
        assert_eq!(cell.take().await.state, "a");
    }
}
