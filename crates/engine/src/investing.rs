//! Funding bookkeeping shared by projects and donations, and the FIFO
//! allocation that moves money between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The funding ledger of a single entity.
///
/// `allocated_amount` never exceeds `target_amount`; reaching it flips
/// `fully_funded` and records `closed_at`. Amounts are in minor units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingState {
    pub target_amount: i64,
    pub allocated_amount: i64,
    pub fully_funded: bool,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl FundingState {
    pub fn new(target_amount: i64, opened_at: DateTime<Utc>) -> Self {
        Self {
            target_amount,
            allocated_amount: 0,
            fully_funded: false,
            opened_at,
            closed_at: None,
        }
    }

    /// Amount still missing to reach the target.
    pub fn room(&self) -> i64 {
        self.target_amount - self.allocated_amount
    }
}

/// An entity that carries a [`FundingState`] and can take part in an
/// allocation, on either side.
pub trait Investable {
    fn funding(&self) -> &FundingState;
    fn funding_mut(&mut self) -> &mut FundingState;
}

/// Close the entity if it reached its target. Closing is idempotent: an
/// already closed entity keeps its original `closed_at`.
pub fn close_if_fully_funded<T: Investable + ?Sized>(entity: &mut T, now: DateTime<Utc>) {
    let funding = entity.funding_mut();
    if funding.fully_funded {
        return;
    }
    if funding.allocated_amount >= funding.target_amount {
        funding.fully_funded = true;
        funding.closed_at = Some(now);
    }
}

/// Move funds from `sources`, in order, into `target` until the target is
/// full or the sources run dry. Returns the indices of the sources that were
/// modified; entities reaching their target are closed with `now`.
pub fn allocate<T, S>(target: &mut T, sources: &mut [S], now: DateTime<Utc>) -> Vec<usize>
where
    T: Investable + ?Sized,
    S: Investable,
{
    debug_assert!(
        target.funding().allocated_amount <= target.funding().target_amount,
        "target is overfunded"
    );

    let mut touched = Vec::new();
    for (index, source) in sources.iter_mut().enumerate() {
        if target.funding().fully_funded {
            break;
        }
        debug_assert!(
            source.funding().allocated_amount <= source.funding().target_amount,
            "source is overfunded"
        );

        let transfer = target.funding().room().min(source.funding().room());
        if transfer <= 0 {
            continue;
        }

        target.funding_mut().allocated_amount += transfer;
        source.funding_mut().allocated_amount += transfer;
        close_if_fully_funded(source, now);
        close_if_fully_funded(target, now);
        touched.push(index);
    }
    touched
}
