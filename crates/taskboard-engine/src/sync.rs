//! Fire-and-reconcile persistence of drag commits.
//!
//! A committed move is written to the store first, then the status update is
//! spawned onto the runtime. The spawned task owns only the gateway handle and
//! a channel sender, so it runs to completion even if the session is dropped.
//! Its result comes back as a [`SyncOutcome`] that the session applies on a
//! later turn.
//!
//! Moves of one card are written one at a time in commit order: a move made
//! while an earlier one is still in flight waits in that card's queue and is
//! spawned once the earlier result has been booked.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use taskboard_core::TaskboardResult;
use taskboard_domain::{BoardGateway, CardId, CardStatus, CardUpdate};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub card_id: CardId,
    pub from: CardStatus,
    pub to: CardStatus,
    /// Increases with every move; identifies the write a result belongs to.
    pub revision: u64,
}

#[derive(Debug)]
pub struct SyncOutcome {
    pub pending: PendingMove,
    pub result: TaskboardResult<()>,
}

/// What booking an outcome means for its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// Another move of the card was queued behind this one and is now sent.
    Superseded,
    /// The card has nothing left to write. `confirmed` is the status storage
    /// holds as far as this session knows.
    Settled { confirmed: CardStatus },
    /// The card is no longer tracked, e.g. it was deleted meanwhile.
    Stale,
}

struct CardSync {
    confirmed: CardStatus,
    in_flight: PendingMove,
    queued: VecDeque<PendingMove>,
}

impl CardSync {
    fn newest(&self) -> &PendingMove {
        self.queued.back().unwrap_or(&self.in_flight)
    }
}

pub(crate) struct SyncTracker {
    gateway: Arc<dyn BoardGateway>,
    tx: mpsc::UnboundedSender<SyncOutcome>,
    rx: mpsc::UnboundedReceiver<SyncOutcome>,
    cards: HashMap<CardId, CardSync>,
    spawned: usize,
    next_revision: u64,
}

impl SyncTracker {
    pub(crate) fn new(gateway: Arc<dyn BoardGateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            tx,
            rx,
            cards: HashMap::new(),
            spawned: 0,
            next_revision: 1,
        }
    }

    /// Registers a move. It is sent right away unless an earlier move of the
    /// same card is still in flight, in which case it is queued.
    pub(crate) fn dispatch(
        &mut self,
        card_id: CardId,
        from: CardStatus,
        to: CardStatus,
    ) -> PendingMove {
        let pending = PendingMove {
            card_id,
            from,
            to,
            revision: self.next_revision,
        };
        self.next_revision += 1;

        if let Some(sync) = self.cards.get_mut(&card_id) {
            tracing::debug!(
                "Queued move of card {} to {} behind revision {}",
                card_id,
                to,
                sync.in_flight.revision
            );
            sync.queued.push_back(pending);
            return pending;
        }

        self.cards.insert(
            card_id,
            CardSync {
                confirmed: from,
                in_flight: pending,
                queued: VecDeque::new(),
            },
        );
        self.spawn(pending);
        pending
    }

    fn spawn(&mut self, pending: PendingMove) {
        self.spawned += 1;
        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway
                .update_card(pending.card_id, CardUpdate::status(pending.to))
                .await;
            if tx.send(SyncOutcome { pending, result }).is_err() {
                tracing::debug!(
                    "Session closed before sync of card {} completed",
                    pending.card_id
                );
            }
        });
    }

    /// Moves not yet confirmed by storage, in flight or queued.
    pub(crate) fn pending(&self) -> usize {
        self.cards.values().map(|s| 1 + s.queued.len()).sum()
    }

    /// Newest unconfirmed destination per card.
    pub(crate) fn unconfirmed(&self) -> impl Iterator<Item = (CardId, CardStatus)> + '_ {
        self.cards.iter().map(|(id, sync)| (*id, sync.newest().to))
    }

    pub(crate) fn try_next(&mut self) -> Option<SyncOutcome> {
        if self.spawned == 0 {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Waits for the next outcome; `None` once nothing is in flight.
    pub(crate) async fn next(&mut self) -> Option<SyncOutcome> {
        if self.spawned == 0 {
            return None;
        }
        self.rx.recv().await
    }

    /// Books a received outcome and sends the card's next queued move.
    ///
    /// A failed write leaves the confirmed status as it was. `NotFound` drops
    /// the card's queue, since every later write would fail the same way.
    pub(crate) fn complete(&mut self, outcome: &SyncOutcome) -> Completion {
        self.spawned = self.spawned.saturating_sub(1);
        let card_id = outcome.pending.card_id;
        let Some(sync) = self.cards.get_mut(&card_id) else {
            return Completion::Stale;
        };
        if sync.in_flight.revision != outcome.pending.revision {
            return Completion::Stale;
        }

        match &outcome.result {
            Ok(()) => sync.confirmed = outcome.pending.to,
            Err(e) if e.is_not_found() => {
                let confirmed = sync.confirmed;
                self.cards.remove(&card_id);
                return Completion::Settled { confirmed };
            }
            Err(_) => {}
        }

        match sync.queued.pop_front() {
            Some(next) => {
                sync.in_flight = next;
                self.spawn(next);
                Completion::Superseded
            }
            None => {
                let confirmed = sync.confirmed;
                self.cards.remove(&card_id);
                Completion::Settled { confirmed }
            }
        }
    }

    pub(crate) fn forget(&mut self, card_id: CardId) {
        self.cards.remove(&card_id);
    }
}
