//! Query sequencing
//!
//! Every query takes a ticket. Issuing a new ticket supersedes all earlier
//! ones; a superseded query stops waiting on its provider call and its
//! result is dropped, so a slow early answer can never overwrite a later one.

use tokio::sync::watch;

/// Issues monotonically increasing query tickets
#[derive(Debug)]
pub struct QuerySequencer {
    latest: watch::Sender<u64>,
}

/// Identity of one in-flight query
#[derive(Debug)]
pub struct QueryTicket {
    id: u64,
    latest: watch::Receiver<u64>,
}

impl QuerySequencer {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(0);
        Self { latest }
    }

    /// Issue a ticket, superseding every earlier one
    pub fn issue(&self) -> QueryTicket {
        let mut id = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            id = *latest;
        });

        QueryTicket {
            id,
            latest: self.latest.subscribe(),
        }
    }

    /// Id of the most recently issued ticket (0 before any)
    pub fn latest(&self) -> u64 {
        *self.latest.borrow()
    }

    /// Whether `ticket` is still the newest query
    pub fn is_latest(&self, ticket: &QueryTicket) -> bool {
        self.latest() == ticket.id
    }
}

impl Default for QuerySequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Resolves once a newer ticket has been issued
    ///
    /// Never resolves if the sequencer is dropped first.
    pub async fn superseded(&mut self) {
        loop {
            if *self.latest.borrow_and_update() != self.id {
                return;
            }
            if self.latest.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
