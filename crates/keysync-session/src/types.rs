//! Session-internal state blocks.

/// One delete(N)+insert(T) correction, realized as synthetic key events.
///
/// `pending_delete` counts synthesized backspaces still in flight; it is
/// unsigned and decremented with saturation, so an over-echoing host can
/// never drive it negative. `pending_insert` is queued until every pending
/// delete is confirmed — an insertion is never committed ahead of its
/// deletes. `expect_ack` is true exactly while a synthetic acknowledgment
/// key has been sent and not yet observed.
#[derive(Debug, Default)]
pub(crate) struct Transaction {
    pub(crate) pending_delete: u32,
    pub(crate) pending_insert: String,
    pub(crate) expect_ack: bool,
}

impl Transaction {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// No outstanding deletes and no queued insert. The ack flag is not part
    /// of idleness: a stray acknowledgment may still be in flight.
    pub(crate) fn is_idle(&self) -> bool {
        self.pending_delete == 0 && self.pending_insert.is_empty()
    }

    pub(crate) fn reset(&mut self) {
        self.pending_delete = 0;
        self.pending_insert.clear();
        self.expect_ack = false;
    }
}
