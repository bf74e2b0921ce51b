//! The delete/insert transaction protocol.
//!
//! A correction is realized as `delete_count` synthetic backspaces plus one
//! acknowledgment key, injected into the same channel real input arrives on.
//! The host cannot distinguish synthetic keys from typing once injected, so
//! the echoes come back through `on_key_down` and are reconciled here. The
//! acknowledgment round-trip self-clocks the drain: each observed ack
//! re-emits one backspace+ack pair until the counter reaches zero, and only
//! then is the queued insert committed.

use tracing::{debug, warn};

use keysync_core::keycode::vk;

use super::{InputSession, TextHost};

impl InputSession {
    /// Begin a delete(N)+insert(T) correction.
    ///
    /// N == 0 commits immediately. Otherwise the deletes and text are queued
    /// — a second correction arriving before the first drains appends rather
    /// than overwrites, preserving the ordering guarantee that an insertion
    /// lands strictly after all of its preceding deletes. A correction that
    /// joins an in-flight batch injects nothing itself: the pending ack's
    /// re-emission drains the added deletes, keeping the backspaces in
    /// flight covered by `pending_delete` at all times.
    pub fn begin_correction(&mut self, host: &mut dyn TextHost, delete_count: u32, text: &str) {
        if delete_count == 0 {
            if !text.is_empty() {
                self.dispatch_commit(host, 0, text);
            }
            return;
        }

        let in_flight = self.txn.pending_delete > 0 || self.txn.expect_ack;
        self.txn.pending_delete += delete_count;
        self.txn.pending_insert.push_str(text);
        debug!(
            delete_count,
            pending = self.txn.pending_delete,
            "begin correction"
        );

        if in_flight {
            // Injecting a second batch on top of one still round-tripping
            // would leave surplus backspaces arriving after the counter
            // drains, and the host would apply them to the committed text.
            debug!("joined in-flight batch");
            return;
        }

        host.inject_key(vk::BACK, u16::try_from(delete_count).unwrap_or(u16::MAX));
        host.inject_key(vk::ACK, 1);
        self.txn.expect_ack = true;
    }

    /// Acknowledgment key observed while one was expected.
    pub(crate) fn handle_ack(&mut self, host: &mut dyn TextHost) -> bool {
        self.txn.expect_ack = false;

        if self.txn.pending_delete > 0 {
            // Deletes have not fully round-tripped; re-emit one
            // backspace+ack pair and wait for the next cycle.
            debug!(pending = self.txn.pending_delete, "re-emitting delete pair");
            host.inject_key(vk::BACK, 1);
            host.inject_key(vk::ACK, 1);
            self.txn.expect_ack = true;
        } else if !self.txn.pending_insert.is_empty() {
            let text = std::mem::take(&mut self.txn.pending_insert);
            self.dispatch_commit(host, 0, &text);
        } else {
            debug!("stray acknowledgment, nothing pending");
        }
        true
    }

    /// Backspace key-down under the protocol's state machine. Returns
    /// whether the event was consumed. Deletes are only ever counted here;
    /// the engine never mutates text for them itself.
    pub(crate) fn handle_backspace_down(&mut self, repeat: u16) -> bool {
        if self.txn.pending_delete > 0 {
            // The host echoing back our synthetic deletes. Count them but do
            // not consume: the host performs the actual deletion.
            self.txn.pending_delete = self.txn.pending_delete.saturating_sub(repeat.max(1) as u32);
            self.txn.expect_ack = true;
            debug!(
                repeat,
                pending = self.txn.pending_delete,
                "counted echoed deletes"
            );
            return false;
        }

        if self.txn.expect_ack {
            // Echoes past the counter, before the ack round-tripped. Eat
            // them so the host does not delete real text.
            debug!("suppressed excess delete echo while awaiting ack");
            return true;
        }

        // Genuine user-initiated delete (or no context to maintain): let the
        // host process it; context re-derives from the next selection
        // notification.
        false
    }

    /// Single commit point to the host's edit-transaction mechanism. A
    /// refusal is a dropped edit: logged, reported, never retried.
    pub(crate) fn dispatch_commit(
        &mut self,
        host: &mut dyn TextHost,
        delete_before: usize,
        text: &str,
    ) -> bool {
        let accepted = host.request_edit(delete_before, text);
        if !accepted {
            warn!(delete_before, len = text.len(), "edit transaction dropped");
        }
        accepted
    }
}
