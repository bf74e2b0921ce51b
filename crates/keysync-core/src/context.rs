//! Bounded preceding-text window, re-synchronized from host selection reads.

use tracing::debug;

/// Maximum number of characters of preceding text tracked. The host read
/// request is bounded to the same length.
pub const MAX_CONTEXT: usize = 128;

/// Result of offering a freshly read range to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The fresh text replaced the buffer.
    Adopted,
    /// The fresh text was a shorter suffix-consistent read of the current
    /// buffer; the longer existing buffer was kept.
    KeptExisting,
}

/// Text immediately preceding the caret, as last confirmed from the host.
///
/// Owned exclusively by the session; other components read it through
/// `text()`. Cleared whenever the caret moves non-adjacently, since the
/// preceding-text assumption is then unverifiable.
#[derive(Debug, Default)]
pub struct ContextBuffer {
    text: String,
}

impl ContextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn reset(&mut self) {
        self.text.clear();
    }

    /// Offer a freshly read range.
    ///
    /// Tie-break for a *shorter* fresh read: compare it character by
    /// character against the trailing suffix of the current buffer, from the
    /// end. A full match means the host reported a truncated range for the
    /// same logical position (Notepad does this) and the longer buffer is
    /// kept; any mismatch means the fresh text wins outright.
    ///
    /// Comparison is Unicode-scalar equality; no normalization is applied.
    pub fn sync(&mut self, fresh: &str) -> SyncOutcome {
        let fresh = tail_chars(fresh, MAX_CONTEXT);

        let fresh_len = fresh.chars().count();
        if fresh_len < self.len_chars() {
            let suffix_match = self
                .text
                .chars()
                .rev()
                .zip(fresh.chars().rev())
                .all(|(old, new)| old == new);
            if suffix_match {
                debug!(
                    kept = self.len_chars(),
                    fresh = fresh_len,
                    "keeping longer context over suffix-consistent shorter read"
                );
                return SyncOutcome::KeptExisting;
            }
        }

        self.text.clear();
        self.text.push_str(fresh);
        SyncOutcome::Adopted
    }
}

/// Last `max` characters of `s`.
fn tail_chars(s: &str, max: usize) -> &str {
    let len = s.chars().count();
    if len <= max {
        return s;
    }
    let skip = len - max;
    let (idx, _) = s.char_indices().nth(skip).unwrap_or((s.len(), ' '));
    &s[idx..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adopts_fresh_read() {
        let mut ctx = ContextBuffer::new();
        assert_eq!(ctx.sync("hello"), SyncOutcome::Adopted);
        assert_eq!(ctx.text(), "hello");
    }

    #[test]
    fn shorter_suffix_match_keeps_old_buffer() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("hello");
        assert_eq!(ctx.sync("ello"), SyncOutcome::KeptExisting);
        assert_eq!(ctx.text(), "hello");
    }

    #[test]
    fn shorter_mismatch_replaces_buffer() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("hello");
        assert_eq!(ctx.sync("xyz"), SyncOutcome::Adopted);
        assert_eq!(ctx.text(), "xyz");
    }

    #[test]
    fn equal_length_always_adopted() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("abc");
        assert_eq!(ctx.sync("abd"), SyncOutcome::Adopted);
        assert_eq!(ctx.text(), "abd");
    }

    #[test]
    fn longer_read_always_adopted() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("ello");
        assert_eq!(ctx.sync("hello"), SyncOutcome::Adopted);
        assert_eq!(ctx.text(), "hello");
    }

    #[test]
    fn suffix_compare_is_per_character_from_the_end() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("abcdef");
        // Same length as a suffix but differs in the middle.
        assert_eq!(ctx.sync("xcdef"), SyncOutcome::Adopted);
        assert_eq!(ctx.text(), "xcdef");
    }

    #[test]
    fn non_ascii_suffix_match() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("ကခဂ");
        assert_eq!(ctx.sync("ခဂ"), SyncOutcome::KeptExisting);
        assert_eq!(ctx.text(), "ကခဂ");
    }

    #[test]
    fn fresh_read_truncated_to_max_context() {
        let mut ctx = ContextBuffer::new();
        let long: String = "ab".repeat(MAX_CONTEXT);
        ctx.sync(&long);
        assert_eq!(ctx.len_chars(), MAX_CONTEXT);
        assert!(long.ends_with(ctx.text()));
    }

    #[test]
    fn reset_empties() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("hello");
        ctx.reset();
        assert!(ctx.is_empty());
    }

    #[test]
    fn empty_fresh_read_is_suffix_of_anything() {
        let mut ctx = ContextBuffer::new();
        ctx.sync("hello");
        // Zero-length read trivially suffix-matches; keep the buffer.
        assert_eq!(ctx.sync(""), SyncOutcome::KeptExisting);
        assert_eq!(ctx.text(), "hello");
    }
}
