//! Live view of who is currently online.

use shared::models::Participant;

/// Set of currently-online participants, keyed by user id.
///
/// Order is the insertion order of the current mapping; an in-place update
/// keeps the entry's position so the roster stays stable across re-joins.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    entries: Vec<Participant>,
}

impl PresenceTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a full roster snapshot, discarding prior state entirely.
    ///
    /// The latest full snapshot always wins over incremental history; this
    /// guards against partial or stale views after a reconnect.
    pub fn replace_all(&mut self, entries: Vec<Participant>) {
        self.entries = entries;
        self.dedup_by_user_id();
    }

    /// Inserts a participant, replacing any existing entry with the same
    /// user id. A reconnecting user must never appear twice.
    pub fn add_or_update(&mut self, entry: Participant) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.user_id == entry.user_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Removes the participant with the given user id; a no-op when absent,
    /// tolerating duplicate or out-of-order leave signals.
    pub fn remove(&mut self, user_id: &str) {
        self.entries.retain(|entry| entry.user_id != user_id);
    }

    /// Empties the view, used on local logout.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Everyone currently online, in stable insertion order.
    #[must_use]
    pub fn list_online(&self) -> &[Participant] {
        &self.entries
    }

    /// Number of participants online.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nobody is online.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // A roster snapshot from the collaborator is trusted but not assumed
    // well-formed; first occurrence wins.
    fn dedup_by_user_id(&mut self) {
        let mut seen = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| {
            if seen.iter().any(|id| *id == entry.user_id) {
                false
            } else {
                seen.push(entry.user_id.clone());
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(user_id: &str, user_name: &str) -> Participant {
        Participant {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
        }
    }

    #[test]
    fn test_add_or_update_never_duplicates_a_user() {
        let mut tracker = PresenceTracker::new();
        tracker.add_or_update(participant("u1", "Bob"));
        tracker.add_or_update(participant("u1", "Bob"));

        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_rejoin_updates_in_place_keeping_position() {
        let mut tracker = PresenceTracker::new();
        tracker.add_or_update(participant("u1", "Bob"));
        tracker.add_or_update(participant("u2", "Carol"));
        tracker.add_or_update(participant("u1", "Bobby"));

        let online = tracker.list_online();
        assert_eq!(online.len(), 2);
        assert_eq!(online[0], participant("u1", "Bobby"));
        assert_eq!(online[1], participant("u2", "Carol"));
    }

    #[test]
    fn test_replace_all_discards_prior_state() {
        let mut tracker = PresenceTracker::new();
        tracker.add_or_update(participant("u1", "Bob"));
        tracker.replace_all(vec![participant("u2", "Carol"), participant("u3", "Dave")]);

        let online = tracker.list_online();
        assert_eq!(online.len(), 2);
        assert!(online.iter().all(|entry| entry.user_id != "u1"));
    }

    #[test]
    fn test_replace_all_rejects_duplicate_ids_in_snapshot() {
        let mut tracker = PresenceTracker::new();
        tracker.replace_all(vec![participant("u1", "Bob"), participant("u1", "Bobby")]);

        assert_eq!(tracker.list_online(), &[participant("u1", "Bob")]);
    }

    #[test]
    fn test_remove_absent_user_is_a_no_op() {
        let mut tracker = PresenceTracker::new();
        tracker.add_or_update(participant("u1", "Bob"));
        tracker.remove("u9");
        tracker.remove("u9");

        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_roster_then_join_then_leave_scenario() {
        let mut tracker = PresenceTracker::new();
        tracker.replace_all(vec![participant("u1", "Bob")]);
        tracker.add_or_update(participant("u2", "Carol"));

        let ids: Vec<&str> = tracker
            .list_online()
            .iter()
            .map(|entry| entry.user_id.as_str())
            .collect();
        assert_eq!(ids, vec!["u1", "u2"]);

        tracker.remove("u1");
        let ids: Vec<&str> = tracker
            .list_online()
            .iter()
            .map(|entry| entry.user_id.as_str())
            .collect();
        assert_eq!(ids, vec!["u2"]);
    }

    #[test]
    fn test_clear_empties_the_view() {
        let mut tracker = PresenceTracker::new();
        tracker.add_or_update(participant("u1", "Bob"));
        tracker.clear();

        assert!(tracker.is_empty());
    }
}
