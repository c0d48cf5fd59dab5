use alloc::{collections::BTreeMap, vec::Vec};

use crate::{
    clock::Timestamp,
    name::Name,
    packet::Interest,
    tables::{PendingInterestTable, PitEntry, PitToken},
};

// The reference PIT keeps entries in creation order, which is also the
//  order in which entries for the same name are returned by lookups.
// 1. Every created entry gets a fresh token, even if entries with the
//      same name already exist (the strategy relies on this to synthesize
//      entries for redirected data).
// 2. Erased entries disappear from lookups immediately but stay in storage
//      for `erased_retention_ms`, after which a prune removes them.
// 3. Entries whose deadline has passed are removed by a prune as well.
// 4. Creation fails once `capacity` entries (erased ones included) are stored.

pub struct ReferencePit {
    entries: BTreeMap<PitToken, PitEntry>,
    by_name: BTreeMap<Name, Vec<PitToken>>,
    next_token: u64,
    capacity: usize,
    erased_retention_ms: u64,
}

impl ReferencePit {
    pub fn new(capacity: usize, erased_retention_ms: u64) -> Self {
        Self {
            entries: Default::default(),
            by_name: Default::default(),
            next_token: 0,
            capacity,
            erased_retention_ms,
        }
    }

    // Number of stored entries, including the erased ones awaiting pruning
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_len(&self) -> usize {
        self.by_name.values().map(|tokens| tokens.len()).sum()
    }

    fn unindex(&mut self, name: &Name, token: PitToken) {
        if let Some(tokens) = self.by_name.get_mut(name) {
            tokens.retain(|t| *t != token);
            if tokens.is_empty() {
                self.by_name.remove(name);
            }
        }
    }
}

impl Default for ReferencePit {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_ERASED_RETENTION_MS)
    }
}

impl PendingInterestTable for ReferencePit {
    fn lookup(&self, name: &Name) -> Option<PitToken> {
        self.by_name
            .get(name)
            .and_then(|tokens| tokens.first())
            .copied()
    }

    fn create(&mut self, interest: &Interest, now: Timestamp) -> Option<PitToken> {
        if interest.name.component_count() == 0 {
            return None;
        }
        if self.entries.len() >= self.capacity {
            return None;
        }

        let token = PitToken(self.next_token);
        self.next_token = self.next_token.checked_add(1)?;

        let lifetime = interest
            .interest_lifetime
            .unwrap_or(DEFAULT_DEADLINE_INCREMENT_MS);
        let mut entry = PitEntry::new(interest.name.clone(), now.adding(lifetime));
        entry.add_seen_nonce(interest.nonce);

        self.entries.insert(token, entry);
        self.by_name
            .entry(interest.name.clone())
            .or_default()
            .push(token);

        Some(token)
    }

    fn entry(&self, token: PitToken) -> Option<&PitEntry> {
        self.entries.get(&token)
    }

    fn entry_mut(&mut self, token: PitToken) -> Option<&mut PitEntry> {
        self.entries.get_mut(&token)
    }

    fn mark_erased(&mut self, token: PitToken, now: Timestamp) {
        let name = match self.entries.get_mut(&token) {
            Some(entry) if !entry.is_erased() => {
                entry.set_erased(now);
                entry.name().clone()
            }
            _ => return,
        };
        self.unindex(&name, token);
    }

    fn live_entries(&self) -> Vec<PitToken> {
        let mut tokens: Vec<PitToken> = self.by_name.values().flatten().copied().collect();
        tokens.sort();
        tokens
    }

    fn prune_if_needed(&mut self, now: Timestamp) {
        let retention = self.erased_retention_ms;
        let mut expired = Vec::new();
        for (token, entry) in self.entries.iter() {
            let is_stale = match entry.erased_at() {
                Some(erased_at) => erased_at.adding(retention) < now,
                None => entry.deadline() < now,
            };
            if is_stale {
                expired.push((*token, entry.name().clone(), entry.is_erased()));
            }
        }

        for (token, name, was_erased) in expired {
            self.entries.remove(&token);
            if !was_erased {
                self.unindex(&name, token);
            }
        }
    }
}

const DEFAULT_CAPACITY: usize = 4096;
const DEFAULT_ERASED_RETENTION_MS: u64 = 100;
const DEFAULT_DEADLINE_INCREMENT_MS: u64 = 4000; // 4 sec
