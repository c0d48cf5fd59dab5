pub mod reference;

use alloc::{collections::BTreeMap, vec::Vec};

use crate::{
    clock::Timestamp,
    face::FaceToken,
    faceset::FaceSet,
    name::Name,
    packet::Interest,
};

// Handle to an entry stored in the PIT. It is only meaningful
//  to the table that issued it and is re-resolved on every use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitToken(pub(crate) u64);

pub trait PendingInterestTable {
    // Finds a live (not erased) entry whose name matches the data name.
    // When several entries exist for the same name, the oldest one is returned.
    fn lookup(&self, name: &Name) -> Option<PitToken>;

    // Creates a new entry for the interest. Returns None if the table
    //  cannot take any more entries.
    fn create(&mut self, interest: &Interest, now: Timestamp) -> Option<PitToken>;

    fn entry(&self, token: PitToken) -> Option<&PitEntry>;
    fn entry_mut(&mut self, token: PitToken) -> Option<&mut PitEntry>;

    // Takes the entry out of lookups but keeps its storage until the next
    //  prune, so timers that still refer to the token see a valid entry.
    fn mark_erased(&mut self, token: PitToken, now: Timestamp);

    fn live_entries(&self) -> Vec<PitToken>;

    // Physically removes erased entries whose grace period has passed
    //  and entries whose lifetime has expired.
    fn prune_if_needed(&mut self, now: Timestamp);
}

#[derive(Clone, Debug)]
pub struct PitEntry {
    name: Name,
    incoming: FaceSet,
    outgoing: BTreeMap<FaceToken, Timestamp>,
    seen_nonces: Vec<[u8; 4]>,
    deadline: Timestamp,
    erased_at: Option<Timestamp>,
}

impl PitEntry {
    pub(crate) fn new(name: Name, deadline: Timestamp) -> Self {
        Self {
            name,
            incoming: FaceSet::new(),
            outgoing: BTreeMap::new(),
            seen_nonces: Vec::new(),
            deadline,
            erased_at: None,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn incoming(&self) -> &FaceSet {
        &self.incoming
    }

    // Faces the interest was forwarded on, with the time it was sent
    pub fn outgoing(&self) -> &BTreeMap<FaceToken, Timestamp> {
        &self.outgoing
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn is_erased(&self) -> bool {
        self.erased_at.is_some()
    }

    pub fn add_incoming(&mut self, face: FaceToken) -> bool {
        self.incoming.insert(face)
    }

    pub fn remove_incoming(&mut self, face: FaceToken) -> bool {
        self.incoming.remove(face)
    }

    pub fn clear_incoming(&mut self) {
        self.incoming.clear()
    }

    pub fn add_outgoing(&mut self, face: FaceToken, sent_at: Timestamp) {
        self.outgoing.insert(face, sent_at);
    }

    pub fn clear_outgoing(&mut self) {
        self.outgoing.clear()
    }

    pub fn add_seen_nonce(&mut self, nonce: [u8; 4]) {
        if !self.seen_nonces.contains(&nonce) {
            self.seen_nonces.push(nonce);
        }
    }

    pub fn has_seen_nonce(&self, nonce: [u8; 4]) -> bool {
        self.seen_nonces.contains(&nonce)
    }

    // The lifetime is only ever extended
    pub fn update_lifetime(&mut self, now: Timestamp, lifetime_ms: u64) {
        self.deadline = self.deadline.max(now.adding(lifetime_ms));
    }

    pub(crate) fn set_erased(&mut self, now: Timestamp) {
        self.erased_at = Some(now);
    }

    pub(crate) fn erased_at(&self) -> Option<Timestamp> {
        self.erased_at
    }
}
