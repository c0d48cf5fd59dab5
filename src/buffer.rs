use alloc::{collections::BTreeMap, rc::Rc, vec::Vec};

use crate::{clock::Timestamp, face::FaceToken, packet::Data};

// Time-ordered history of data that passed through the node while
//  redirection was being set up. Several records can share an arrival
//  time, so every record is keyed by (timestamp, insertion sequence):
//  iteration is by time and then by insertion order.

#[derive(Clone, Debug)]
pub struct BufferedDelivery {
    pub timestamp: Timestamp,
    pub incoming: Option<FaceToken>,
    pub outgoing: Option<FaceToken>,
    pub data: Rc<Data>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BufferKey {
    timestamp: Timestamp,
    sequence: u64,
}

impl BufferKey {
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

// What happens to records once they are no longer needed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BufferEviction {
    // Keep everything for the lifetime of the node
    #[default]
    Retain,
    // Drop records as soon as a flush has pushed them out
    RemoveOnFlush,
    // Drop records older than `ms` on every prune
    MaxAge { ms: u64 },
}

pub struct DataBuffer {
    entries: BTreeMap<BufferKey, BufferedDelivery>,
    next_sequence: u64,
    eviction: BufferEviction,
}

impl DataBuffer {
    pub fn new(eviction: BufferEviction) -> Self {
        Self {
            entries: Default::default(),
            next_sequence: 0,
            eviction,
        }
    }

    pub fn eviction(&self) -> BufferEviction {
        self.eviction
    }

    pub fn push(&mut self, delivery: BufferedDelivery) -> BufferKey {
        let key = BufferKey {
            timestamp: delivery.timestamp,
            sequence: self.next_sequence,
        };
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.insert(key, delivery);
        key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BufferKey, &BufferedDelivery)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    // All records with a timestamp at or after `from`, oldest first
    pub fn since(&self, from: Timestamp) -> impl Iterator<Item = (BufferKey, &BufferedDelivery)> {
        let start = BufferKey {
            timestamp: from,
            sequence: 0,
        };
        self.entries.range(start..).map(|(k, v)| (*k, v))
    }

    pub fn get(&self, key: BufferKey) -> Option<&BufferedDelivery> {
        self.entries.get(&key)
    }

    pub fn remove(&mut self, key: BufferKey) -> Option<BufferedDelivery> {
        self.entries.remove(&key)
    }

    // Called after a flush with the keys of the records that were pushed out
    pub(crate) fn flushed(&mut self, keys: &[BufferKey]) {
        if self.eviction == BufferEviction::RemoveOnFlush {
            for key in keys {
                self.entries.remove(key);
            }
        }
    }

    // Returns how many records were dropped
    pub fn prune_if_needed(&mut self, now: Timestamp) -> usize {
        let max_age = match self.eviction {
            BufferEviction::MaxAge { ms } => ms,
            _ => return 0,
        };
        let before = self.entries.len();
        let cutoff = now.removing(max_age);
        // Everything strictly older than the cutoff goes
        let keep = self.entries.split_off(&BufferKey {
            timestamp: cutoff,
            sequence: 0,
        });
        self.entries = keep;
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear()
    }

    pub(crate) fn keys_since(&self, from: Timestamp) -> Vec<BufferKey> {
        self.since(from).map(|(k, _)| k).collect()
    }
}

impl Default for DataBuffer {
    fn default() -> Self {
        Self::new(BufferEviction::default())
    }
}
