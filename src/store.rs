use alloc::{
    collections::{BTreeMap, VecDeque},
    rc::Rc,
};

use crate::{
    clock::Timestamp,
    hash::{Hasher, Sha256Digest},
    name::Name,
    packet::Data,
};

pub trait ContentStore {
    // Returns true if the data was not cached before
    fn add(&mut self, data: &Rc<Data>, now: Timestamp) -> bool;

    fn get(&mut self, name: &Name, now: Timestamp) -> Option<Rc<Data>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Entries are told apart by name and implicit digest, so a different
//  payload under a known name counts as new data.
// Eviction is FIFO on insertion order.
// TODO: move to LRU (touch on every get) once the strategy starts
//  answering interests from the cache.
pub struct ReferenceContentStore<H>
where
    H: Hasher<Digest = Sha256Digest>,
{
    entries: BTreeMap<(Name, Sha256Digest), CachedData>,
    insertion_order: VecDeque<(Name, Sha256Digest)>,
    capacity: usize,
    hasher: H,
}

struct CachedData {
    data: Rc<Data>,
    freshness_deadline: Option<Timestamp>,
}

impl<H> ReferenceContentStore<H>
where
    H: Hasher<Digest = Sha256Digest>,
{
    pub fn new(capacity: usize, hasher: H) -> Self {
        Self {
            entries: Default::default(),
            insertion_order: Default::default(),
            capacity,
            hasher,
        }
    }

    fn evict_if_needed(&mut self) {
        while self.entries.len() > self.capacity {
            match self.insertion_order.pop_front() {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl<H> ContentStore for ReferenceContentStore<H>
where
    H: Hasher<Digest = Sha256Digest>,
{
    fn add(&mut self, data: &Rc<Data>, now: Timestamp) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let digest = data.implicit_digest(&mut self.hasher);
        let key = (data.name.clone(), digest);
        let freshness_deadline = data.freshness_period.map(|ms| now.adding(ms));

        if let Some(existing) = self.entries.get_mut(&key) {
            existing.freshness_deadline = freshness_deadline;
            return false;
        }

        self.entries.insert(
            key.clone(),
            CachedData {
                data: Rc::clone(data),
                freshness_deadline,
            },
        );
        self.insertion_order.push_back(key);
        self.evict_if_needed();
        true
    }

    // Prefers fresh data, but will hand out stale data if that is all there is
    fn get(&mut self, name: &Name, now: Timestamp) -> Option<Rc<Data>> {
        let mut stale = None;
        for ((n, _), cached) in self.entries.iter() {
            if n != name {
                continue;
            }
            match cached.freshness_deadline {
                Some(deadline) if now <= deadline => return Some(Rc::clone(&cached.data)),
                _ => {
                    stale.get_or_insert_with(|| Rc::clone(&cached.data));
                }
            }
        }
        stale
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
