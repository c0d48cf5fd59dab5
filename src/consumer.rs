use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

use crate::clock::Timestamp;

// Consumer-side index of the interests that are still waiting for data,
//  ordered by the time each one was (last) sent.
// Sequence numbers sent at the same instant keep the order they were sent in.
#[derive(Default)]
pub struct OutstandingRequests {
    by_time: BTreeMap<(Timestamp, u64), u32>,
    by_seq: BTreeMap<u32, (Timestamp, u64)>,
    next_order: u64,
}

impl OutstandingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    // Sending an already outstanding sequence number again moves it to `now`
    pub fn mark_sent(&mut self, seq: u32, now: Timestamp) {
        if let Some(key) = self.by_seq.remove(&seq) {
            self.by_time.remove(&key);
        }
        let key = (now, self.next_order);
        self.next_order = self.next_order.wrapping_add(1);
        self.by_time.insert(key, seq);
        self.by_seq.insert(seq, key);
    }

    // Returns false if the sequence number was not outstanding
    pub fn acknowledge(&mut self, seq: u32) -> bool {
        match self.by_seq.remove(&seq) {
            Some(key) => {
                self.by_time.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn sent_at(&self, seq: u32) -> Option<Timestamp> {
        self.by_seq.get(&seq).map(|(at, _)| *at)
    }

    pub fn len(&self) -> usize {
        self.by_seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_seq.is_empty()
    }

    // The most overdue sequence number
    pub fn earliest(&self) -> Option<u32> {
        self.by_time.values().next().copied()
    }

    // Sequence numbers sent at or before `now - rto_ms`, oldest first
    pub fn timed_out(&self, now: Timestamp, rto_ms: u64) -> impl Iterator<Item = u32> + '_ {
        let cutoff = now.removing(rto_ms);
        self.by_time
            .iter()
            .take_while(move |((at, _), _)| *at <= cutoff)
            .map(|(_, seq)| *seq)
    }
}

// Collects what the probe picks over time and hands each sequence
//  number to the retransmission scheduler only once.
#[derive(Default)]
pub struct RetransmissionPlan {
    scheduled: BTreeSet<u32>,
}

impl RetransmissionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns the sequence numbers picked now that were not scheduled before
    pub fn update(&mut self, requests: &OutstandingRequests) -> Vec<u32> {
        let mut fresh = Vec::new();
        if let Some(seq) = requests.earliest() {
            if self.scheduled.insert(seq) {
                fresh.push(seq);
            }
        }
        fresh
    }

    pub fn scheduled(&self) -> impl Iterator<Item = u32> + '_ {
        self.scheduled.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    // Called once the data for the sequence number arrived
    pub fn complete(&mut self, seq: u32) -> bool {
        self.scheduled.remove(&seq)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{OutstandingRequests, RetransmissionPlan};
    use crate::clock::Timestamp;

    #[test]
    fn test_empty() {
        let requests = OutstandingRequests::new();
        assert_eq!(requests.earliest(), None);
        assert_eq!(requests.timed_out(Timestamp::from_ms(10), 0).count(), 0);
    }

    #[test]
    fn test_earliest_is_minimum_send_time() {
        let mut requests = OutstandingRequests::new();
        requests.mark_sent(7, Timestamp::from_ms(30));
        requests.mark_sent(3, Timestamp::from_ms(20));
        requests.mark_sent(9, Timestamp::from_ms(40));
        assert_eq!(requests.earliest(), Some(3));

        // Probing does not consume anything
        assert_eq!(requests.earliest(), Some(3));
        assert_eq!(requests.len(), 3);

        assert!(requests.acknowledge(3));
        assert!(!requests.acknowledge(3));
        assert_eq!(requests.earliest(), Some(7));
    }

    #[test]
    fn test_ties_resolve_to_first_sent() {
        let mut requests = OutstandingRequests::new();
        requests.mark_sent(5, Timestamp::from_ms(10));
        requests.mark_sent(2, Timestamp::from_ms(10));
        assert_eq!(requests.earliest(), Some(5));
    }

    #[test]
    fn test_resend_moves_to_new_time() {
        let mut requests = OutstandingRequests::new();
        requests.mark_sent(1, Timestamp::from_ms(10));
        requests.mark_sent(2, Timestamp::from_ms(20));
        requests.mark_sent(1, Timestamp::from_ms(30));

        assert_eq!(requests.len(), 2);
        assert_eq!(requests.earliest(), Some(2));
        assert_eq!(requests.sent_at(1), Some(Timestamp::from_ms(30)));
    }

    #[test]
    fn test_timed_out() {
        let mut requests = OutstandingRequests::new();
        requests.mark_sent(1, Timestamp::from_ms(10));
        requests.mark_sent(2, Timestamp::from_ms(50));
        requests.mark_sent(3, Timestamp::from_ms(90));

        let late: Vec<u32> = requests.timed_out(Timestamp::from_ms(100), 50).collect();
        assert_eq!(late, [1, 2]);
    }

    #[test]
    fn test_plan_schedules_once() {
        let mut requests = OutstandingRequests::new();
        let mut plan = RetransmissionPlan::new();
        assert!(plan.update(&requests).is_empty());

        requests.mark_sent(4, Timestamp::from_ms(1));
        requests.mark_sent(8, Timestamp::from_ms(2));
        assert_eq!(plan.update(&requests), [4]);
        assert!(plan.update(&requests).is_empty());

        requests.acknowledge(4);
        assert_eq!(plan.update(&requests), [8]);
        assert_eq!(plan.scheduled().collect::<Vec<_>>(), [4, 8]);

        assert!(plan.complete(4));
        assert_eq!(plan.len(), 1);
    }
}
