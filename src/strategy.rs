use alloc::{rc::Rc, vec::Vec};

use log::{debug, info, trace, warn};

use crate::{
    buffer::{BufferedDelivery, DataBuffer},
    clock::{Clock, Timestamp},
    config::StrategyConfig,
    face::{DataSender, FaceToken, Faces},
    faceset::FaceSet,
    metrics::ForwarderMetrics,
    name::Name,
    packet::{Data, Interest},
    redirect::{FaceRetention, RedirectionState},
    store::ContentStore,
    tables::{PendingInterestTable, PitToken},
};

// Handover-aware data forwarding for one node.
//
// Data arriving at the node goes through a small state machine:
// - NoMatch: there is no pending interest for the data name.
//    If data redirection is off the data is unsolicited and dropped.
//    Otherwise it is cached and, for every data-redirect face, either
//    pushed out right away through a made-up PIT entry (edge node in
//    pass-through mode) or kept in the buffer until the controller
//    flushes it towards the new attachment point.
// - DirectMatch: there is at least one pending interest. The data is
//    cached, recorded in the buffer, and every PIT entry for the name
//    is satisfied in turn.
// Satisfying an entry sends the data to all faces that asked for it
//  and, while interest redirection is on, to the redirect faces too.
pub struct HandoverStrategy<C, P, CS, M>
where
    C: Clock,
    P: PendingInterestTable,
    CS: ContentStore,
    M: ForwarderMetrics,
{
    faces: Faces,
    pit: P,
    content_store: CS,
    clock: C,
    metrics: M,
    state: RedirectionState,
    buffer: DataBuffer,
    synthesized_interest_lifetime_ms: u64,
    next_nonce: u32,
    events_since_start: u64,
    events_since_last_prune: u64,
    time_of_last_prune: Timestamp,
}

const EVENTS_BEFORE_PRUNE: u64 = 100;
const MS_BEFORE_PRUNE: u64 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrivalState {
    NoMatch,
    DirectMatch(PitToken),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataOutcome {
    // No pending interest and no data redirection
    Unsolicited,
    // No pending interest, handled by data redirection.
    // Faces the data could not go out on count as skipped.
    Redirected {
        sent: usize,
        buffered: usize,
        skipped: usize,
    },
    // This many PIT entries were satisfied
    Satisfied { entries: usize },
}

impl<C, P, CS, M> HandoverStrategy<C, P, CS, M>
where
    C: Clock,
    P: PendingInterestTable,
    CS: ContentStore,
    M: ForwarderMetrics,
{
    pub fn new(config: &StrategyConfig, mut clock: C, pit: P, content_store: CS, metrics: M) -> Self {
        let state = RedirectionState::new(
            config.is_edge_node,
            config.pass_through,
            config.retransmission_interval_ms,
            config.face_retention,
        );

        let time_of_last_prune = clock.now();

        Self {
            faces: Faces::new(),
            pit,
            content_store,
            clock,
            metrics,
            state,
            buffer: DataBuffer::new(config.buffer_eviction),
            synthesized_interest_lifetime_ms: config.synthesized_interest_lifetime_ms,
            next_nonce: 5318,
            events_since_start: 0,
            events_since_last_prune: 0,
            time_of_last_prune,
        }
    }

    pub fn add_face<S>(&mut self, sender: S) -> Option<FaceToken>
    where
        S: DataSender + 'static,
    {
        self.faces.add_face(sender)
    }

    // Removes the face from the face table, the redirect sets
    //  and every pending interest
    pub fn remove_face(&mut self, face: FaceToken) -> bool {
        if !self.faces.remove_face(face) {
            return false;
        }
        self.state.forget_face(face);
        for token in self.pit.live_entries() {
            if let Some(entry) = self.pit.entry_mut(token) {
                entry.remove_incoming(face);
            }
        }
        true
    }

    pub fn faces(&self) -> &Faces {
        &self.faces
    }

    pub fn pit(&self) -> &P {
        &self.pit
    }

    pub fn pit_mut(&mut self) -> &mut P {
        &mut self.pit
    }

    pub fn content_store(&self) -> &CS {
        &self.content_store
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn state(&self) -> &RedirectionState {
        &self.state
    }

    pub fn buffer(&self) -> &DataBuffer {
        &self.buffer
    }

    pub fn buffer_size(&self) -> u32 {
        u32::try_from(self.buffer.len()).unwrap_or(u32::MAX)
    }

    // Handover controller entry points.
    // Faces unknown to the node are ignored and false is returned.

    pub fn enable_interest_redirect(&mut self, face: FaceToken, start: Timestamp) -> bool {
        if !self.check_face(face) {
            return false;
        }
        self.state.enable_interest_redirect(face, start);
        true
    }

    pub fn enable_data_redirect(&mut self, face: FaceToken, start: Timestamp) -> bool {
        if !self.check_face(face) {
            return false;
        }
        self.state.enable_data_redirect(face, start);
        true
    }

    pub fn disable_interest_redirect(&mut self) {
        self.state.disable_interest_redirect()
    }

    pub fn disable_interest_redirect_with(&mut self, retention: FaceRetention) {
        self.state.disable_interest_redirect_with(retention)
    }

    pub fn disable_data_redirect(&mut self) {
        self.state.disable_data_redirect()
    }

    pub fn disable_data_redirect_with(&mut self, retention: FaceRetention) {
        self.state.disable_data_redirect_with(retention)
    }

    pub fn set_pass_through(&mut self, pass_through: bool) {
        info!("Pass through {}", if pass_through { "on" } else { "off" });
        self.state.set_pass_through(pass_through)
    }

    pub fn set_edge_node(&mut self, is_edge_node: bool) {
        self.state.set_edge_node(is_edge_node)
    }

    pub fn set_retransmission_interval(&mut self, ms: u64) {
        self.state.set_retransmission_interval(ms)
    }

    // Makes the face an additional requester of everything currently
    //  pending, so data already on its way is also delivered there.
    // Returns the number of entries that gained the face.
    pub fn adopt_pending_interests(&mut self, face: FaceToken) -> usize {
        if !self.check_face(face) {
            return 0;
        }
        let mut changed = 0;
        for token in self.pit.live_entries() {
            if let Some(entry) = self.pit.entry_mut(token) {
                if entry.add_incoming(face) {
                    changed += 1;
                }
            }
        }
        debug!("{} adopted {} pending interests", face, changed);
        changed
    }

    pub fn arrival_state(&self, name: &Name) -> ArrivalState {
        match self.pit.lookup(name) {
            Some(token) => ArrivalState::DirectMatch(token),
            None => ArrivalState::NoMatch,
        }
    }

    // The face the data came from may be unknown, e.g. for locally produced data
    pub fn on_data(&mut self, in_face: Option<FaceToken>, data: Rc<Data>) -> DataOutcome {
        let now = self.clock.now();
        self.events_since_start += 1;
        self.events_since_last_prune += 1;

        // Erased entries count against the PIT capacity until pruned
        if self.events_since_last_prune >= EVENTS_BEFORE_PRUNE
            || now
                .difference(&self.time_of_last_prune)
                .unwrap_or(MS_BEFORE_PRUNE)
                >= MS_BEFORE_PRUNE
        {
            self.prune_at(now);
        }

        match self.arrival_state(&data.name) {
            ArrivalState::NoMatch => self.on_unmatched_data(in_face, data, now),
            ArrivalState::DirectMatch(token) => self.on_matched_data(in_face, data, token, now),
        }
    }

    fn on_unmatched_data(
        &mut self,
        in_face: Option<FaceToken>,
        data: Rc<Data>,
        now: Timestamp,
    ) -> DataOutcome {
        let redirect_faces: Vec<FaceToken> = match self.state.data_redirect().effective() {
            Some(faces) => faces.iter().collect(),
            None => {
                trace!("Unsolicited {} from {:?}", data.name, in_face);
                self.metrics.unsolicited_data(in_face, &data, false);
                return DataOutcome::Unsolicited;
            }
        };

        self.content_store.add(&data, now);

        let push_now = self.state.is_edge_node() && self.state.pass_through();

        let mut sent = 0;
        let mut buffered = 0;
        let mut skipped = 0;

        for face in redirect_faces {
            if push_now {
                // We already know the next hop, so we pretend it asked for the data
                let nonce = self.next_nonce();
                match self.synthesize_entry(&data.name, face, nonce, now) {
                    Some(token) => {
                        if self.satisfy(in_face, &data, token).contains(face) {
                            sent += 1;
                        } else {
                            skipped += 1;
                        }
                    }
                    None => {
                        warn!("Cannot create PIT entry for {} towards {}", data.name, face);
                        skipped += 1;
                    }
                }
            } else {
                // Wait for the controller to tell us where the terminal went
                self.buffer.push(BufferedDelivery {
                    timestamp: now,
                    incoming: in_face,
                    outgoing: Some(face),
                    data: Rc::clone(&data),
                });
                self.metrics.data_buffered(Some(face), &data, now);
                debug!("Buffered {} for {} at {}", data.name, face, now);
                buffered += 1;
            }
        }

        DataOutcome::Redirected {
            sent,
            buffered,
            skipped,
        }
    }

    fn on_matched_data(
        &mut self,
        in_face: Option<FaceToken>,
        data: Rc<Data>,
        token: PitToken,
        now: Timestamp,
    ) -> DataOutcome {
        let cached = self.content_store.add(&data, now);
        self.metrics.solicited_data(in_face, &data, cached);

        // Keep the history in case the data has to be replayed after a handover
        self.buffer.push(BufferedDelivery {
            timestamp: now,
            incoming: in_face,
            outgoing: None,
            data: Rc::clone(&data),
        });
        self.metrics.data_buffered(None, &data, now);

        let mut entries = 0;
        let mut next = Some(token);
        while let Some(token) = next {
            self.satisfy(in_face, &data, token);
            entries += 1;

            next = self.pit.lookup(&data.name);
            if next == Some(token) {
                // The table did not take the entry out of lookups, bail instead of spinning
                warn!("PIT still returns satisfied entry {:?} for {}", token, data.name);
                break;
            }
        }

        DataOutcome::Satisfied { entries }
    }

    // Returns the faces the data was successfully sent to
    pub fn satisfy(
        &mut self,
        in_face: Option<FaceToken>,
        data: &Rc<Data>,
        token: PitToken,
    ) -> FaceSet {
        let now = self.clock.now();
        let mut delivered = FaceSet::new();

        let entry = match self.pit.entry_mut(token) {
            Some(entry) => entry,
            None => return delivered,
        };

        // If we forwarded the interest on the face the data came from we know the RTT
        if let Some(in_face) = in_face {
            if let Some(rtt) = entry
                .outgoing()
                .get(&in_face)
                .and_then(|sent_at| now.difference(sent_at))
            {
                self.metrics.rtt_observed(in_face, entry.name(), rtt);
            }
            entry.remove_incoming(in_face);
        }
        self.metrics.interest_satisfied(entry.name());

        let mut seen = FaceSet::new();
        for face in entry.incoming().iter() {
            if Self::send_data(&mut self.faces, &mut self.metrics, in_face, face, data) {
                delivered.insert(face);
            }
            seen.insert(face);
        }

        if let Some(redirect) = self.state.interest_redirect().effective() {
            for face in redirect.difference(&seen) {
                if Self::send_data(&mut self.faces, &mut self.metrics, in_face, face, data) {
                    delivered.insert(face);
                }
            }
        }

        entry.clear_incoming();
        entry.clear_outgoing();

        self.pit.mark_erased(token, now);
        delivered
    }

    // Pushes buffered data that arrived since the redirect boundary out of `target`.
    // Returns how many records were sent.
    pub fn flush_buffer(&mut self, target: FaceToken) -> u32 {
        let boundary = self.state.flush_boundary();
        info!(
            "Flushing buffer of {} records from {} via {}",
            self.buffer.len(),
            boundary,
            target
        );

        let mut total = 0u32;
        let mut flushed = Vec::new();
        let mut last_name = None;

        for key in self.buffer.keys_since(boundary) {
            let (incoming, data) = match self.buffer.get(key) {
                Some(delivery) => (delivery.incoming, Rc::clone(&delivery.data)),
                None => continue,
            };

            if self.pit.lookup(&data.name).is_some() {
                warn!("Buffered {} has a pending interest, not flushing", data.name);
                continue;
            }

            if Self::send_data(&mut self.faces, &mut self.metrics, incoming, target, &data) {
                total = total.saturating_add(1);
                flushed.push(key);
                last_name = Some(data);
            }
        }

        self.buffer.flushed(&flushed);
        self.metrics.buffer_flushed(target, total);

        match last_name {
            Some(data) => info!("Transmitted {}, last was {}", total, data.name),
            None => info!("Transmitted nothing"),
        }
        total
    }

    // Drops stale PIT entries and, depending on the eviction policy, old buffer records.
    // Data arrivals also prune on their own every EVENTS_BEFORE_PRUNE events or MS_BEFORE_PRUNE ms.
    pub fn prune_if_needed(&mut self) {
        let now = self.clock.now();
        self.prune_at(now);
    }

    fn prune_at(&mut self, now: Timestamp) {
        self.events_since_last_prune = 0;
        self.time_of_last_prune = now;

        self.pit.prune_if_needed(now);
        let dropped = self.buffer.prune_if_needed(now);
        if dropped > 0 {
            debug!("Dropped {} buffered records", dropped);
        }
    }

    fn synthesize_entry(
        &mut self,
        name: &Name,
        face: FaceToken,
        nonce: [u8; 4],
        now: Timestamp,
    ) -> Option<PitToken> {
        let lifetime = self.synthesized_interest_lifetime_ms;
        let interest = Interest::new(name.clone(), nonce).with_lifetime(lifetime);

        let token = self.pit.create(&interest, now)?;
        let entry = self.pit.entry_mut(token)?;
        entry.add_seen_nonce(interest.nonce);
        entry.add_incoming(face);
        entry.update_lifetime(now, lifetime);
        Some(token)
    }

    fn next_nonce(&mut self) -> [u8; 4] {
        // djb2 hash using a function of the current strategy state as key
        let key = (self.buffer.len() as u32)
            .wrapping_add(1)
            .wrapping_mul(7)
            .wrapping_add(self.events_since_start as u32);
        self.next_nonce = self.next_nonce.wrapping_mul(33) ^ key;
        self.next_nonce.to_be_bytes()
    }

    fn check_face(&self, face: FaceToken) -> bool {
        if self.faces.contains(face) {
            true
        } else {
            warn!("No such face {}, ignoring", face);
            false
        }
    }

    fn send_data(
        faces: &mut Faces,
        metrics: &mut M,
        in_face: Option<FaceToken>,
        out_face: FaceToken,
        data: &Rc<Data>,
    ) -> bool {
        match faces.send(out_face, data) {
            Ok(()) => {
                debug!("Satisfy {} with {}", out_face, data.name);
                metrics.data_sent(in_face, out_face, data);
                true
            }
            Err(err) => {
                warn!("Cannot send {} to {}: {}", data.name, out_face, err);
                metrics.data_dropped(out_face, data);
                false
            }
        }
    }
}
