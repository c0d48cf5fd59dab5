use log::info;

use crate::{clock::Timestamp, face::FaceToken, faceset::FaceSet};

// Per-node redirection state, owned by one strategy instance and only
//  changed by the handover controller through the setters below.
//
// There are two independent redirect pairs:
// - interest redirection: faces that additionally receive data that
//    satisfies a pending interest, whether or not they asked for it;
// - data redirection: faces that receive data for which there is no
//    pending interest at all, as if they had asked for it.
// An inactive pair is treated as empty by the strategy, but its faces
//  may still be remembered depending on the retention policy.

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FaceRetention {
    // Faces stay in the set and are reused on the next enable
    #[default]
    Keep,
    // Faces are forgotten when the mode is disabled
    Clear,
}

#[derive(Clone, Debug, Default)]
pub struct RedirectSet {
    active: bool,
    faces: FaceSet,
}

impl RedirectSet {
    pub fn is_active(&self) -> bool {
        self.active
    }

    // All remembered faces, including while inactive
    pub fn faces(&self) -> &FaceSet {
        &self.faces
    }

    // Faces to act on, None while inactive
    pub fn effective(&self) -> Option<&FaceSet> {
        self.active.then_some(&self.faces)
    }

    // Returns true if this call switched the mode on
    fn enable(&mut self, face: FaceToken) -> bool {
        let activated = !self.active;
        self.active = true;
        self.faces.insert(face);
        activated
    }

    fn disable(&mut self, retention: FaceRetention) {
        self.active = false;
        if retention == FaceRetention::Clear {
            self.faces.clear();
        }
    }
}

#[derive(Clone, Debug)]
pub struct RedirectionState {
    interest: RedirectSet,
    data: RedirectSet,
    is_edge_node: bool,
    pass_through: bool,
    redirect_start: Timestamp,
    retransmission_interval_ms: u64,
    retention: FaceRetention,
}

impl RedirectionState {
    pub fn new(
        is_edge_node: bool,
        pass_through: bool,
        retransmission_interval_ms: u64,
        retention: FaceRetention,
    ) -> Self {
        Self {
            interest: RedirectSet::default(),
            data: RedirectSet::default(),
            is_edge_node,
            pass_through,
            redirect_start: Timestamp::ZERO,
            retransmission_interval_ms,
            retention,
        }
    }

    pub fn interest_redirect(&self) -> &RedirectSet {
        &self.interest
    }

    pub fn data_redirect(&self) -> &RedirectSet {
        &self.data
    }

    pub fn is_edge_node(&self) -> bool {
        self.is_edge_node
    }

    pub fn pass_through(&self) -> bool {
        self.pass_through
    }

    pub fn redirect_start(&self) -> Timestamp {
        self.redirect_start
    }

    pub fn retransmission_interval_ms(&self) -> u64 {
        self.retransmission_interval_ms
    }

    pub fn retention(&self) -> FaceRetention {
        self.retention
    }

    // Buffered records at or after this instant are replayed by a flush
    pub fn flush_boundary(&self) -> Timestamp {
        self.redirect_start.adding(self.retransmission_interval_ms)
    }

    // The start time is only taken from the call that switches the mode on,
    //  later calls just add faces.
    pub fn enable_interest_redirect(&mut self, face: FaceToken, start: Timestamp) {
        if self.interest.enable(face) {
            self.redirect_start = start;
            info!("Interest redirection on from {} via {}", start, face);
        } else {
            info!("Interest redirection already on, adding {}", face);
        }
    }

    pub fn enable_data_redirect(&mut self, face: FaceToken, start: Timestamp) {
        if self.data.enable(face) {
            self.redirect_start = start;
            info!("Data redirection on from {} via {}", start, face);
        } else {
            info!("Data redirection already on, adding {}", face);
        }
    }

    pub fn disable_interest_redirect(&mut self) {
        self.disable_interest_redirect_with(self.retention)
    }

    pub fn disable_interest_redirect_with(&mut self, retention: FaceRetention) {
        self.interest.disable(retention);
        info!("Interest redirection off ({:?} faces)", retention);
    }

    pub fn disable_data_redirect(&mut self) {
        self.disable_data_redirect_with(self.retention)
    }

    pub fn disable_data_redirect_with(&mut self, retention: FaceRetention) {
        self.data.disable(retention);
        info!("Data redirection off ({:?} faces)", retention);
    }

    pub fn set_pass_through(&mut self, pass_through: bool) {
        self.pass_through = pass_through;
    }

    pub fn set_edge_node(&mut self, is_edge_node: bool) {
        self.is_edge_node = is_edge_node;
    }

    pub fn set_retransmission_interval(&mut self, ms: u64) {
        self.retransmission_interval_ms = ms;
    }

    // Forgets a face that was removed from the node
    pub(crate) fn forget_face(&mut self, face: FaceToken) {
        self.interest.faces.remove(face);
        self.data.faces.remove(face);
    }
}
