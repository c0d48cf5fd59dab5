use crate::{clock::Timestamp, face::FaceToken, name::Name, packet::Data};

// Passive observer of what the strategy does with data packets.
// Every method defaults to doing nothing, so an implementation
//  only needs to pick the events it cares about.
pub trait ForwarderMetrics {
    fn data_sent(&mut self, _in_face: Option<FaceToken>, _out_face: FaceToken, _data: &Data) {}

    fn data_dropped(&mut self, _out_face: FaceToken, _data: &Data) {}

    fn solicited_data(&mut self, _in_face: Option<FaceToken>, _data: &Data, _cached: bool) {}

    fn unsolicited_data(&mut self, _in_face: Option<FaceToken>, _data: &Data, _cached: bool) {}

    fn interest_satisfied(&mut self, _name: &Name) {}

    fn rtt_observed(&mut self, _face: FaceToken, _name: &Name, _rtt_ms: u64) {}

    fn data_buffered(&mut self, _out_face: Option<FaceToken>, _data: &Data, _at: Timestamp) {}

    fn buffer_flushed(&mut self, _target: FaceToken, _count: u32) {}
}

pub struct InertMetrics {}

impl ForwarderMetrics for InertMetrics {}
