pub mod local;

use alloc::{boxed::Box, rc::Rc, vec::Vec};

use crate::packet::Data;

// A face is a point of attachment of the node to a link or neighbour.
// The strategy never holds on to faces directly: it keeps tokens
//  and resolves them through the face table on every send.

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceToken(pub u32);

impl core::fmt::Display for FaceToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "face#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FaceError {
    #[error("face is disconnected")]
    Disconnected,
    #[error("face queue is full")]
    Full,
}

pub trait DataSender {
    fn send_data(&mut self, data: &Rc<Data>) -> Result<(), FaceError>;
}

pub struct Faces {
    faces: Vec<(u32, Box<dyn DataSender>)>,
    latest_face_token: u32,
}

impl Faces {
    pub fn new() -> Self {
        Self {
            faces: Default::default(),
            latest_face_token: 0,
        }
    }

    pub fn add_face<S>(&mut self, sender: S) -> Option<FaceToken>
    where
        S: DataSender + 'static,
    {
        let token = self.latest_face_token.checked_add(1)?;
        self.latest_face_token = token;
        self.faces.push((token, Box::new(sender)));
        Some(FaceToken(token))
    }

    pub fn remove_face(&mut self, token: FaceToken) -> bool {
        if let Some(idx) = self.find_face(token) {
            self.faces.remove(idx);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, token: FaceToken) -> bool {
        self.find_face(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    // A face that has gone away is reported the same as a dead link.
    pub fn send(&mut self, token: FaceToken, data: &Rc<Data>) -> Result<(), FaceError> {
        match self.find_face(token) {
            Some(idx) => self.faces[idx].1.send_data(data),
            None => Err(FaceError::Disconnected),
        }
    }

    fn find_face(&self, token: FaceToken) -> Option<usize> {
        // Can do binary search because we always push higher ids to the end
        self.faces.binary_search_by_key(&token.0, |x| x.0).ok()
    }
}

impl Default for Faces {
    fn default() -> Self {
        Self::new()
    }
}
