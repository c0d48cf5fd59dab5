use alloc::boxed::Box;

use crate::{
    hash::{Hasher, Sha256Digest},
    name::Name,
};

// Packets handed to the strategy by the substrate, already decoded.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Data {
    pub name: Name,
    pub content: Box<[u8]>,
    pub freshness_period: Option<u64>,
}

impl Data {
    pub fn new(name: Name, content: &[u8]) -> Self {
        Self {
            name,
            content: Box::from(content),
            freshness_period: None,
        }
    }

    pub fn with_freshness_period(mut self, ms: u64) -> Self {
        self.freshness_period = Some(ms);
        self
    }

    // Digest over name and content, used to tell copies of the same
    //  Data apart from different Data under the same name.
    pub fn implicit_digest<H>(&self, hasher: &mut H) -> Sha256Digest
    where
        H: Hasher<Digest = Sha256Digest>,
    {
        hasher.reset();
        self.name.hash_into(hasher);
        hasher.update(&(self.content.len() as u64).to_be_bytes());
        hasher.update(&self.content);
        hasher.finalize_reset()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interest {
    pub name: Name,
    pub can_be_prefix: bool,
    pub nonce: [u8; 4],
    pub interest_lifetime: Option<u64>,
}

impl Interest {
    pub fn new(name: Name, nonce: [u8; 4]) -> Self {
        Self {
            name,
            can_be_prefix: false,
            nonce,
            interest_lifetime: None,
        }
    }

    pub fn with_lifetime(mut self, ms: u64) -> Self {
        self.interest_lifetime = Some(ms);
        self
    }
}
