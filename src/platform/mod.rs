#[cfg(feature = "std")]
mod native;

#[cfg(feature = "std")]
pub use native::*;

#[cfg(feature = "sha2")]
pub mod sha {
    use sha2::{Digest, Sha256};

    use crate::hash::{Hasher, Sha256Digest};

    pub struct Sha256Hasher {
        inner: Sha256,
    }

    impl Sha256Hasher {
        pub fn new() -> Self {
            Self {
                inner: Sha256::new(),
            }
        }
    }

    impl Default for Sha256Hasher {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Hasher for Sha256Hasher {
        type Digest = Sha256Digest;

        fn reset(&mut self) {
            Digest::reset(&mut self.inner);
        }

        fn update(&mut self, input: &[u8]) {
            Digest::update(&mut self.inner, input);
        }

        fn finalize_reset(&mut self) -> Self::Digest {
            Sha256Digest(self.inner.finalize_reset().into())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Sha256Hasher;
        use crate::{hash::Hasher, name::Name, packet::Data};

        #[test]
        fn test_digest_tells_payloads_apart() {
            let mut hasher = Sha256Hasher::new();
            let name = Name::from_uri("/a/b").unwrap();
            let one = Data::new(name.clone(), b"1").implicit_digest(&mut hasher);
            let again = Data::new(name.clone(), b"1").implicit_digest(&mut hasher);
            let two = Data::new(name, b"2").implicit_digest(&mut hasher);
            assert_eq!(one, again);
            assert_ne!(one, two);

            // Component boundaries are part of the digest
            let split = Data::new(Name::from_uri("/ab").unwrap(), b"1").implicit_digest(&mut hasher);
            assert_ne!(one, split);

            hasher.update(b"leftover");
            hasher.reset();
            assert_eq!(Data::new(Name::from_uri("/a/b").unwrap(), b"1").implicit_digest(&mut hasher), one);
        }
    }
}
