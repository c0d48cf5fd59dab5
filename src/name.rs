use core::{fmt, num::NonZeroU16};

use alloc::{boxed::Box, vec::Vec};

use crate::hash::Hasher;

pub const GENERIC_NAME_COMPONENT: u16 = 8;

// Names arrive here already decoded by the substrate, so unlike the
//  wire-level forwarder we keep them owned and cheap to compare.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    components: Vec<NameComponent>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameComponent {
    pub typ: NonZeroU16,
    pub bytes: Box<[u8]>,
}

impl NameComponent {
    pub fn generic(bytes: &[u8]) -> Self {
        Self {
            // Cannot fail, the constant is non-zero
            typ: NonZeroU16::new(GENERIC_NAME_COMPONENT).unwrap_or(NonZeroU16::MIN),
            bytes: Box::from(bytes),
        }
    }
}

impl Name {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    // Parses the "/a/b/c" form, with %XX escapes for arbitrary bytes.
    // All components are generic.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix('/')?;
        let mut components = Vec::new();
        for segment in rest.split('/') {
            if segment.is_empty() {
                continue;
            }
            let bytes = percent_decode(segment)?;
            components.push(NameComponent::generic(&bytes));
        }
        Some(Self { components })
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> impl Iterator<Item = &NameComponent> {
        self.components.iter()
    }

    // Feeds a canonical TLV-like encoding into the hasher, so that equal
    //  names always produce equal digests.
    pub(crate) fn hash_into<H: Hasher>(&self, hasher: &mut H) {
        for cc in self.components.iter() {
            hasher.update(&cc.typ.get().to_be_bytes());
            hasher.update(&(cc.bytes.len() as u64).to_be_bytes());
            hasher.update(&cc.bytes);
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for cc in self.components.iter() {
            f.write_str("/")?;
            if cc.typ.get() != GENERIC_NAME_COMPONENT {
                write!(f, "{}=", cc.typ)?;
            }
            for b in cc.bytes.iter() {
                if b.is_ascii_alphanumeric() || b"-._~".contains(b) {
                    write!(f, "{}", *b as char)?;
                } else {
                    write!(f, "%{:02X}", b)?;
                }
            }
        }
        Ok(())
    }
}

fn percent_decode(segment: &str) -> Option<Vec<u8>> {
    let raw = segment.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = raw.get(i + 1..i + 3)?;
            let hex = core::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::Name;

    #[test]
    fn test_uri_parsing() {
        let name = Name::from_uri("/video/seg%3D1/7").unwrap();
        assert_eq!(name.component_count(), 3);
        let second = name.components().nth(1).unwrap();
        assert_eq!(&*second.bytes, b"seg=1");
        assert_eq!(name.to_string(), "/video/seg%3D1/7");

        assert_eq!(Name::from_uri("/").unwrap().component_count(), 0);
        assert_eq!(Name::from_uri("/").unwrap().to_string(), "/");
        assert!(Name::from_uri("no-slash").is_none());
        assert!(Name::from_uri("/bad%4").is_none());
        assert!(Name::from_uri("/bad%zz").is_none());
    }
}
