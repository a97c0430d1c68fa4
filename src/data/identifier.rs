//! Identifier generation for newly created applications
//!
//! Identifiers are short alphanumeric strings. Randomness is taken from
//! v4 UUIDs and mapped onto the alphabet with rejection sampling so every
//! character is drawn uniformly.

use crate::data::application::ApplicationId;
use std::collections::VecDeque;
use uuid::Uuid;

pub const ID_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const ID_LENGTH: usize = 5;

/// Largest multiple of the alphabet size that fits in a byte
const SAMPLE_LIMIT: u8 = (256 / ID_ALPHABET.len() * ID_ALPHABET.len()) as u8;

/// Source of candidate identifiers
pub trait IdentifierSource {
    fn next_id(&mut self) -> ApplicationId;
}

/// Uniform random identifiers over [`ID_ALPHABET`]
#[derive(Debug, Default, Clone)]
pub struct RandomIdentifiers;

impl RandomIdentifiers {
    pub fn new() -> Self {
        Self
    }
}

impl IdentifierSource for RandomIdentifiers {
    fn next_id(&mut self) -> ApplicationId {
        let mut id = String::with_capacity(ID_LENGTH);
        while id.len() < ID_LENGTH {
            for (idx, byte) in Uuid::new_v4().as_bytes().iter().enumerate() {
                // Bytes 6 and 8 carry the fixed version and variant bits
                if idx == 6 || idx == 8 || *byte >= SAMPLE_LIMIT {
                    continue;
                }
                id.push(ID_ALPHABET[(*byte as usize) % ID_ALPHABET.len()] as char);
                if id.len() == ID_LENGTH {
                    break;
                }
            }
        }
        ApplicationId::new(id)
    }
}

/// Replays a fixed list of identifiers, then falls back to random ones
#[derive(Debug, Default, Clone)]
pub struct SequenceIdentifiers {
    queued: VecDeque<ApplicationId>,
    fallback: RandomIdentifiers,
}

impl SequenceIdentifiers {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queued: ids.into_iter().map(ApplicationId::new).collect(),
            fallback: RandomIdentifiers,
        }
    }
}

impl IdentifierSource for SequenceIdentifiers {
    fn next_id(&mut self) -> ApplicationId {
        self.queued
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_id())
    }
}

pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_have_expected_shape() {
        let mut source = RandomIdentifiers::new();
        for _ in 0..1000 {
            let id = source.next_id();
            assert!(is_valid_id(id.as_str()), "bad id: {}", id);
        }
    }

    #[test]
    fn test_random_ids_cover_alphabet() {
        let mut source = RandomIdentifiers::new();
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.extend(source.next_id().as_str().chars());
        }
        // 10k uniform draws over 62 symbols leave none unseen in practice
        assert_eq!(seen.len(), ID_ALPHABET.len());
    }

    #[test]
    fn test_sequence_replays_then_falls_back() {
        let mut source = SequenceIdentifiers::new(["AAAAA", "BBBBB"]);
        assert_eq!(source.next_id().as_str(), "AAAAA");
        assert_eq!(source.next_id().as_str(), "BBBBB");
        assert!(is_valid_id(source.next_id().as_str()));
    }

    #[test]
    fn test_sample_limit() {
        assert_eq!(SAMPLE_LIMIT, 248);
    }
}
