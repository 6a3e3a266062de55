//! Bidirectional mapping between raw identifiers and dense indices.
//!
//! Indices follow ascending byte-wise order of the distinct identifiers, so
//! index order and identifier order agree.

use ahash::AHashMap;

/// Outcome of looking up a raw identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(usize),
    NotFound,
}

impl Lookup {
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            Lookup::Found(index) => Some(index),
            Lookup::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierEncoder {
    index: AHashMap<String, usize>,
    identifiers: Vec<String>,
}

impl IdentifierEncoder {
    /// Build an encoder over the distinct identifiers in `identifiers`
    pub fn fit<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut identifiers: Vec<String> = identifiers
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        identifiers.sort_unstable();
        identifiers.dedup();

        let index = identifiers
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Self { index, identifiers }
    }

    #[inline]
    pub fn encode(&self, raw: &str) -> Lookup {
        match self.index.get(raw) {
            Some(&i) => Lookup::Found(i),
            None => Lookup::NotFound,
        }
    }

    #[inline]
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.identifiers.get(index).map(String::as_str)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.index.contains_key(raw)
    }

    /// All identifiers in index order
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_index_assignment() {
        let encoder = IdentifierEncoder::fit(["Terraria", "Dota 2", "Portal 2", "Dota 2"]);
        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.encode("Dota 2"), Lookup::Found(0));
        assert_eq!(encoder.encode("Portal 2"), Lookup::Found(1));
        assert_eq!(encoder.encode("Terraria"), Lookup::Found(2));
        assert_eq!(encoder.identifiers(), ["Dota 2", "Portal 2", "Terraria"]);
    }

    #[test]
    fn test_index_independent_of_input_order() {
        let a = IdentifierEncoder::fit(["b", "a", "c"]);
        let b = IdentifierEncoder::fit(["c", "b", "a", "a"]);
        assert_eq!(a.identifiers(), b.identifiers());
    }

    #[test]
    fn test_unknown_identifier() {
        let encoder = IdentifierEncoder::fit(["a"]);
        assert_eq!(encoder.encode("z"), Lookup::NotFound);
        assert_eq!(encoder.encode("z").index(), None);
        assert!(!encoder.contains("z"));
    }

    #[test]
    fn test_round_trip() {
        let ids = ["76561197", "5250", "1", "76561198"];
        let encoder = IdentifierEncoder::fit(ids);
        for id in ids {
            let index = encoder.encode(id).index().unwrap();
            assert_eq!(encoder.decode(index), Some(id));
        }
        assert_eq!(encoder.decode(ids.len()), None);
    }

    #[test]
    fn test_empty() {
        let encoder = IdentifierEncoder::fit(Vec::<String>::new());
        assert!(encoder.is_empty());
        assert_eq!(encoder.encode(""), Lookup::NotFound);
    }
}
