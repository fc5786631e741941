use std::collections::HashSet;

// Keys are lowercased on every insert; a later insert for the same key
// overwrites the earlier value in place, keeping the original position.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HeaderBag {
    entries: Vec<(String, String)>,
}

impl HeaderBag {
    pub fn new() -> HeaderBag {
        HeaderBag {
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<'a, I>(pairs: I) -> HeaderBag
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut bag = HeaderBag::new();

        for (name, value) in pairs {
            bag.insert(name, value);
        }

        bag
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        let key = name.to_lowercase();

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let key = name.to_lowercase();

        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn merge(&mut self, other: &HeaderBag) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    // Folds every source into one bag in the given order; later sources win
    // on key collisions.
    pub fn compose(sources: &[&HeaderBag]) -> HeaderBag {
        let mut bag = HeaderBag::new();

        for source in sources {
            bag.merge(source);
        }

        bag
    }

    // `remove` entries are expected lowercased; bag keys already are.
    pub fn without(&self, remove: &HashSet<String>) -> HeaderBag {
        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| !remove.contains(name))
            .cloned()
            .collect();

        HeaderBag { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
