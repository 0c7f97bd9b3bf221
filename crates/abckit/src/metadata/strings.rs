//! Interned string storage

use rustc_hash::FxHashMap;

/// Per-file string table
///
/// Strings are interned and never removed, so a string index stays valid
/// for the lifetime of the file.
#[derive(Debug, Clone, Default)]
pub(crate) struct StringPool {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, u32>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string and return its index
    pub fn intern(&mut self, value: &str) -> u32 {
        if let Some(&index) = self.lookup.get(value) {
            return index;
        }
        let index = self.strings.len() as u32;
        self.strings.push(value.into());
        self.lookup.insert(value.into(), index);
        index
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(|s| &**s)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| &**s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning() {
        let mut pool = StringPool::new();
        let a = pool.intern("m0F0");
        let b = pool.intern("m1F0");
        assert_eq!(pool.intern("m0F0"), a);
        assert_ne!(a, b);
        assert_eq!(pool.get(b), Some("m1F0"));
        assert_eq!(pool.len(), 2);
        assert!(pool.get(2).is_none());
    }
}
