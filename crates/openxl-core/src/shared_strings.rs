//! Shared-string table for string interning

use ahash::AHashMap;

/// Deduplicated, order-stable table of string cell values
///
/// Every unique string gets the next index on first sight and keeps it for
/// the life of the table. The table also counts every reference, which is
/// what the `count` attribute of the shared-strings part reports.
#[derive(Debug, Clone, Default)]
pub struct SharedStringTable {
    /// Unique strings in first-seen order
    strings: Vec<String>,
    /// Fast lookup for deduplication
    index_map: AHashMap<String, u32>,
    /// Total number of references handed out by `intern`
    count: usize,
}

impl SharedStringTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the index of `value`, counting one more reference
    pub fn intern(&mut self, value: &str) -> u32 {
        self.count += 1;

        if let Some(&idx) = self.index_map.get(value) {
            return idx;
        }

        let idx = self.strings.len() as u32;
        self.index_map.insert(value.to_string(), idx);
        self.strings.push(value.to_string());
        idx
    }

    /// Look up a string by index
    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    /// Look up the index of an already interned string without counting a reference
    pub fn index_of(&self, value: &str) -> Option<u32> {
        self.index_map.get(value).copied()
    }

    /// Total number of references (the `count` attribute)
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of distinct strings (the `uniqueCount` attribute)
    pub fn unique_count(&self) -> usize {
        self.strings.len()
    }

    /// Check if nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Unique strings in index order
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Iterate over all strings with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (i as u32, s.as_str()))
    }

    /// Forget every string and reset both counters
    pub fn clear(&mut self) {
        self.strings.clear();
        self.index_map.clear();
        self.count = 0;
    }
}
