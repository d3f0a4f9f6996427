//! Quick lookup of named, numbered entries such as surahs and juz.
//!
//! An entry matches when its normalized name contains the normalized query,
//! or when its number written in decimal contains the query. An empty query
//! matches everything. Filtering preserves the input order.

use serde::{Deserialize, Serialize};

use crate::analysis::normalize;
use crate::error::{HarfError, Result};

/// Something that can be found by name or number.
pub trait Named {
    /// Display name, e.g. "الفاتحة".
    fn name(&self) -> &str;

    /// Position in its collection, e.g. the surah order.
    fn order(&self) -> Option<u32> {
        None
    }
}

/// A named entry with its order number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub order: u32,
    pub name: String,
}

impl LookupEntry {
    pub fn new<S: Into<String>>(order: u32, name: S) -> Self {
        LookupEntry {
            order,
            name: name.into(),
        }
    }
}

impl Named for LookupEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> Option<u32> {
        Some(self.order)
    }
}

/// Check that entries are usable for lookup.
///
/// Every name must contain something besides whitespace.
pub fn validate_entries<T: Named>(entries: &[T]) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.name().trim().is_empty() {
            let label = entry
                .order()
                .map_or_else(|| format!("#{index}"), |order| order.to_string());
            return Err(HarfError::lookup(format!("Entry {label} has an empty name")));
        }
    }
    Ok(())
}

/// Filter `entries` by a raw query.
pub fn filter_entries<'a, T: Named>(entries: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = normalize(query.trim());
    entries
        .iter()
        .filter(|entry| matches_normalized(&normalize(entry.name()), entry.order(), &needle))
        .collect()
}

fn matches_normalized(normalized_name: &str, order: Option<u32>, needle: &str) -> bool {
    needle.is_empty()
        || normalized_name.contains(needle)
        || order.is_some_and(|order| order.to_string().contains(needle))
}

/// Entries with their names normalized once, for repeated filtering.
///
/// Useful when the same list is filtered on every keystroke.
#[derive(Debug, Clone)]
pub struct NameIndex<T> {
    entries: Vec<T>,
    normalized: Vec<String>,
}

impl<T: Named> NameIndex<T> {
    pub fn new(entries: Vec<T>) -> Self {
        let normalized = entries.iter().map(|e| normalize(e.name())).collect();
        NameIndex {
            entries,
            normalized,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Entries matching a raw query, in their original order.
    pub fn filter(&self, query: &str) -> Vec<&T> {
        let needle = normalize(query.trim());
        self.entries
            .iter()
            .zip(&self.normalized)
            .filter(|(entry, name)| matches_normalized(name, entry.order(), &needle))
            .map(|(entry, _)| entry)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surahs() -> Vec<LookupEntry> {
        vec![
            LookupEntry::new(1, "الفَاتِحَة"),
            LookupEntry::new(2, "البَقَرَة"),
            LookupEntry::new(3, "آل عِمْرَان"),
            LookupEntry::new(12, "يُوسُف"),
            LookupEntry::new(20, "طه"),
            LookupEntry::new(21, "الأنبياء"),
            LookupEntry::new(92, "الليل"),
            LookupEntry::new(112, "الإخلاص"),
        ]
    }

    fn orders(found: &[&LookupEntry]) -> Vec<u32> {
        found.iter().map(|e| e.order).collect()
    }

    #[test]
    fn test_filter_ignores_diacritics_and_variants() {
        let entries = surahs();
        assert_eq!(orders(&filter_entries(&entries, "الفاتحه")), vec![1]);
        assert_eq!(orders(&filter_entries(&entries, "البقرة")), vec![2]);
        assert_eq!(orders(&filter_entries(&entries, "ال عمران")), vec![3]);
        assert_eq!(orders(&filter_entries(&entries, "الاخلاص")), vec![112]);
        assert_eq!(orders(&filter_entries(&entries, "انبيا")), vec![21]);
    }

    #[test]
    fn test_filter_by_order_number() {
        let entries = surahs();
        assert_eq!(orders(&filter_entries(&entries, "12")), vec![12, 112]);
        assert_eq!(orders(&filter_entries(&entries, "2")), vec![2, 12, 20, 21, 92, 112]);
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let entries = surahs();
        assert_eq!(filter_entries(&entries, "").len(), entries.len());
        assert_eq!(filter_entries(&entries, "   ").len(), entries.len());
    }

    #[test]
    fn test_no_match() {
        let entries = surahs();
        assert!(filter_entries(&entries, "زيد").is_empty());
    }

    #[test]
    fn test_name_index_agrees_with_filter() {
        let entries = surahs();
        let index = NameIndex::new(entries.clone());
        assert_eq!(index.len(), 8);

        for query in ["ال", "1", "يوسف", "طه", "x", ""] {
            let expected = orders(&filter_entries(&entries, query));
            assert_eq!(orders(&index.filter(query)), expected, "query: {query}");
        }
    }

    #[test]
    fn test_named_without_order() {
        struct Reciter(&'static str);
        impl Named for Reciter {
            fn name(&self) -> &str {
                self.0
            }
        }

        let reciters = [Reciter("مشاري العفاسي"), Reciter("عبد الباسط")];
        let found = filter_entries(&reciters, "العفاسى");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "مشاري العفاسي");
        assert!(filter_entries(&reciters, "1").is_empty());
    }

    #[test]
    fn test_validate_entries() {
        assert!(validate_entries(&surahs()).is_ok());

        let bad = vec![LookupEntry::new(1, "الفاتحة"), LookupEntry::new(2, "  ")];
        let err = validate_entries(&bad).unwrap_err();
        assert_eq!(err.to_string(), "Lookup error: Entry 2 has an empty name");
    }
}
