//! Candidate-URL generation for a table id.
//!
//! The site's download page computes its machine-downloadable-table (MDT)
//! filename in client-side script, so we cannot rely on static markup alone.
//! This module re-derives that filename pattern offline: prefix + stem +
//! known variant suffixes, enumerated in likelihood order. No network
//! validation happens here; the pipeline tries candidates in order.

use std::collections::BTreeMap;

/// Reconstruction of the site's client-side filename rule for one table.
#[derive(Debug, Clone)]
pub struct MdtPattern {
    /// Path under the site root the generated files land in.
    pub prefix: &'static str,
    /// Filename stem in front of the table id.
    pub stem: &'static str,
    /// Variant suffixes observed in the page's script source, most likely
    /// first (locale segments, bare extension).
    pub suffixes: &'static [&'static str],
}

impl MdtPattern {
    fn candidate_urls(&self, base_url: &str, table_id: &str) -> Vec<String> {
        self.suffixes
            .iter()
            .map(|suffix| {
                format!(
                    "{}/{}/{}{}{}",
                    base_url.trim_end_matches('/'),
                    self.prefix.trim_matches('/'),
                    self.stem,
                    table_id,
                    suffix
                )
            })
            .collect()
    }
}

/// Maps table ids to their reconstructed filename patterns. The trait is the
/// seam for new sources: a new site means a new provider, not pipeline edits.
pub trait PatternProvider {
    fn pattern_for(&self, table_id: &str) -> Option<&MdtPattern>;
}

/// In-memory registry, populated with the known C&SD tables by default.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: BTreeMap<String, MdtPattern>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registry. The suffix list is a best-effort read of the
    /// page's script source and is data, not logic; correct it here if the
    /// site changes its naming rule.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register(
            "HEA001",
            MdtPattern {
                prefix: "attachment",
                stem: "Table_",
                suffixes: &["_en.csv", "_tc.csv", ".csv"],
            },
        );
        table
    }

    pub fn register(&mut self, table_id: impl Into<String>, pattern: MdtPattern) {
        self.patterns.insert(table_id.into(), pattern);
    }
}

impl PatternProvider for PatternTable {
    fn pattern_for(&self, table_id: &str) -> Option<&MdtPattern> {
        self.patterns.get(table_id)
    }
}

/// Produce the ordered candidate URLs for `table_id`.
///
/// First the site's advertised direct-download endpoint, then one URL per
/// reconstructed MDT variant. An unregistered id yields an empty vector and
/// the caller falls back to manual resolution.
pub fn resolve(
    provider: &impl PatternProvider,
    base_url: &str,
    table_id: &str,
) -> Vec<String> {
    let Some(pattern) = provider.pattern_for(table_id) else {
        return Vec::new();
    };

    let base = base_url.trim_end_matches('/');
    let mut candidates = vec![format!(
        "{}/en/web_table.html?id={}&format=csv",
        base, table_id
    )];
    candidates.extend(pattern.candidate_urls(base, table_id));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_id_resolves_direct_endpoint_first() {
        let table = PatternTable::builtin();
        let candidates = resolve(&table, "https://www.censtatd.gov.hk", "HEA001");
        assert!(!candidates.is_empty());
        assert_eq!(
            candidates[0],
            "https://www.censtatd.gov.hk/en/web_table.html?id=HEA001&format=csv"
        );
        assert_eq!(
            candidates[1],
            "https://www.censtatd.gov.hk/attachment/Table_HEA001_en.csv"
        );
    }

    #[test]
    fn resolution_is_deterministic_and_order_stable() {
        let table = PatternTable::builtin();
        let first = resolve(&table, "https://www.censtatd.gov.hk", "HEA001");
        let second = resolve(&table, "https://www.censtatd.gov.hk", "HEA001");
        assert_eq!(first, second);
    }

    #[test]
    fn unregistered_id_resolves_empty() {
        let table = PatternTable::builtin();
        assert!(resolve(&table, "https://www.censtatd.gov.hk", "NOPE999").is_empty());
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let table = PatternTable::builtin();
        let candidates = resolve(&table, "https://www.censtatd.gov.hk/", "HEA001");
        assert_eq!(
            candidates[2],
            "https://www.censtatd.gov.hk/attachment/Table_HEA001_tc.csv"
        );
    }
}
