use std::collections::BTreeMap;

/// Overlays `live` on `fallback`: every live key wins, fallback-only keys pass through.
///
/// When `fallback` covers the whole key space, so does the result.
pub fn merge<K: Ord, V>(fallback: BTreeMap<K, V>, live: BTreeMap<K, V>) -> BTreeMap<K, V> {
    let mut merged = fallback;
    merged.extend(live);
    merged
}
