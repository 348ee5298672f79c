// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON merging functionality

use serde_json::Value as J;

/// Merge two JSON values with deep object merging and array replacement
///
/// Objects are merged recursively, scalars/arrays replace the left value.
pub fn merge_two_json(base: &mut J, layer: J) {
    match (base, layer) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_two_json(a.entry(k).or_insert(J::Null), v);
            }
        }
        (_, J::Null) => {}
        (a, b) => *a = b,
    }
}

/// Insert a value at a dotted path in JSON, creating objects on the way
pub fn insert_dotted(root: &mut J, dotted: &str, v: J) {
    let mut cur = root;
    let mut parts = dotted.split('.').peekable();
    while let Some(part) = parts.next() {
        if !cur.is_object() {
            *cur = J::Object(Default::default());
        }
        let J::Object(map) = cur else {
            return;
        };
        if parts.peek().is_none() {
            map.insert(part.to_string(), v);
            return;
        }
        cur = map
            .entry(part.to_string())
            .or_insert_with(|| J::Object(Default::default()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_deep_objects() {
        let mut base = serde_json::json!({"source": {"depot": "Sample"}});
        merge_two_json(&mut base, serde_json::json!({"source": {"server-url": "h:1"}}));
        assert_eq!(base["source"]["depot"], "Sample");
        assert_eq!(base["source"]["server-url"], "h:1");
    }

    #[test]
    fn test_merge_arrays_replace() {
        let mut base = serde_json::json!({"traits": [1, 2]});
        merge_two_json(&mut base, serde_json::json!({"traits": [3]}));
        assert_eq!(base["traits"], serde_json::json!([3]));
    }

    #[test]
    fn test_null_keeps_left() {
        let mut base = serde_json::json!({"tool": "accurev"});
        merge_two_json(&mut base, serde_json::json!({"tool": null}));
        assert_eq!(base["tool"], "accurev");
    }

    #[test]
    fn test_insert_dotted() {
        let mut root = serde_json::json!({"source": "scalar"});
        insert_dotted(&mut root, "source.depot", serde_json::json!("Sample"));
        insert_dotted(&mut root, "tool", serde_json::json!("accurev"));
        assert_eq!(root["source"]["depot"], "Sample");
        assert_eq!(root["tool"], "accurev");
    }
}
