//! Canonical JSON for digests and snapshot files.
//!
//! Object keys are emitted in byte order at every depth, arrays keep their
//! order, and output is compact with no trailing newline. Files are written
//! through a temp file in the target directory and renamed into place.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Borrowed view of a `Value` that serializes with sorted keys.
struct Canonical<'a>(&'a Value);

impl Serialize for Canonical<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Array(items) => s.collect_seq(items.iter().map(Canonical)),
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                s.collect_map(entries.into_iter().map(|(k, v)| (k, Canonical(v))))
            }
            scalar => scalar.serialize(s),
        }
    }
}

pub fn to_canonical_json_bytes(v: &Value) -> Vec<u8> {
    // A `Value` has string keys only, so writing it to memory cannot fail.
    serde_json::to_vec(&Canonical(v)).unwrap_or_default()
}

/// Replace `path` with the canonical bytes of `v`, creating parent directories.
pub fn write_canonical_file(path: &Path, v: &Value) -> io::Result<()> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&to_canonical_json_bytes(v))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_are_sorted_arrays_preserved() {
        let v = json!({
            "totalAmount": 1000,
            "items": [ {"name": "b", "cause": {"id": "2"}}, 3, "z" ],
            "allocationMode": { "mode": "simple", "waqfType": "permanent" }
        });
        let s = String::from_utf8(to_canonical_json_bytes(&v)).unwrap();
        assert_eq!(
            s,
            r#"{"allocationMode":{"mode":"simple","waqfType":"permanent"},"items":[{"cause":{"id":"2"},"name":"b"},3,"z"],"totalAmount":1000}"#
        );
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!({"name": "Masjid \"Al-Noor\"\n"});
        let s = String::from_utf8(to_canonical_json_bytes(&v)).unwrap();
        assert_eq!(s, r#"{"name":"Masjid \"Al-Noor\"\n"}"#);
    }

    #[test]
    fn atomic_write_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snap.json");
        let v = json!({"b": 1, "a": [1.5, 2]});
        write_canonical_file(&path, &v).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, r#"{"a":[1.5,2],"b":1}"#);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn rewrite_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        write_canonical_file(&path, &json!({"v": 1})).unwrap();
        write_canonical_file(&path, &json!({"v": 2})).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"v":2}"#);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn nested_keys_are_sorted_inside_arrays() {
        let v = json!([{"z": {"b": 0.1, "a": null}, "y": true}]);
        let s = String::from_utf8(to_canonical_json_bytes(&v)).unwrap();
        assert_eq!(s, r#"[{"y":true,"z":{"a":null,"b":0.1}}]"#);
    }
}
