use fxhash::FxHashSet;

use crate::value::{Map, Value};

/// Recursively merge `source` into `target` without overwriting anything
/// `target` already has.
///
/// - map values merge recursively, a missing target key gets a fresh empty
///   map first
/// - every other value (scalars, lists, funcs) is adopted whole, by handle,
///   only when the key is absent from `target`
/// - a source map already on the active recursion path is skipped, so cyclic
///   and diamond-shared graphs terminate
///
/// Mutates `target` in place and returns the same handle for chaining.
pub fn merge(target: Map, source: &Map) -> Map {
    let mut visited = FxHashSet::default();
    merge_into(&target, source, &mut visited);
    target
}

fn merge_into(target: &Map, source: &Map, visited: &mut FxHashSet<usize>) {
    // second encounter along this path contributes nothing
    if !visited.insert(source.id()) {
        return;
    }

    for (key, value) in source.entries() {
        match value {
            Value::Map(ref src_child) => {
                let dst_child = match target.get(&key) {
                    Some(Value::Map(m)) => m,
                    // existing non-map target value wins
                    Some(_) => continue,
                    None => {
                        let m = Map::new();
                        target.set(key.clone(), Value::Map(m.clone()));
                        m
                    }
                };

                merge_into(&dst_child, src_child, visited);
            }

            other => {
                if !target.contains(&key) {
                    target.set(key, other);
                }
            }
        }
    }

    // unmark on exit: the marker tracks the call stack, not merge history
    visited.remove(&source.id());
}
