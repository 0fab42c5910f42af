use core::fmt;

use fxhash::FxHashSet;

use crate::value::{Func, Map, Value};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut FxHashSet::default())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<fn {}>", self.name())
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_map(f, self, &mut FxHashSet::default())
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

fn write_value(f: &mut fmt::Formatter, value: &Value, seen: &mut FxHashSet<usize>) -> fmt::Result {
    match value {
        Value::Nil => write!(f, "nil"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(i) => write!(f, "{i}"),
        Value::Str(s) => write!(f, "{:?}", s.as_str()),
        Value::Func(func) => write!(f, "#<fn {}>", func.name()),

        Value::List(list) => {
            write!(f, "[")?;
            for (i, it) in list.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(f, it, seen)?;
            }
            write!(f, "]")
        }

        Value::Map(map) => write_map(f, map, seen),
    }
}

fn write_map(f: &mut fmt::Formatter, map: &Map, seen: &mut FxHashSet<usize>) -> fmt::Result {
    // a map already on the path is a cycle, cut it short
    if !seen.insert(map.id()) {
        return write!(f, "{{...}}");
    }

    // sorted for stable output
    let mut entries = map.entries();
    entries.sort_by(|l, r| l.0.cmp(&r.0));

    write!(f, "{{")?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{key}: ")?;
        write_value(f, value, seen)?;
    }
    write!(f, "}}")?;

    seen.remove(&map.id());
    Ok(())
}
