use std::{cell::RefCell, rc::Rc};

use ecow::EcoString;
use fxhash::FxHashMap;
use thiserror::Error;

pub type OxResult<T> = Result<T, OxErr>;

pub mod cast;
pub mod val_macro;


pub use cast::ValueType;

/// cheap to clone, only contains small values (with copy)
/// or `Rc`s
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Str(EcoString),
    List(im::Vector<Value>),
    Map(Map),
    Func(Func),
}

/// A shared, mutable, string-keyed object.
///
/// Cloning a `Map` clones the handle, not the contents; every clone aliases
/// the same underlying table, so cycles and shared sub-structures are
/// representable. Identity, not contents, is what [`Map::id`] and
/// [`Map::ptr_eq`] compare.
#[derive(Clone, Default)]
pub struct Map(Rc<RefCell<FxHashMap<EcoString, Value>>>);

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<EcoString>, val: Value) {
        self.0.borrow_mut().insert(key.into(), val);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the map's own keys.
    #[must_use]
    pub fn keys(&self) -> Vec<EcoString> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Snapshot of the map's own entries. Releases the borrow before
    /// returning, so the map may be mutated while iterating the snapshot.
    #[must_use]
    pub fn entries(&self) -> Vec<(EcoString, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Identity of the shared allocation, stable while any handle is alive.
    #[must_use]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Maps compare by identity; structural comparison would not terminate
// on cyclic graphs.
impl Eq for Map {}
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// A named, reference-counted closure over `&[Value]` arguments.
#[derive(Clone)]
pub struct Func {
    name: EcoString,
    f: Rc<dyn Fn(&[Value]) -> OxResult<Value>>,
}

impl Func {
    pub fn new(
        name: impl Into<EcoString>,
        f: impl Fn(&[Value]) -> OxResult<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Rc::new(f),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> OxResult<Value> {
        (self.f)(args)
    }
}

impl Eq for Func {}
// no two funcs are equal unless they share the same closure
impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl Eq for Value {}
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(l), Self::Bool(r)) => l == r,
            (Self::Int(l), Self::Int(r)) => l == r,
            (Self::Str(l), Self::Str(r)) => l == r,
            (Self::List(l), Self::List(r)) => l == r,
            (Self::Map(l), Self::Map(r)) => l == r,
            (Self::Func(l), Self::Func(r)) => l == r,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum OxErr {
    #[error(transparent)]
    Any(#[from] anyhow::Error),

    #[error("Type error, expected: {expected}, found: {found}")]
    TypeErr {
        expected: ValueType,
        found: ValueType,
    },

    #[error("Wrong number of arguments for {name}: expected {expected}, found {found}")]
    Arity {
        name: EcoString,
        expected: usize,
        found: usize,
    },
}
