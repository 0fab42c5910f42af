use std::{cell::RefCell, rc::Rc};

use ecow::EcoString;

use crate::value::{Func, Map, OxResult, Value};

pub mod emitter;

use emitter::Emitter;

/// The declared set of member names a lazy proxy forwards.
///
/// This stands in for runtime prototype introspection: forwardable members
/// are listed up front, either directly with [`Shape::new`] or read off a
/// template map's own keys with [`Shape::of`]. Inherited members of a
/// multi-level template are never picked up.
#[derive(Clone, Debug, Default)]
pub struct Shape(Vec<EcoString>);

impl Shape {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EcoString>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Shape of a template map: its own keys, nothing else.
    #[must_use]
    pub fn of(template: &Map) -> Self {
        Self(template.keys())
    }

    #[must_use]
    pub fn names(&self) -> &[EcoString] {
        &self.0
    }
}

struct Slot {
    ctor: Box<dyn Fn() -> OxResult<Map>>,
    instance: RefCell<Option<Map>>,
    emitter: bool,
}

impl Slot {
    /// Construct-at-most-once: only a successful construction is recorded,
    /// so a failing ctor is retried on the next forwarded call.
    fn force(&self) -> OxResult<Map> {
        if let Some(instance) = self.instance.borrow().as_ref() {
            return Ok(instance.clone());
        }

        let instance = (self.ctor)()?;
        if self.emitter {
            Emitter::attach(&instance);
        }

        *self.instance.borrow_mut() = Some(instance.clone());
        Ok(instance)
    }
}

/// Build a forwarding map over an instance that is only constructed on first
/// use.
///
/// The proxy has one [`Func`] entry per shape name and can be handed out
/// immediately, before constructing the real instance is safe or cheap.
/// A forwarded call looks the member up on the (possibly just constructed)
/// instance: funcs are called with the forwarded arguments, plain values are
/// returned as-is (read fresh on every call, arguments ignored), absent
/// members yield [`Value::Nil`]. Errors from the ctor or the member propagate
/// unmodified.
///
/// With `is_emitter`, [`Emitter::attach`] runs right after construction, so
/// listener registration works before any other member is touched. The shape
/// must name `on`/`off`/`emit` for the proxy to forward them.
pub fn lazy_instance<F>(ctor: F, shape: &Shape, is_emitter: bool) -> Map
where
    F: Fn() -> OxResult<Map> + 'static,
{
    let slot = Rc::new(Slot {
        ctor: Box::new(ctor),
        instance: RefCell::new(None),
        emitter: is_emitter,
    });

    let proxy = Map::new();
    for name in shape.names() {
        let slot = Rc::clone(&slot);
        let member = name.clone();

        let forward = Func::new(name.clone(), move |args| {
            let instance = slot.force()?;

            match instance.get(&member) {
                Some(Value::Func(f)) => f.call(args),
                Some(plain) => Ok(plain),
                None => Ok(Value::Nil),
            }
        });

        proxy.set(name.clone(), Value::Func(forward));
    }

    proxy
}
