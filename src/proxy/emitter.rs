use std::{cell::RefCell, rc::Rc};

use ecow::EcoString;
use fxhash::FxHashMap;

use crate::value::{Func, Map, OxErr, OxResult, Value};

/// A per-event listener table, shared by handle like [`Map`].
///
/// [`Emitter::attach`] installs `on`, `off` and `emit` as callable members on
/// an instance map, which is how a lazily constructed instance gains listener
/// support the moment it exists.
#[derive(Clone, Default)]
pub struct Emitter(Rc<RefCell<FxHashMap<EcoString, Vec<Func>>>>);

impl Emitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, event: impl Into<EcoString>, listener: Func) {
        self.0.borrow_mut().entry(event.into()).or_default().push(listener);
    }

    /// Removes one registration of `listener`, matched by closure identity.
    pub fn off(&self, event: &str, listener: &Func) {
        let mut table = self.0.borrow_mut();

        let Some(listeners) = table.get_mut(event) else {
            return;
        };

        if let Some(pos) = listeners.iter().position(|it| it == listener) {
            listeners.remove(pos);
            if listeners.is_empty() {
                table.remove(event);
            }
        }
    }

    /// Calls every listener for `event` with `args`, in registration order.
    ///
    /// Returns whether at least one listener ran. A listener error propagates
    /// and stops the dispatch.
    pub fn emit(&self, event: &str, args: &[Value]) -> OxResult<bool> {
        // snapshot: a listener may register or remove listeners mid-emit
        let listeners = self.0.borrow().get(event).cloned().unwrap_or_default();

        for listener in &listeners {
            listener.call(args)?;
        }

        Ok(!listeners.is_empty())
    }

    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.0.borrow().get(event).map_or(0, Vec::len)
    }

    /// Installs `on`, `off` and `emit` members on `target`, all backed by a
    /// fresh table, and returns a handle to that table.
    ///
    /// Members the instance already defines under those names are left
    /// intact; attaching only fills the gaps.
    pub fn attach(target: &Map) -> Self {
        let emitter = Self::new();

        let set = |name: &str, func: Func| {
            if !target.contains(name) {
                target.set(name, Value::Func(func));
            }
        };

        let on = emitter.clone();
        set(
            "on",
            Func::new("on", move |args| {
                let [event, listener] = args else {
                    return Err(arity("on", 2, args.len()));
                };
                on.on(event.as_str()?.clone(), listener.as_func()?.clone());
                Ok(Value::Nil)
            }),
        );

        let off = emitter.clone();
        set(
            "off",
            Func::new("off", move |args| {
                let [event, listener] = args else {
                    return Err(arity("off", 2, args.len()));
                };
                off.off(event.as_str()?, listener.as_func()?);
                Ok(Value::Nil)
            }),
        );

        let emit = emitter.clone();
        set(
            "emit",
            Func::new("emit", move |args| {
                let Some((event, rest)) = args.split_first() else {
                    return Err(arity("emit", 1, 0));
                };
                emit.emit(event.as_str()?, rest).map(Value::Bool)
            }),
        );

        emitter
    }
}

fn arity(name: &str, expected: usize, found: usize) -> OxErr {
    OxErr::Arity {
        name: name.into(),
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::val;

    fn recording_listener(log: &Rc<RefCell<Vec<i64>>>, tag: i64) -> Func {
        let log = Rc::clone(log);
        Func::new("record", move |_| {
            log.borrow_mut().push(tag);
            Ok(Value::Nil)
        })
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = Emitter::new();

        emitter.on("tick", recording_listener(&log, 1));
        emitter.on("tick", recording_listener(&log, 2));

        assert!(emitter.emit("tick", &[]).unwrap());
        assert_eq!(*log.borrow(), [1, 2]);
    }

    #[test]
    fn emit_without_listeners_returns_false() {
        let emitter = Emitter::new();
        assert!(!emitter.emit("silence", &[]).unwrap());
    }

    #[test]
    fn off_removes_by_identity() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = Emitter::new();

        let keep = recording_listener(&log, 1);
        let gone = recording_listener(&log, 2);
        emitter.on("tick", keep.clone());
        emitter.on("tick", gone.clone());

        emitter.off("tick", &gone);
        assert_eq!(emitter.listener_count("tick"), 1);

        emitter.emit("tick", &[]).unwrap();
        assert_eq!(*log.borrow(), [1]);

        emitter.off("tick", &keep);
        assert!(!emitter.emit("tick", &[]).unwrap());
    }

    #[test]
    fn listener_may_mutate_the_table_mid_emit() {
        let emitter = Emitter::new();
        let fired = Rc::new(Cell::new(false));

        let inner_fired = Rc::clone(&fired);
        let registering = {
            let emitter = emitter.clone();
            Func::new("registering", move |_| {
                let inner_fired = Rc::clone(&inner_fired);
                emitter.on(
                    "tick",
                    Func::new("late", move |_| {
                        inner_fired.set(true);
                        Ok(Value::Nil)
                    }),
                );
                Ok(Value::Nil)
            })
        };

        emitter.on("tick", registering);

        // the snapshot keeps the first emit to the original listener
        emitter.emit("tick", &[]).unwrap();
        assert!(!fired.get());

        // the late listener is in place for the next emit
        emitter.emit("tick", &[]).unwrap();
        assert!(fired.get());
    }

    #[test]
    fn listener_error_stops_dispatch() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = Emitter::new();

        emitter.on(
            "tick",
            Func::new("boom", |_| Err(anyhow::anyhow!("boom").into())),
        );
        emitter.on("tick", recording_listener(&log, 1));

        assert!(emitter.emit("tick", &[]).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn attach_installs_callable_members() {
        let instance = Map::new();
        let emitter = Emitter::attach(&instance);

        let on = instance.get("on").unwrap().as_func().unwrap().clone();
        let emit = instance.get("emit").unwrap().as_func().unwrap().clone();

        let seen = Rc::new(Cell::new(0));
        let listener_seen = Rc::clone(&seen);
        on.call(&[
            val!(str "ready"),
            val!(fn "listener", move |args: &[Value]| {
                if let Some(&Value::Int(n)) = args.first() {
                    listener_seen.set(n);
                }
                Ok(Value::Nil)
            }),
        ])
        .unwrap();

        assert_eq!(emitter.listener_count("ready"), 1);
        assert_eq!(
            emit.call(&[val!(str "ready"), val!(int 5)]).unwrap(),
            val!(bool true)
        );
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn attach_keeps_members_the_instance_already_defines() {
        let instance = Map::new();
        let own = Func::new("emit", |_| Ok(Value::Int(7)));
        instance.set("emit", Value::Func(own.clone()));

        Emitter::attach(&instance);

        // the instance's own member wins, the missing ones are filled in
        assert_eq!(instance.get("emit"), Some(Value::Func(own)));
        assert!(matches!(instance.get("on"), Some(Value::Func(_))));
        assert!(matches!(instance.get("off"), Some(Value::Func(_))));
    }

    #[test]
    fn attach_rejects_bad_arguments() {
        let instance = Map::new();
        Emitter::attach(&instance);

        let on = instance.get("on").unwrap().as_func().unwrap().clone();

        assert!(matches!(
            on.call(&[val!(str "tick")]),
            Err(OxErr::Arity { .. })
        ));
        assert!(matches!(
            on.call(&[val!(int 1), val!(nil)]),
            Err(OxErr::TypeErr { .. })
        ));
    }
}
