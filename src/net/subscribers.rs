use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Handler<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Registry<T> {
  next_id: u64,
  handlers: Vec<(u64, Handler<T>)>,
}

/// Fan-out registry of message handlers. Handlers run in registration order.
pub struct Subscribers<T> {
  registry: Rc<RefCell<Registry<T>>>,
}

/// Token returned by [`Subscribers::subscribe`]. Dropping it keeps the
/// handler registered; call [`Subscription::unsubscribe`] to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription<T> {
  id: u64,
  registry: Weak<RefCell<Registry<T>>>,
}

impl<T> Subscription<T> {
  pub fn unsubscribe(self) {
    if let Some(registry) = self.registry.upgrade() {
      registry.borrow_mut().handlers.retain(|(id, _)| *id != self.id);
    }
  }
}

impl<T> Default for Subscribers<T> {
  fn default() -> Self {
    Self {
      registry: Rc::new(RefCell::new(Registry { next_id: 0, handlers: Vec::new() })),
    }
  }
}

impl<T> Subscribers<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&self, handler: impl FnMut(&T) + 'static) -> Subscription<T> {
    let mut registry = self.registry.borrow_mut();
    registry.next_id += 1;
    let id = registry.next_id;
    let handler: Handler<T> = Rc::new(RefCell::new(handler));
    registry.handlers.push((id, handler));
    Subscription { id, registry: Rc::downgrade(&self.registry) }
  }

  pub fn len(&self) -> usize {
    self.registry.borrow().handlers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Delivers `message` to every handler registered when dispatch starts.
  ///
  /// Each handler is looked up again right before it runs, so one removed by
  /// an earlier handler in the same dispatch is skipped. The registry is not
  /// borrowed while a handler runs, which lets handlers subscribe and
  /// unsubscribe freely. A handler re-entered through a nested dispatch is
  /// skipped rather than called recursively.
  pub fn dispatch(&self, message: &T) {
    let ids: Vec<u64> = self.registry.borrow().handlers.iter().map(|(id, _)| *id).collect();
    for id in ids {
      let handler = {
        let registry = self.registry.borrow();
        registry.handlers.iter().find(|(hid, _)| *hid == id).map(|(_, h)| Rc::clone(h))
      };
      let Some(handler) = handler else {
        continue;
      };
      if let Ok(mut f) = handler.try_borrow_mut() {
        (&mut *f)(message);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_handlers_run_in_registration_order() {
    let subs: Subscribers<u32> = Subscribers::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let l1 = Rc::clone(&log);
    let _a = subs.subscribe(move |m| l1.borrow_mut().push(("a", *m)));
    let l2 = Rc::clone(&log);
    let _b = subs.subscribe(move |m| l2.borrow_mut().push(("b", *m)));

    subs.dispatch(&1);
    subs.dispatch(&2);
    assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]);
  }

  #[test]
  fn test_unsubscribe_stops_delivery() {
    let subs: Subscribers<u32> = Subscribers::new();
    let count = Rc::new(RefCell::new(0));
    let c = Rc::clone(&count);
    let sub = subs.subscribe(move |_| *c.borrow_mut() += 1);
    subs.dispatch(&0);
    sub.unsubscribe();
    subs.dispatch(&0);
    assert_eq!(*count.borrow(), 1);
    assert!(subs.is_empty());
  }

  #[test]
  fn test_unsubscribe_during_dispatch() {
    let subs: Subscribers<u32> = Subscribers::new();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let victim: Rc<RefCell<Option<Subscription<u32>>>> = Rc::new(RefCell::new(None));

    let v = Rc::clone(&victim);
    let f1 = Rc::clone(&fired);
    let _killer = subs.subscribe(move |_| {
      f1.borrow_mut().push("killer");
      if let Some(sub) = v.borrow_mut().take() {
        sub.unsubscribe();
      }
    });
    let f2 = Rc::clone(&fired);
    *victim.borrow_mut() = Some(subs.subscribe(move |_| f2.borrow_mut().push("victim")));

    subs.dispatch(&0);
    subs.dispatch(&0);
    assert_eq!(*fired.borrow(), vec!["killer", "killer"]);
    assert_eq!(subs.len(), 1);
  }

  #[test]
  fn test_unsubscribe_after_registry_dropped() {
    let subs: Subscribers<u32> = Subscribers::new();
    let sub = subs.subscribe(|_| {});
    drop(subs);
    sub.unsubscribe();
  }
}
