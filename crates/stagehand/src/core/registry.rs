use std::sync::Arc;

use tracing::trace;

use crate::{
    confined::Confined,
    error::Result,
    registration::HandlerRegistration,
    ui::UiHandle,
};

/// Opaque token minted when a handler is added. Removal goes by token, never
/// by comparing handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

/// Registry contents.
struct Entries<H: ?Sized> {
    /// Next token to hand out.
    next: u64,
    /// Members in registration order.
    items: Vec<(HandlerId, Arc<H>)>,
}

impl<H: ?Sized> Entries<H> {
    /// Append a member.
    fn insert(&mut self, h: Arc<H>) -> HandlerId {
        let id = HandlerId(self.next);
        self.next += 1;
        self.items.push((id, h));
        id
    }

    /// Remove a member, returning false if it was already gone.
    fn remove(&mut self, id: HandlerId) -> bool {
        match self.items.iter().position(|(i, _)| *i == id) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Copy out the current members.
    fn snapshot(&self) -> Vec<Arc<H>> {
        self.items.iter().map(|(_, h)| h.clone()).collect()
    }
}

/// An ordered, thread-safe collection of handlers.
///
/// Every mutation and every dispatch happens on the UI thread. Dispatch works
/// on a copy of the membership taken when it starts, so handlers may add or
/// remove themselves and each other while being called.
pub struct HandlerRegistry<H: ?Sized> {
    /// Members, owned by the UI thread.
    entries: Confined<Entries<H>>,
}

impl<H: ?Sized> Clone for HandlerRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<H: ?Sized + Send + Sync + 'static> HandlerRegistry<H> {
    /// An empty registry owned by the loop behind `ui`.
    pub fn new(ui: UiHandle) -> Self {
        Self {
            entries: Confined::new(
                ui,
                Entries {
                    next: 0,
                    items: vec![],
                },
            ),
        }
    }

    /// Append a handler. The returned registration removes exactly this
    /// entry, however many times it is called.
    pub fn add(&self, handler: Arc<H>) -> Result<HandlerRegistration> {
        let id = self.entries.sync(move |e| e.insert(handler))?;
        trace!(?id, "handler added");
        let weak = self.entries.downgrade();
        Ok(HandlerRegistration::new(move || {
            // A registry that is gone has nothing left to remove.
            match weak.upgrade() {
                Some(entries) => entries.sync(move |e| {
                    e.remove(id);
                }),
                None => Ok(()),
            }
        }))
    }

    /// Remove a handler by token. Returns false if it was not present.
    pub fn remove(&self, id: HandlerId) -> Result<bool> {
        self.entries.sync(move |e| e.remove(id))
    }

    /// Number of members.
    pub fn len(&self) -> Result<usize> {
        self.entries.sync(|e| e.items.len())
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Current members in registration order.
    pub fn snapshot(&self) -> Result<Vec<Arc<H>>> {
        self.entries.sync(|e| e.snapshot())
    }

    /// Call `f` on every member, in registration order, on the UI thread.
    /// Returns the number of handlers called.
    pub fn dispatch<F>(&self, f: F) -> Result<usize>
    where
        F: Fn(&H) + Send + 'static,
    {
        let this = self.clone();
        self.entries.ui().run_sync(move || this.dispatch_here(|h| f(h)))
    }

    /// Like [`HandlerRegistry::dispatch`], for callers already on the UI
    /// thread.
    #[track_caller]
    pub fn dispatch_here(&self, mut f: impl FnMut(&H)) -> usize {
        let members = self.entries.with(|e| e.snapshot());
        trace!(n = members.len(), "dispatch");
        for h in &members {
            f(h);
        }
        members.len()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use proptest::prelude::*;

    use super::*;
    use crate::ui::{UiLoop, UiThread};

    /// A handler that records its tag into a shared log.
    trait Tagged: Send + Sync {
        fn tag(&self) -> u32;
    }

    impl Tagged for u32 {
        fn tag(&self) -> u32 {
            *self
        }
    }

    fn collect(r: &HandlerRegistry<dyn Tagged>) -> Vec<u32> {
        let mut v = vec![];
        r.dispatch_here(|h| v.push(h.tag()));
        v
    }

    #[test]
    fn remove_one_of_two() -> Result<()> {
        let ui = UiLoop::new();
        let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
        let a = r.add(Arc::new(1u32))?;
        let _b = r.add(Arc::new(2u32))?;
        a.deregister()?;
        assert_eq!(collect(&r), vec![2]);
        Ok(())
    }

    #[test]
    fn deregister_is_idempotent() -> Result<()> {
        let ui = UiLoop::new();
        let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
        let a = r.add(Arc::new(1u32))?;
        r.add(Arc::new(2u32))?;
        a.deregister()?;
        a.deregister()?;
        a.deregister()?;
        assert_eq!(collect(&r), vec![2]);
        assert_eq!(r.len()?, 1);
        Ok(())
    }

    #[test]
    fn same_handler_twice_is_two_members() -> Result<()> {
        let ui = UiLoop::new();
        let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
        let h: Arc<dyn Tagged> = Arc::new(5u32);
        let first = r.add(h.clone())?;
        r.add(h)?;
        first.deregister()?;
        assert_eq!(collect(&r), vec![5]);
        Ok(())
    }

    #[test]
    fn deregister_after_registry_dropped() -> Result<()> {
        let ui = UiLoop::new();
        let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
        let a = r.add(Arc::new(1u32))?;
        drop(r);
        a.deregister()
    }

    /// Handler that removes itself the first time it runs.
    struct SelfRemoving {
        /// Registration for this handler, filled in after add.
        reg: Mutex<Option<HandlerRegistration>>,
        /// Invocation count.
        calls: AtomicUsize,
    }

    impl Tagged for SelfRemoving {
        fn tag(&self) -> u32 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(r) = self.reg.lock().unwrap().take() {
                r.deregister().unwrap();
            }
            0
        }
    }

    #[test]
    fn self_removal_during_dispatch() -> Result<()> {
        let ui = UiLoop::new();
        let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
        let h = Arc::new(SelfRemoving {
            reg: Mutex::new(None),
            calls: AtomicUsize::new(0),
        });
        let reg = r.add(h.clone())?;
        *h.reg.lock().unwrap() = Some(reg);
        r.add(Arc::new(9u32))?;
        // The snapshot still includes both members.
        assert_eq!(collect(&r), vec![0, 9]);
        assert_eq!(collect(&r), vec![9]);
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    /// Handler that removes a later member the first time it runs.
    struct RemovesOther {
        /// Registration of the member to remove.
        victim: Mutex<Option<HandlerRegistration>>,
    }

    impl Tagged for RemovesOther {
        fn tag(&self) -> u32 {
            if let Some(r) = self.victim.lock().unwrap().take() {
                r.deregister().unwrap();
            }
            1
        }
    }

    #[test]
    fn removing_a_later_member_during_dispatch() -> Result<()> {
        let ui = UiLoop::new();
        let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
        let remover = Arc::new(RemovesOther {
            victim: Mutex::new(None),
        });
        r.add(remover.clone())?;
        let victim = r.add(Arc::new(2u32))?;
        *remover.victim.lock().unwrap() = Some(victim);
        // The member removed mid-dispatch is still in this snapshot.
        assert_eq!(collect(&r), vec![1, 2]);
        assert_eq!(collect(&r), vec![1]);
        assert_eq!(r.len()?, 1);
        Ok(())
    }

    /// Handler that adds a new member the first time it runs.
    struct AddsMember {
        /// Registry to add to.
        registry: HandlerRegistry<dyn Tagged>,
        /// Registration of the added member.
        added: Mutex<Option<HandlerRegistration>>,
    }

    impl Tagged for AddsMember {
        fn tag(&self) -> u32 {
            let mut added = self.added.lock().unwrap();
            if added.is_none() {
                *added = Some(self.registry.add(Arc::new(7u32)).unwrap());
            }
            1
        }
    }

    #[test]
    fn adding_during_dispatch_waits_for_next_dispatch() -> Result<()> {
        let ui = UiLoop::new();
        let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
        let adder = Arc::new(AddsMember {
            registry: r.clone(),
            added: Mutex::new(None),
        });
        r.add(adder.clone())?;
        r.add(Arc::new(2u32))?;
        assert_eq!(collect(&r), vec![1, 2]);
        assert_eq!(r.len()?, 3);
        assert_eq!(collect(&r), vec![1, 2, 7]);
        // Removing the added member leaves the original two.
        if let Some(reg) = adder.added.lock().unwrap().take() {
            reg.deregister()?;
        }
        assert_eq!(collect(&r), vec![1, 2]);
        Ok(())
    }

    #[test]
    fn concurrent_adds_then_dispatch() -> Result<()> {
        const N: usize = 16;
        let ui = UiThread::spawn("registry")?;
        let r: HandlerRegistry<dyn Fn() + Send + Sync> = HandlerRegistry::new(ui.handle());
        let calls = Arc::new(AtomicUsize::new(0));
        let threads: Vec<_> = (0..N)
            .map(|_| {
                let r = r.clone();
                let calls = calls.clone();
                thread::spawn(move || {
                    r.add(Arc::new(move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                    }))
                })
            })
            .collect();
        let mut regs = vec![];
        for t in threads {
            regs.push(t.join().unwrap()?);
        }
        assert_eq!(r.dispatch(|h| h())?, N);
        assert_eq!(calls.load(Ordering::SeqCst), N);
        ui.join()
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Deregister(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Add), (0usize..8).prop_map(Op::Deregister)]
    }

    proptest! {
        #[test]
        fn matches_model(ops in proptest::collection::vec(op(), 0..40)) {
            let ui = UiLoop::new();
            let r: HandlerRegistry<dyn Tagged> = HandlerRegistry::new(ui.handle());
            let mut regs = vec![];
            let mut model: Vec<u32> = vec![];
            let mut next = 0u32;
            for op in ops {
                match op {
                    Op::Add => {
                        regs.push((next, r.add(Arc::new(next)).unwrap()));
                        model.push(next);
                        next += 1;
                    }
                    Op::Deregister(i) => {
                        if let Some((tag, reg)) = regs.get(i) {
                            reg.deregister().unwrap();
                            model.retain(|t| t != tag);
                        }
                    }
                }
            }
            prop_assert_eq!(collect(&r), model);
        }
    }
}
