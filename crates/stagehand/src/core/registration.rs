use std::{fmt, mem};

use crate::error::Result;

/// Removal action stored in a registration.
type RemoveFn = Box<dyn Fn() -> Result<()> + Send + Sync>;

/// Cancellation token returned by every add-handler call.
///
/// Calling [`HandlerRegistration::deregister`] removes exactly the handler
/// that was added. Calling it again is a no-op. Dropping a registration does
/// not deregister: presenters decide when their handlers go away.
pub struct HandlerRegistration {
    /// Removes the handler from its registry.
    remove: RemoveFn,
}

impl fmt::Debug for HandlerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HandlerRegistration")
    }
}

impl HandlerRegistration {
    /// Wrap a removal action. The action must tolerate being called more than
    /// once.
    pub fn new(remove: impl Fn() -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            remove: Box::new(remove),
        }
    }

    /// A registration with nothing to remove.
    pub fn noop() -> Self {
        Self::new(|| Ok(()))
    }

    /// Remove the handler. Blocks until the removal has happened on the UI
    /// thread, so no dispatch that starts afterwards can reach the handler.
    pub fn deregister(&self) -> Result<()> {
        (self.remove)()
    }
}

/// A bundle of registrations owned by one presenter.
#[derive(Debug, Default)]
pub struct Registrations {
    /// Live registrations, in the order they were added.
    items: Vec<HandlerRegistration>,
    /// Deregister everything when dropped.
    on_drop: bool,
}

impl Registrations {
    /// An empty bundle that leaves its handlers alone when dropped.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty bundle that deregisters everything it holds when dropped.
    pub fn scoped() -> Self {
        Self {
            items: vec![],
            on_drop: true,
        }
    }

    /// Keep a registration.
    pub fn push(&mut self, r: HandlerRegistration) {
        self.items.push(r);
    }

    /// Number of held registrations.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Is the bundle empty?
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Deregister and forget every held registration. All removals are
    /// attempted; the first error is returned.
    pub fn deregister_all(&mut self) -> Result<()> {
        let mut first = Ok(());
        for r in mem::take(&mut self.items) {
            let res = r.deregister();
            if first.is_ok() {
                first = res;
            }
        }
        first
    }
}

impl Extend<HandlerRegistration> for Registrations {
    fn extend<I: IntoIterator<Item = HandlerRegistration>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl Drop for Registrations {
    fn drop(&mut self) {
        if self.on_drop {
            self.deregister_all().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::error::Error;

    fn counting() -> (Arc<AtomicUsize>, HandlerRegistration) {
        let n = Arc::new(AtomicUsize::new(0));
        let c = n.clone();
        let r = HandlerRegistration::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (n, r)
    }

    #[test]
    fn bundle_deregisters_all() -> Result<()> {
        let (a, ra) = counting();
        let (b, rb) = counting();
        let mut regs = Registrations::new();
        regs.push(ra);
        regs.extend([rb]);
        assert_eq!(regs.len(), 2);
        regs.deregister_all()?;
        assert!(regs.is_empty());
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        // Nothing left to remove.
        regs.deregister_all()?;
        assert_eq!(a.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn scoped_bundle_deregisters_on_drop() -> Result<()> {
        let (a, ra) = counting();
        let (b, rb) = counting();
        {
            let mut regs = Registrations::scoped();
            regs.push(ra);
        }
        {
            let mut regs = Registrations::new();
            regs.push(rb);
        }
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn first_error_is_reported() -> Result<()> {
        let (a, ra) = counting();
        let mut regs = Registrations::new();
        regs.push(HandlerRegistration::new(|| {
            Err(Error::RunLoop("gone".into()))
        }));
        regs.push(ra);
        assert!(regs.deregister_all().is_err());
        assert_eq!(a.load(Ordering::SeqCst), 1);
        HandlerRegistration::noop().deregister()
    }
}
