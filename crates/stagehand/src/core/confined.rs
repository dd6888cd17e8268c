use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::{error::Result, ui::UiHandle};

/// State that is only ever touched on the UI thread.
///
/// The mutex inside never sees contention: every access is either asserted to
/// be on the UI thread or shipped there first. It exists so that values
/// holding `Confined` state can be shared with other threads. Callers must not
/// call out to handlers while holding the lock.
pub struct Confined<T> {
    /// Loop that owns the state.
    ui: UiHandle,
    /// The state itself.
    cell: Arc<Mutex<T>>,
}

impl<T> Clone for Confined<T> {
    fn clone(&self) -> Self {
        Self {
            ui: self.ui.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<T: Send + 'static> Confined<T> {
    /// Wrap `value` for the UI loop behind `ui`.
    pub fn new(ui: UiHandle, value: T) -> Self {
        Self {
            ui,
            cell: Arc::new(Mutex::new(value)),
        }
    }

    /// The loop that owns this state.
    pub fn ui(&self) -> &UiHandle {
        &self.ui
    }

    /// Access the state from the UI thread.
    #[track_caller]
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.ui.assert_ui_thread("confined state access");
        let mut guard = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Access the state from any thread, blocking until the UI thread has run
    /// `f` if the caller is elsewhere.
    pub fn sync<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut T) -> R + Send + 'static,
    {
        let this = self.clone();
        self.ui.run_sync(move || this.with(f))
    }

    /// Queue `f` against the state on the UI thread.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        let this = self.clone();
        self.ui.post(move || this.with(f))
    }

    /// A non-owning reference, used for links that must not keep the state
    /// alive.
    pub fn downgrade(&self) -> WeakConfined<T> {
        WeakConfined {
            ui: self.ui.clone(),
            cell: Arc::downgrade(&self.cell),
        }
    }

    /// Do two handles refer to the same state?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

/// Weak counterpart of [`Confined`].
pub struct WeakConfined<T> {
    /// Loop that owns the state.
    ui: UiHandle,
    /// The state, if still alive.
    cell: Weak<Mutex<T>>,
}

impl<T> Clone for WeakConfined<T> {
    fn clone(&self) -> Self {
        Self {
            ui: self.ui.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<T> WeakConfined<T> {
    /// Recover a strong handle if the state is still alive.
    pub fn upgrade(&self) -> Option<Confined<T>> {
        self.cell.upgrade().map(|cell| Confined {
            ui: self.ui.clone(),
            cell,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{UiLoop, UiThread};

    #[test]
    fn off_thread_write_is_visible_on_ui_thread() -> Result<()> {
        let ui = UiThread::spawn("confined")?;
        let c = Confined::new(ui.handle(), 0);
        c.sync(|v| *v = 42)?;
        let seen = c.sync(|v| *v)?;
        assert_eq!(seen, 42);
        ui.join()
    }

    #[test]
    fn post_applies_in_order() -> Result<()> {
        let ui = UiLoop::new();
        let c = Confined::new(ui.handle(), vec![]);
        c.post(|v| v.push(1))?;
        c.post(|v| v.push(2))?;
        c.with(|v| assert!(v.is_empty()));
        ui.run_pending()?;
        c.with(|v| assert_eq!(*v, vec![1, 2]));
        Ok(())
    }

    #[test]
    fn weak_links() -> Result<()> {
        let ui = UiLoop::new();
        let c = Confined::new(ui.handle(), 1);
        let w = c.downgrade();
        assert!(w.upgrade().is_some_and(|u| u.ptr_eq(&c)));
        drop(c);
        assert!(w.upgrade().is_none());
        Ok(())
    }
}
