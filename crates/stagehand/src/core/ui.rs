use std::{
    any::Any,
    cell::Cell,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
        mpsc,
    },
    thread::{self, ThreadId},
};

use scopeguard::defer;
use tracing::{debug, error, trace};

use crate::error::{self, Error, Result};

/// A unit of work shipped to the UI thread.
type Task = Box<dyn FnOnce() + Send>;

/// Messages accepted by the UI loop.
enum Message {
    /// Run a task.
    Run(Task),
    /// Stop the loop.
    Shutdown,
}

/// State shared by every handle onto one UI loop.
struct Shared {
    /// The thread that owns the scene graph.
    thread: ThreadId,
    /// Next stacking index handed out by [`UiHandle::next_z`].
    z: AtomicI64,
}

/// A cloneable handle onto the UI thread.
///
/// Operations that must observe or mutate scene state go through
/// [`UiHandle::run_sync`], which runs inline when already on the UI thread and
/// otherwise blocks until the UI thread has run them. Fire-and-forget
/// presentation updates go through [`UiHandle::post`].
#[derive(Clone)]
pub struct UiHandle {
    /// Task queue feeding the loop.
    tx: mpsc::Sender<Message>,
    /// Shared loop state.
    shared: Arc<Shared>,
}

impl fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle")
            .field("thread", &self.shared.thread)
            .finish()
    }
}

impl UiHandle {
    /// Is the calling thread the UI thread?
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.shared.thread
    }

    /// Abort with a precondition violation unless called on the UI thread.
    #[track_caller]
    pub fn assert_ui_thread(&self, what: &str) {
        if !self.is_ui_thread() {
            error::precondition(format!("{what} must run on the ui thread"));
        }
    }

    /// Run `f` on the UI thread and return its result. On the UI thread this
    /// runs inline. From any other thread the caller blocks until the loop
    /// has run the task. A panic inside `f` is re-raised in the caller.
    pub fn run_sync<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_ui_thread() {
            return Ok(f());
        }
        let (rtx, rrx) = mpsc::sync_channel(1);
        trace!("ui hand-off");
        self.tx.send(Message::Run(Box::new(move || {
            let r = panic::catch_unwind(AssertUnwindSafe(f));
            rtx.send(r).ok();
        })))?;
        match rrx.recv()? {
            Ok(v) => Ok(v),
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Queue `f` to run on the UI thread and return immediately. This never
    /// runs inline, even on the UI thread: queued tasks run after whatever the
    /// UI thread is currently doing.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx.send(Message::Run(Box::new(f)))?;
        Ok(())
    }

    /// Hand out the next stacking index. Indices start at 1 and strictly
    /// increase for the life of the loop.
    #[track_caller]
    pub fn next_z(&self) -> i64 {
        self.assert_ui_thread("stacking index allocation");
        self.shared.z.fetch_add(1, Ordering::Relaxed)
    }

    /// Ask the loop to stop once it reaches this message. Returns an error if
    /// the loop is already gone.
    pub fn shutdown(&self) -> Result<()> {
        self.tx.send(Message::Shutdown)?;
        Ok(())
    }
}

/// The receiving end of the UI task queue, bound to the thread that created
/// it.
pub struct UiLoop {
    /// Incoming tasks.
    rx: mpsc::Receiver<Message>,
    /// Handle template given out to callers.
    handle: UiHandle,
    /// Set once a shutdown message has been processed.
    stopped: Cell<bool>,
    /// Set while the loop is running tasks.
    draining: Cell<bool>,
}

impl UiLoop {
    /// Create a loop owned by the calling thread. That thread becomes the UI
    /// thread and must drive the loop with [`UiLoop::run`] or
    /// [`UiLoop::run_pending`].
    ///
    /// The loop owns the stacking counter, so an application creates exactly
    /// one loop for its lifetime. Two loops in one process each count from 1.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            handle: UiHandle {
                tx,
                shared: Arc::new(Shared {
                    thread: thread::current().id(),
                    z: AtomicI64::new(1),
                }),
            },
            stopped: Cell::new(false),
            draining: Cell::new(false),
        }
    }

    /// A handle onto this loop.
    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Has the loop seen a shutdown request?
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    /// Process one message. Returns false when the loop should stop.
    fn dispatch(&self, msg: Message) -> bool {
        match msg {
            Message::Run(task) => {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                    error!(reason = panic_reason(&*payload), "ui task panicked, stopping loop");
                    self.stopped.set(true);
                    panic::resume_unwind(payload);
                }
                true
            }
            Message::Shutdown => {
                self.stopped.set(true);
                false
            }
        }
    }

    /// Run tasks until a shutdown message arrives.
    pub fn run(&self) -> Result<()> {
        self.handle.assert_ui_thread("UiLoop::run");
        if self.draining.get() {
            error::precondition("UiLoop::run called from inside a ui task");
        }
        self.draining.set(true);
        debug!("ui loop started");
        defer! {
            self.draining.set(false);
            debug!("ui loop stopped");
        }
        while !self.stopped.get() {
            // We hold a sender ourselves, so recv only fails if that invariant
            // is broken.
            let msg = self.rx.recv()?;
            self.dispatch(msg);
        }
        Ok(())
    }

    /// Run every task that is queued, including tasks queued by those tasks,
    /// and return how many ran. Stops early on a shutdown message. Calling
    /// this from inside a task is a precondition violation.
    pub fn run_pending(&self) -> Result<usize> {
        self.handle.assert_ui_thread("UiLoop::run_pending");
        if self.draining.get() {
            error::precondition("UiLoop::run_pending called from inside a ui task");
        }
        self.draining.set(true);
        defer! {
            self.draining.set(false);
        }
        let mut n = 0;
        while !self.stopped.get() {
            match self.rx.try_recv() {
                Ok(msg) => {
                    if self.dispatch(msg) {
                        n += 1;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    return Err(Error::RunLoop("ui queue disconnected".into()));
                }
            }
        }
        Ok(n)
    }
}

/// Best-effort text of a panic payload.
fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown"
    }
}

/// A dedicated thread running a [`UiLoop`]. Dropping it shuts the loop down
/// and joins the thread.
pub struct UiThread {
    /// Handle onto the loop.
    handle: UiHandle,
    /// Join handle, taken on join.
    join: Option<thread::JoinHandle<Result<()>>>,
}

impl UiThread {
    /// Spawn a named UI thread and wait until its loop is ready.
    pub fn spawn(name: &str) -> Result<Self> {
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let ui = UiLoop::new();
                ready_tx.send(ui.handle()).ok();
                ui.run()
            })
            .map_err(|e| Error::RunLoop(format!("spawning ui thread: {e}")))?;
        let handle = ready_rx.recv()?;
        debug!(name, "ui thread spawned");
        Ok(Self {
            handle,
            join: Some(join),
        })
    }

    /// A handle onto the thread's loop.
    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Shut the loop down and wait for the thread to exit.
    pub fn join(mut self) -> Result<()> {
        self.stop()
    }

    /// Shared by join and drop.
    fn stop(&mut self) -> Result<()> {
        let Some(join) = self.join.take() else {
            return Ok(());
        };
        // The loop may already have stopped on its own.
        self.handle.shutdown().ok();
        join.join()
            .map_err(|_| Error::RunLoop("ui thread panicked".into()))?
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.stop().ok();
    }
}
