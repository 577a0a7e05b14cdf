use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

type Callback<T> = Rc<dyn Fn(&T)>;
type RearmHook = Rc<dyn Fn()>;

pub struct Source<T> {
    callbacks: Rc<RefCell<Vec<Callback<T>>>>,
}

impl<T> Default for Source<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Source<T> {
    pub fn new() -> Self {
        Self {
            callbacks: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn emit(&self, item: T) {
        let callbacks = self.callbacks.borrow();
        for callback in callbacks.iter() {
            callback(&item);
        }
    }

    pub fn to_stream(&self) -> Stream<T> {
        Stream {
            callbacks: self.callbacks.clone(),
        }
    }
}

pub struct Stream<T> {
    callbacks: Rc<RefCell<Vec<Callback<T>>>>,
}

impl<T> Stream<T> {
    pub fn map<U, F>(&self, f: F) -> Stream<U>
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        let downstream = Rc::new(RefCell::new(Vec::<Callback<U>>::new()));
        let downstream_clone = downstream.clone();

        self.callbacks.borrow_mut().push(Rc::new(move |item: &T| {
            let mapped = f(item);
            for callback in downstream_clone.borrow().iter() {
                callback(&mapped);
            }
        }));

        Stream {
            callbacks: downstream,
        }
    }

    pub fn filter<F>(&self, predicate: F) -> Stream<T>
    where
        T: 'static,
        F: Fn(&T) -> bool + 'static,
    {
        let downstream = Rc::new(RefCell::new(Vec::<Callback<T>>::new()));
        let downstream_clone = downstream.clone();

        self.callbacks.borrow_mut().push(Rc::new(move |item: &T| {
            if predicate(item) {
                for callback in downstream_clone.borrow().iter() {
                    callback(item);
                }
            }
        }));

        Stream {
            callbacks: downstream,
        }
    }

    /// Suppresses emissions until `window` elapses without a new arrival,
    /// then emits only the most recent element. Every arrival replaces the
    /// buffered element and restarts the countdown; the countdown itself is
    /// driven by the engine the debounced stream is registered with.
    pub fn debounce(&self, window: Duration) -> Debounced<T>
    where
        T: Clone + 'static,
    {
        let callbacks: Rc<RefCell<Vec<Callback<T>>>> = Rc::new(RefCell::new(Vec::new()));
        let stream = Stream {
            callbacks: callbacks.clone(),
        };
        let latest = Rc::new(RefCell::new(None::<T>));
        let deadline = Rc::new(RefCell::new(None::<Instant>));
        let rearm = Rc::new(RefCell::new(None::<RearmHook>));

        let latest_clone = latest.clone();
        let deadline_clone = deadline.clone();
        let rearm_clone = rearm.clone();

        self.callbacks.borrow_mut().push(Rc::new(move |item: &T| {
            *latest_clone.borrow_mut() = Some(item.clone());
            *deadline_clone.borrow_mut() = Some(Instant::now() + window);
            if let Some(hook) = rearm_clone.borrow().as_ref() {
                hook();
            }
        }));

        Debounced {
            inner: Rc::new(DebouncedInner {
                window,
                latest,
                deadline,
                rearm,
                callbacks,
                stream,
            }),
        }
    }

    pub fn sink<F>(&self, f: F)
    where
        F: Fn(&T) + 'static,
    {
        self.callbacks
            .borrow_mut()
            .push(Rc::new(move |item: &T| f(item)));
    }
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Stream {
            callbacks: self.callbacks.clone(),
        }
    }
}

/// A deadline-driven emitter. The engine polls `deadline` to find its next
/// wakeup, calls `flush` once the deadline passes, and installs a rearm hook
/// so arrivals that move the deadline wake the run loop.
pub trait IdleEmitter: 'static {
    fn deadline(&self) -> Option<Instant>;
    fn flush(&self);
    fn set_rearm_hook(&self, hook: Rc<dyn Fn()>);
}

pub struct Debounced<T> {
    inner: Rc<DebouncedInner<T>>,
}

struct DebouncedInner<T> {
    window: Duration,
    latest: Rc<RefCell<Option<T>>>,
    deadline: Rc<RefCell<Option<Instant>>>,
    rearm: Rc<RefCell<Option<RearmHook>>>,
    callbacks: Rc<RefCell<Vec<Callback<T>>>>,
    stream: Stream<T>,
}

impl<T> Debounced<T>
where
    T: Clone + 'static,
{
    pub fn stream(&self) -> Stream<T> {
        self.inner.stream.clone()
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    pub fn as_idle_emitter(&self) -> Rc<dyn IdleEmitter> {
        self.inner.clone() as Rc<dyn IdleEmitter>
    }
}

impl<T> Clone for Debounced<T>
where
    T: Clone + 'static,
{
    fn clone(&self) -> Self {
        Debounced {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Deref for Debounced<T>
where
    T: Clone + 'static,
{
    type Target = Stream<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner.stream
    }
}

impl<T> IdleEmitter for DebouncedInner<T>
where
    T: Clone + 'static,
{
    fn deadline(&self) -> Option<Instant> {
        *self.deadline.borrow()
    }

    fn flush(&self) {
        self.deadline.borrow_mut().take();
        let item = match self.latest.borrow_mut().take() {
            Some(item) => item,
            None => return,
        };

        let callbacks = self.callbacks.borrow();
        for callback in callbacks.iter() {
            callback(&item);
        }
    }

    fn set_rearm_hook(&self, hook: Rc<dyn Fn()>) {
        *self.rearm.borrow_mut() = Some(hook);
    }
}
