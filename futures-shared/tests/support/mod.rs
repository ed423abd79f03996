#![allow(dead_code, unreachable_pub)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use futures_shared::UniqueFuture;

/// A latch that test futures block on until it is opened.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    cond: Condvar,
}

impl Gate {
    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cond.notify_all();
    }

    pub fn is_open(&self) -> bool {
        *self.open.lock().unwrap()
    }

    pub fn wait(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cond.wait(open).unwrap();
        }
    }
}

/// A unique future that resolves to `value` once its gate opens and counts
/// how many times it has been consumed.
pub struct Counted<T> {
    value: T,
    gate: Arc<Gate>,
    gets: Arc<AtomicUsize>,
}

pub struct Handles {
    pub gate: Arc<Gate>,
    pub gets: Arc<AtomicUsize>,
}

impl Handles {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

pub fn counted<T>(value: T) -> (Handles, Counted<T>) {
    let gate = Arc::new(Gate::default());
    let gets = Arc::new(AtomicUsize::new(0));
    let future = Counted {
        value,
        gate: gate.clone(),
        gets: gets.clone(),
    };
    (Handles { gate, gets }, future)
}

impl<T> UniqueFuture for Counted<T> {
    type Output = T;

    fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    fn wait(&self) {
        self.gate.wait()
    }

    fn get(self) -> T {
        self.gate.wait();
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.value
    }
}

/// A future that reports itself as invalid and must never be touched.
pub struct Invalid;

impl UniqueFuture for Invalid {
    type Output = u32;

    fn is_valid(&self) -> bool {
        false
    }

    fn is_ready(&self) -> bool {
        panic!("invalid future queried")
    }

    fn wait(&self) {
        panic!("invalid future waited on")
    }

    fn get(self) -> u32 {
        panic!("invalid future consumed")
    }
}

/// A future whose computation panics when its result is taken.
pub struct Panics;

impl UniqueFuture for Panics {
    type Output = u32;

    fn is_ready(&self) -> bool {
        true
    }

    fn wait(&self) {}

    fn get(self) -> u32 {
        panic!("computation failed")
    }
}

/// A future whose `wait` returns at once but whose consuming `get` blocks
/// until its gate opens. `entered` opens when `get` starts.
pub struct SlowGet<T> {
    value: T,
    entered: Arc<Gate>,
    gate: Arc<Gate>,
    gets: Arc<AtomicUsize>,
}

pub fn slow_get<T>(value: T) -> (Arc<Gate>, Handles, SlowGet<T>) {
    let entered = Arc::new(Gate::default());
    let gate = Arc::new(Gate::default());
    let gets = Arc::new(AtomicUsize::new(0));
    let future = SlowGet {
        value,
        entered: entered.clone(),
        gate: gate.clone(),
        gets: gets.clone(),
    };
    (entered, Handles { gate, gets }, future)
}

impl<T> UniqueFuture for SlowGet<T> {
    type Output = T;

    fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    fn wait(&self) {}

    fn get(self) -> T {
        self.entered.open();
        self.gate.wait();
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.value
    }
}

/// A future whose `wait` panics, counting how often it was called.
pub struct PanicsInWait {
    pub waits: Arc<AtomicUsize>,
}

impl UniqueFuture for PanicsInWait {
    type Output = u32;

    fn is_ready(&self) -> bool {
        false
    }

    fn wait(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
        panic!("wait failed")
    }

    fn get(self) -> u32 {
        panic!("consumed after a failed wait")
    }
}
