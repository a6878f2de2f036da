//! Test helpers for the transport module.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use super::{ConnectionHandler, ConnectionStream};

pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
        });
        (count, handler)
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, _stream: ConnectionStream) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Panics on every other connection, counting the ones it survives.
pub(crate) struct PanickingHandler {
    seen: AtomicUsize,
    served: Arc<AtomicUsize>,
}

impl PanickingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let served = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            seen: AtomicUsize::new(0),
            served: Arc::clone(&served),
        });
        (served, handler)
    }
}

impl ConnectionHandler for PanickingHandler {
    fn handle(&self, _stream: ConnectionStream) {
        if self.seen.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            panic!("injected handler fault");
        }
        self.served.fetch_add(1, Ordering::SeqCst);
    }
}
