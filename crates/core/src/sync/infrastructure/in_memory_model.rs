use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};

use crate::sync::domain::reactive_model::{change_event, ChangeHandler, ReactiveModel};

type SharedHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ModelState {
    committed: Map<String, Value>,
    staged: Map<String, Value>,
    subscribers: HashMap<String, Vec<SharedHandler>>,
    unavailable: bool,
    flush_count: usize,
}

/// Process-local reactive model.
///
/// Clones share the same state, so one clone can be boxed into the pipeline
/// while another plays the host side (reading published values, pushing
/// configuration changes). Change handlers run after the internal lock is
/// released and may read the model.
#[derive(Clone, Default)]
pub struct InMemoryModel {
    state: Arc<Mutex<ModelState>>,
}

impl InMemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model whose committed state starts with `values`.
    pub fn with_values(values: impl IntoIterator<Item = (String, Value)>) -> Self {
        let model = Self::new();
        model.lock().committed.extend(values);
        model
    }

    /// Last flushed value of `key`; staged updates are not visible here.
    pub fn committed(&self, key: &str) -> Option<Value> {
        self.lock().committed.get(key).cloned()
    }

    pub fn staged(&self) -> Map<String, Value> {
        self.lock().staged.clone()
    }

    pub fn discard_staged(&self) {
        self.lock().staged.clear();
    }

    /// While set, every flush fails and drops its batch.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn is_available(&self) -> bool {
        !self.lock().unavailable
    }

    /// Number of successful flushes.
    pub fn flush_count(&self) -> usize {
        self.lock().flush_count
    }

    fn lock(&self) -> MutexGuard<'_, ModelState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReactiveModel for InMemoryModel {
    fn get(&self, key: &str) -> Option<Value> {
        let state = self.lock();
        state
            .staged
            .get(key)
            .or_else(|| state.committed.get(key))
            .cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.lock().staged.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let handlers = {
            let mut state = self.lock();
            if state.unavailable {
                state.staged.clear();
                return Err("reactive model is unavailable".into());
            }

            let batch = std::mem::take(&mut state.staged);
            let mut handlers: Vec<SharedHandler> = Vec::new();
            for (key, value) in batch {
                let changed = state.committed.get(&key) != Some(&value);
                if changed {
                    if let Some(subscribed) = state.subscribers.get(&change_event(&key)) {
                        handlers.extend(subscribed.iter().cloned());
                    }
                }
                state.committed.insert(key, value);
            }
            state.flush_count += 1;
            handlers
        };

        for handler in handlers {
            handler();
        }
        Ok(())
    }

    fn subscribe(&mut self, event: &str, handler: ChangeHandler) {
        self.lock()
            .subscribers
            .entry(event.to_string())
            .or_default()
            .push(Arc::from(handler));
    }
}
