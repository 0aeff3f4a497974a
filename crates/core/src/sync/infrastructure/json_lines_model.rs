use std::io::Write;

use serde_json::{Map, Value};

use crate::sync::domain::reactive_model::{ChangeHandler, ReactiveModel};

use super::in_memory_model::InMemoryModel;

/// Reactive model that mirrors every flushed batch to a writer, one JSON
/// object per line.
///
/// A line is only written for a batch the inner model will accept, and it
/// is written before the batch commits; if either check or write fails the
/// batch is dropped and the flush reports the error.
pub struct JsonLinesModel<W: Write + Send> {
    inner: InMemoryModel,
    writer: W,
    lines: usize,
}

impl<W: Write + Send> JsonLinesModel<W> {
    pub fn new(inner: InMemoryModel, writer: W) -> Self {
        Self {
            inner,
            writer,
            lines: 0,
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_batch(&mut self, batch: Map<String, Value>) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, &Value::Object(batch))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write + Send> ReactiveModel for JsonLinesModel<W> {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.inner.set(key, value);
    }

    fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.inner.is_available() {
            return self.inner.flush();
        }
        let batch = self.inner.staged();
        if !batch.is_empty() {
            if let Err(e) = self.write_batch(batch) {
                self.inner.discard_staged();
                return Err(e.into());
            }
            self.lines += 1;
        }
        self.inner.flush()
    }

    fn subscribe(&mut self, event: &str, handler: ChangeHandler) {
        self.inner.subscribe(event, handler);
    }
}
