//! Ready-made recorders.
//!
//! Hosts with a real logging pipeline implement [`crate::Recorder`] themselves; these
//! two cover tests, demos and simple batch jobs.

use parking_lot::Mutex;
use std::fmt::{self, Display, Write as _};

use crate::Recorder;

/// Appends one text line per recorded decision:
///
/// ```text
/// {action} {unique_key} {probability:.5} | {context}
/// ```
///
/// Rankings are written comma-joined (`3,1,2`).
#[derive(Debug, Default)]
pub struct StringRecorder {
    buf: Mutex<String>,
}

impl StringRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn contents(&self) -> String {
        self.buf.lock().clone()
    }

    /// Take everything recorded so far, leaving the recorder empty.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buf.lock())
    }

    fn push_line(
        &self,
        action: impl Display,
        unique_key: &str,
        probability: f32,
        context: impl Display,
    ) {
        let mut buf = self.buf.lock();
        // Writing into a String cannot fail.
        let _ = writeln!(buf, "{action} {unique_key} {probability:.5} | {context}");
    }
}

struct Joined<'a>(&'a [u32]);

impl Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{a}")?;
        }
        Ok(())
    }
}

impl<C: Display + ?Sized> Recorder<C, u32> for StringRecorder {
    fn record(&self, context: &C, action: &u32, probability: f32, unique_key: &str) {
        self.push_line(action, unique_key, probability, context);
    }
}

impl<C: Display + ?Sized> Recorder<C, Vec<u32>> for StringRecorder {
    fn record(&self, context: &C, action: &Vec<u32>, probability: f32, unique_key: &str) {
        self.push_line(Joined(action), unique_key, probability, context);
    }
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction<C, A> {
    pub context: C,
    pub action: A,
    pub probability: f32,
    pub unique_key: String,
}

/// Keeps recorded decisions in memory, cloning context and action.
pub struct MemoryRecorder<C, A> {
    entries: Mutex<Vec<Interaction<C, A>>>,
}

impl<C, A> MemoryRecorder<C, A> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Interaction<C, A>> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl<C: Clone, A: Clone> MemoryRecorder<C, A> {
    pub fn interactions(&self) -> Vec<Interaction<C, A>> {
        self.entries.lock().clone()
    }
}

impl<C, A> Default for MemoryRecorder<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A> fmt::Debug for MemoryRecorder<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRecorder")
            .field("len", &self.len())
            .finish()
    }
}

impl<C: Clone, A: Clone> Recorder<C, A> for MemoryRecorder<C, A> {
    fn record(&self, context: &C, action: &A, probability: f32, unique_key: &str) {
        self.entries.lock().push(Interaction {
            context: context.clone(),
            action: action.clone(),
            probability,
            unique_key: unique_key.to_owned(),
        });
    }
}
