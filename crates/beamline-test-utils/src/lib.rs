//! Test utilities and mock types for beamline development.
//!
//! Provides mock implementations of the collaborator traits
//! ([`GridResizer`], [`ElementResolver`]) and, in [`fixtures`], mock
//! elements and ready-made wavefronts for constructing test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use beamline_core::{
    ElementResolver, GridResizer, PropagationInstruction, ResizeError, ResolvedElement, Wavefront,
};

/// One recorded [`GridResizer::resize`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeCall {
    /// Longitudinal position of the wavefront when the call was made.
    pub position: f64,
    /// The instruction passed in.
    pub instruction: PropagationInstruction,
}

/// Mock implementation of [`GridResizer`].
///
/// Records every call and leaves the wavefront untouched. Configure a
/// scripted failure with [`fail_on_call`](MockResizer::fail_on_call).
#[derive(Debug, Default)]
pub struct MockResizer {
    calls: Mutex<Vec<ResizeCall>>,
    fail_at: Option<(usize, i32)>,
}

impl MockResizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail call number `index` (0-based) with `status`; later calls
    /// succeed again.
    pub fn fail_on_call(mut self, index: usize, status: i32) -> Self {
        self.fail_at = Some((index, status));
        self
    }

    /// Number of `resize()` calls so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    /// Snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<ResizeCall> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ResizeCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl GridResizer for MockResizer {
    fn resize(
        &self,
        wfr: &mut Wavefront,
        instruction: &PropagationInstruction,
    ) -> Result<(), ResizeError> {
        let mut calls = self.lock();
        let index = calls.len();
        calls.push(ResizeCall {
            position: wfr.position,
            instruction: *instruction,
        });
        match self.fail_at {
            Some((at, status)) if at == index => Err(ResizeError::new(
                status,
                format!("scripted failure on resize call {index}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Mock implementation of [`ElementResolver`].
///
/// Backed by a `HashMap<String, Result<ResolvedElement, i32>>`. Names
/// that were never registered resolve to `missing_code`.
#[derive(Debug)]
pub struct MockResolver {
    entries: HashMap<String, Result<ResolvedElement, i32>>,
    missing_code: i32,
    lookups: AtomicUsize,
}

impl MockResolver {
    /// Unregistered names fail with `-100`.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            missing_code: -100,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Register a description made of `tokens`.
    pub fn with<I, S>(mut self, name: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, ResolvedElement::from_tokens(tokens));
        self
    }

    /// Register a complete description (tokens plus payload).
    pub fn insert(&mut self, name: &str, element: ResolvedElement) {
        self.entries.insert(name.to_string(), Ok(element));
    }

    /// Make `name` fail with `code`.
    pub fn with_failure(mut self, name: &str, code: i32) -> Self {
        self.entries.insert(name.to_string(), Err(code));
        self
    }

    /// Code returned for unregistered names.
    pub fn missing_code(&self) -> i32 {
        self.missing_code
    }

    /// Number of `resolve()` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementResolver for MockResolver {
    fn resolve(&self, name: &str) -> Result<ResolvedElement, i32> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        match self.entries.get(name) {
            Some(entry) => entry.clone(),
            None => Err(self.missing_code),
        }
    }
}
