//! Binder Registry
//!
//! Maps binder names to callbacks and runs the apply pass: one scan, then one
//! call per binding whose name is registered.
//!
//! Every binder has the same signature,
//! `(element, primary value, additional values, targets)`, with `None` and
//! empty maps standing in for data the marker did not supply.
//!
//! `register` needs `&mut self` while `apply` only needs `&self`, so a binder
//! cannot re-register binders in the middle of a pass.

use markup5ever_rcdom::Handle;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::config::ScanOptions;
use crate::dom::Document;
use crate::error::Diagnostic;
use crate::scan::{Binding, Scanner, Targets};
use crate::value::{ParsedValue, ValueMap};

/// A binder callback.
pub type BinderFn = dyn Fn(&Handle, Option<&ParsedValue>, &ValueMap, &Targets);

/// Outcome of one apply pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    /// Bound elements found by the scan.
    pub scanned: usize,
    /// Binder calls made.
    pub invoked: usize,
    /// Bindings with no registered binder.
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Default)]
pub struct Registry {
    binders: HashMap<String, Box<BinderFn>>,
    scanner: Scanner,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ScanOptions) -> Self {
        Self {
            binders: HashMap::new(),
            scanner: Scanner::new(options),
        }
    }

    /// Register `binder` under `name`, replacing any earlier binder.
    pub fn register<F>(&mut self, name: impl Into<String>, binder: F)
    where
        F: Fn(&Handle, Option<&ParsedValue>, &ValueMap, &Targets) + 'static,
    {
        self.binders.insert(name.into(), Box::new(binder));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.binders.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.binders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.binders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Call the binder registered for `binding`. Returns false when none is.
    pub fn invoke(&self, binding: &Binding) -> bool {
        match self.binders.get(&binding.name) {
            Some(binder) => {
                tracing::trace!(binder = %binding.name, "invoking binder");
                binder(
                    &binding.element,
                    binding.value.as_ref(),
                    &binding.values,
                    &binding.targets,
                );
                true
            }
            None => false,
        }
    }

    /// Scan the descendants of `root` and invoke every matching binder.
    ///
    /// The binding list is fixed before the first call, so tree mutations made
    /// by one binder do not change which bindings this pass visits. Calling
    /// `apply` again re-scans and re-invokes; nothing is remembered between
    /// passes.
    pub fn apply(&self, root: &Handle) -> ApplyReport {
        // Unregistered markers are skipped silently, so their expressions are
        // never parsed
        let scan = self.scanner.scan_matching(root, |name| self.contains(name));
        let mut report = ApplyReport {
            scanned: scan.bindings.len(),
            diagnostics: scan.diagnostics,
            ..ApplyReport::default()
        };

        for binding in &scan.bindings {
            if self.invoke(binding) {
                report.invoked += 1;
            } else {
                report.skipped += 1;
            }
        }

        tracing::debug!(
            scanned = report.scanned,
            invoked = report.invoked,
            skipped = report.skipped,
            "apply pass complete"
        );
        report
    }

    /// Apply over the document's default root (`<body>` when present).
    pub fn apply_document(&self, document: &Document) -> ApplyReport {
        self.apply(&document.root())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("binders", &self.names())
            .field("scanner", &self.scanner)
            .finish()
    }
}
