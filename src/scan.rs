//! Binding Scanner
//!
//! Walks an element tree and turns every element carrying a binding marker
//! into a `Binding`. The scan is eager and read-only: the full list is built
//! before any binder runs, and nothing in the tree is touched.
//!
//! ## Target Scoping
//!
//! Target markers belong to the nearest enclosing bound element. The target
//! walk does not descend into a nested bound element, although that element's
//! own target attribute still belongs to the outer binding.

use markup5ever_rcdom::Handle;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::config::ScanOptions;
use crate::dom::{self, Walk};
use crate::error::{Diagnostic, ExpressionError};
use crate::expression::{parse_expression_list, parse_value};
use crate::marker::BindingMarker;
use crate::value::{ParsedValue, ValueMap};

/// Named target elements of a binding.
pub type Targets = HashMap<String, Handle>;

// ═══════════════════════════════════════════════════════════════════════════════
// BINDING
// ═══════════════════════════════════════════════════════════════════════════════

/// One bound element, resolved for a single pass.
#[derive(Clone)]
pub struct Binding {
    pub element: Handle,
    /// Binder name from the marker.
    pub name: String,
    /// Primary value, absent when the marker carries no expression.
    pub value: Option<ParsedValue>,
    /// Named values after the primary one.
    pub values: ValueMap,
    pub targets: Targets,
}

impl Binding {
    pub fn target(&self, name: &str) -> Option<&Handle> {
        self.targets.get(name)
    }

    /// Target names, sorted.
    pub fn target_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.targets.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("element", &dom::tag_name(&self.element))
            .field("name", &self.name)
            .field("value", &self.value)
            .field("values", &self.values)
            .field("targets", &self.target_names())
            .finish()
    }
}

/// Serializable view of a binding, with elements reduced to tag names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingRecord {
    pub name: String,
    pub tag: Option<String>,
    pub value: Option<ParsedValue>,
    pub values: ValueMap,
    pub targets: Vec<String>,
}

impl From<&Binding> for BindingRecord {
    fn from(binding: &Binding) -> Self {
        BindingRecord {
            name: binding.name.clone(),
            tag: dom::tag_name(&binding.element),
            value: binding.value.clone(),
            values: binding.values.clone(),
            targets: binding.target_names(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCAN RESULT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct ScanResult {
    pub bindings: Vec<Binding>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanResult {
    pub fn records(&self) -> Vec<BindingRecord> {
        self.bindings.iter().map(BindingRecord::from).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub bindings: Vec<BindingRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl From<&ScanResult> for ScanReport {
    fn from(result: &ScanResult) -> Self {
        ScanReport {
            bindings: result.records(),
            diagnostics: result.diagnostics.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan the descendants of `root` (not `root` itself) in document order.
    pub fn scan(&self, root: &Handle) -> ScanResult {
        self.scan_matching(root, |_| true)
    }

    /// Like `scan`, but only parses the expressions of markers whose name
    /// passes `wanted`. Other markers are still listed, with no values, and
    /// never produce diagnostics.
    pub fn scan_matching<P>(&self, root: &Handle, wanted: P) -> ScanResult
    where
        P: Fn(&str) -> bool,
    {
        let mut result = ScanResult::default();

        for element in dom::descendants(root) {
            let (attribute, raw) = match self.marker_attribute(&element) {
                Some(found) => found,
                None => continue,
            };
            let marker = BindingMarker::parse(&raw);

            let (value, values) = if wanted(marker.name) {
                self.resolve_values(&element, &marker, &attribute, &mut result.diagnostics)
            } else {
                (None, ValueMap::new())
            };
            let targets = self.collect_targets(&element);

            result.bindings.push(Binding {
                element,
                name: marker.name.to_string(),
                value,
                values,
                targets,
            });
        }

        tracing::debug!(
            bindings = result.bindings.len(),
            diagnostics = result.diagnostics.len(),
            "binding scan complete"
        );
        result
    }

    /// The marker attribute and its raw text, when the element is bound to a
    /// non-empty binder name.
    fn marker_attribute(&self, element: &Handle) -> Option<(String, String)> {
        dom::first_attribute(element, &self.options.bind_names())
            .filter(|(_, raw)| BindingMarker::parse(raw).has_name())
    }

    fn resolve_values(
        &self,
        element: &Handle,
        marker: &BindingMarker<'_>,
        attribute: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (Option<ParsedValue>, ValueMap) {
        if let Some(expression) = marker.expression {
            return match parse_expression_list(expression) {
                Ok(parsed) => parsed,
                Err(e) => {
                    report(diagnostics, marker.name, attribute, expression, &e);
                    (Some(ParsedValue::empty_mapping()), ValueMap::new())
                }
            };
        }

        let (value_attribute, raw) =
            match dom::first_attribute(element, &self.options.value_names()) {
                Some(found) => found,
                None => return (None, ValueMap::new()),
            };

        match parse_value(Some(&raw)) {
            Ok(value) => (value, ValueMap::new()),
            Err(e) => {
                report(diagnostics, marker.name, &value_attribute, &raw, &e);
                (Some(ParsedValue::empty_mapping()), ValueMap::new())
            }
        }
    }

    fn collect_targets(&self, element: &Handle) -> Targets {
        let target_names = self.options.target_names();
        let mut targets = Targets::new();

        dom::walk_descendants(element, &mut |candidate| {
            if let Some((_, name)) = dom::first_attribute(candidate, &target_names) {
                targets.insert(name, candidate.clone());
            }
            if self.marker_attribute(candidate).is_some() {
                Walk::SkipChildren
            } else {
                Walk::Continue
            }
        });

        targets
    }
}

fn report(
    diagnostics: &mut Vec<Diagnostic>,
    binder: &str,
    attribute: &str,
    source: &str,
    error: &ExpressionError,
) {
    tracing::warn!(binder, attribute, source, error = %error, "Invalid binding data");
    diagnostics.push(Diagnostic::malformed_expression(
        Some(binder),
        attribute,
        source,
        error,
    ));
}

/// Scan with the default attribute names.
pub fn scan(root: &Handle) -> ScanResult {
    Scanner::default().scan(root)
}
