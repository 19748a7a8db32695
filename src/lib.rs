//! # Weld
//!
//! Declarative binding between markup attributes and host callbacks.
//!
//! ```html
//! <div data-wd-bind="card: { title: 'Hello', open: true }, width: 240">
//!     <h2 data-wd-target="heading"></h2>
//! </div>
//! ```
//!
//! A `Registry` maps binder names to callbacks. `Registry::apply` scans a tree
//! once and calls each registered binder with the bound element, the primary
//! value, the named additional values and the element's targets.
//!
//! ## Invariants
//!
//! 1. **No Evaluation**: binding expressions are decoded by a fixed grammar,
//!    never executed.
//! 2. **Read-only Scan**: scanning never mutates the tree; only binders may.
//! 3. **Recoverable Errors**: a malformed expression becomes an empty mapping
//!    plus a `Diagnostic`. Unregistered binder names are skipped silently.
//! 4. **Fixed Pass**: the bindings of a pass are captured before the first
//!    binder runs.
//! 5. **Nearest Scope**: a target belongs to its nearest enclosing bound
//!    element.

#[cfg(feature = "napi")]
mod bridge;

pub mod config;
pub mod dom;
pub mod error;
pub mod expression;
pub mod lexer;
pub mod marker;
pub mod registry;
pub mod scan;
pub mod value;

#[cfg(test)]
mod scan_tests;

#[cfg(feature = "napi")]
pub use bridge::{parse_binding_value_native, scan_bindings_native};

pub use config::ScanOptions;
pub use dom::Document;
pub use error::{Diagnostic, DomError, ExpressionError};
pub use expression::{parse, parse_expression_list, parse_value, parse_value_lenient};
pub use marker::BindingMarker;
pub use registry::{ApplyReport, BinderFn, Registry};
pub use scan::{scan, Binding, BindingRecord, ScanReport, ScanResult, Scanner, Targets};
pub use value::{Number, ParsedValue, ValueMap};
