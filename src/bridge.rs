//! N-API exports for Node hosts.
//!
//! Only the pure parts cross the bridge: expression parsing and a scan report
//! over an HTML string. Binder callbacks stay on the JS side.

use napi_derive::napi;

use crate::dom::Document;
use crate::expression::parse;
use crate::scan::{scan, ScanReport};

#[napi]
pub fn parse_binding_value_native(raw: Option<String>) -> serde_json::Value {
    parse(raw.as_deref())
        .map(serde_json::Value::from)
        .unwrap_or(serde_json::Value::Null)
}

#[napi]
pub fn scan_bindings_native(html: String) -> napi::Result<serde_json::Value> {
    let document = Document::parse(&html).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let result = scan(&document.root());
    serde_json::to_value(ScanReport::from(&result))
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}
