//! Binding marker splitting.
//!
//! A marker is `name` or `name: expr-list`. The name runs up to the first
//! colon; binder names never contain one, so the first colon is always the
//! top-level separator.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingMarker<'a> {
    /// Binder name, trimmed. May be empty for malformed markup.
    pub name: &'a str,
    /// Expression list after the colon, trimmed. `None` when absent or blank.
    pub expression: Option<&'a str>,
}

impl<'a> BindingMarker<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(':') {
            Some((name, rest)) => {
                let rest = rest.trim();
                BindingMarker {
                    name: name.trim(),
                    expression: if rest.is_empty() { None } else { Some(rest) },
                }
            }
            None => BindingMarker {
                name: raw.trim(),
                expression: None,
            },
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}
