//! Namespace Resolution
//!
//! Stack-based namespace resolver: one frame of prefix bindings per open
//! element, searched from the innermost frame outwards.

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Bindings declared by one element; the empty prefix is the default namespace
pub type NamespaceFrame = Vec<(String, String)>;

/// Stack-based namespace resolver
#[derive(Debug, Default)]
pub struct NamespaceResolver {
    frames: Vec<NamespaceFrame>,
}

impl NamespaceResolver {
    pub fn new() -> Self {
        NamespaceResolver {
            frames: Vec::with_capacity(8),
        }
    }

    /// Enter an element scope with the element's own declarations
    pub fn push_scope(&mut self, bindings: NamespaceFrame) {
        self.frames.push(bindings);
    }

    /// Leave an element scope, dropping the bindings it declared
    pub fn pop_scope(&mut self) {
        self.frames.pop();
    }

    /// Resolve a prefix to a namespace URI
    ///
    /// The `xml` prefix is always bound and can not be overridden.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(ns::XML);
        }
        self.frames.iter().rev().find_map(|frame| {
            frame
                .iter()
                .rev()
                .find(|(bound, _)| bound == prefix)
                .map(|(_, uri)| uri.as_str())
        })
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drop every scope
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
