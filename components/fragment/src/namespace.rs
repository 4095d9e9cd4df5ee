const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// In-scope prefix bindings of the open elements.
pub(crate) struct NamespaceStack {
    bindings: Vec<(String, String)>,
    stack: Vec<usize>,
}

impl NamespaceStack {
    pub fn new() -> Self {
        Self {
            bindings: vec![("xml".to_string(), XML_NAMESPACE.to_string())],
            stack: vec![],
        }
    }

    pub fn build_scope(&mut self) -> ScopeBuilder<'_> {
        ScopeBuilder {
            stack: self,
            size: 0,
        }
    }

    pub fn pop_scope(&mut self) {
        if let Some(size) = self.stack.pop() {
            self.bindings.truncate(self.bindings.len() - size);
        }
    }

    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == prefix)
            .map(|(_, uri)| uri.as_str())
    }
}

pub(crate) struct ScopeBuilder<'a> {
    stack: &'a mut NamespaceStack,
    size: usize,
}

impl<'a> ScopeBuilder<'a> {
    pub fn add_prefix(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.stack.bindings.push((prefix.into(), uri.into()));
        self.size += 1;
    }

    pub fn finish(self) -> &'a mut NamespaceStack {
        self.stack.stack.push(self.size);
        self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_is_always_bound() {
        let stack = NamespaceStack::new();
        assert_eq!(Some(XML_NAMESPACE), stack.resolve("xml"));
        assert_eq!(None, stack.resolve("ns2"));
    }

    #[test]
    fn scopes_shadow_and_unwind() {
        let mut stack = NamespaceStack::new();
        let mut scope = stack.build_scope();
        scope.add_prefix("a", "urn:outer");
        let stack = scope.finish();

        let mut scope = stack.build_scope();
        scope.add_prefix("a", "urn:inner");
        scope.add_prefix("b", "urn:b");
        let stack = scope.finish();
        assert_eq!(Some("urn:inner"), stack.resolve("a"));
        assert_eq!(Some("urn:b"), stack.resolve("b"));

        stack.pop_scope();
        assert_eq!(Some("urn:outer"), stack.resolve("a"));
        assert_eq!(None, stack.resolve("b"));

        stack.pop_scope();
        stack.pop_scope();
        assert_eq!(None, stack.resolve("a"));
        assert_eq!(Some(XML_NAMESPACE), stack.resolve("xml"));
    }
}
