use std::collections::HashMap;

/// Symbol bindings learned from assignment results. Sent verbatim with every
/// recognition request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableStore {
    bindings: HashMap<String, String>,
}

impl VariableStore {
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.bindings.get(symbol).map(String::as_str)
    }

    pub fn set(&mut self, symbol: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(symbol.into(), value.into());
    }

    pub fn reset(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> &HashMap<String, String> {
        &self.bindings
    }
}
