use std::collections::{HashMap, HashSet};

/// Hands out parameter names for one query.
///
/// Every name issued is unique within the allocator. Indexed names carry one
/// counter per filter kind, so two any-of filters (`@roleIds0`,
/// `@applicationIds0`) never collide with each other.
#[derive(Debug, Default, Clone)]
pub struct ParameterAllocator {
    counters: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl ParameterAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `@base`, or the next free `@baseN` when `@base` is already taken
    pub fn scalar(&mut self, base: &str) -> String {
        let name = format!("@{base}");
        if self.issued.insert(name.clone()) {
            return name;
        }
        self.indexed(base)
    }

    /// Next `@kindN` for this kind, starting at `@kind0`
    pub fn indexed(&mut self, kind: &str) -> String {
        loop {
            let counter = self.counters.entry(kind.to_string()).or_insert(0);
            let name = format!("@{kind}{counter}");
            *counter += 1;
            if self.issued.insert(name.clone()) {
                return name;
            }
        }
    }

    /// Mark a name as taken without issuing it (the paginator's own names)
    pub fn reserve(&mut self, name: &str) {
        self.issued.insert(name.to_string());
    }

    /// Names issued or reserved so far
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}
