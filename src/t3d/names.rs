use std::collections::HashMap;

/// Hands out `<Class>_<N>` instance names, counting per class.
///
/// One allocator lives for exactly one export run.
#[derive(Debug, Default)]
pub struct NameAllocator {
    counters: HashMap<String, u32>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, class: &str) -> String {
        let counter = self.counters.entry(class.to_string()).or_insert(0);
        let name = format!("{}_{}", class, counter);
        *counter += 1;
        name
    }
}
