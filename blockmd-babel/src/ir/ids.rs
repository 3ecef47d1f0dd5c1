//! Synthetic block ids for documents built from Markdown.

/// Hands out `<prefix>_1`, `<prefix>_2`, ... for one conversion call.
///
/// The generator is passed explicitly to every function that mints ids, so
/// two conversions never share a counter.
#[derive(Debug, Clone)]
pub struct IdGen {
    prefix: String,
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        IdGen::with_prefix("local")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        IdGen {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl Default for IdGen {
    fn default() -> Self {
        IdGen::new()
    }
}
