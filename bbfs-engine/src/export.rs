pub const EXPORT_SEPARATOR: &str = "*";

pub fn join_export<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(EXPORT_SEPARATOR)
}

/// Walks a result list in fixed-size chunks, the way bets are pasted
/// into a betting form a batch at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportCursor {
    position: usize,
}

impl ExportCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: usize) -> Self {
        Self { position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self, items: &[String]) -> usize {
        items.len().saturating_sub(self.position)
    }

    pub fn next_chunk(&mut self, items: &[String], size: usize) -> Option<String> {
        if size == 0 || self.position >= items.len() {
            return None;
        }
        let end = (self.position + size).min(items.len());
        let chunk = join_export(&items[self.position..end]);
        self.position = end;
        Some(chunk)
    }

    pub fn all(&mut self, items: &[String]) -> Option<String> {
        if items.is_empty() {
            return None;
        }
        self.position = items.len();
        Some(join_export(items))
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}
