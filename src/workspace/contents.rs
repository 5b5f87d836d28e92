use std::collections::HashMap;

/// Text shown for files that have no sample content.
pub const PLACEHOLDER_CONTENT: &str = "// File not found";

/// Built-in sample content, keyed by project path.
fn sample_content(path: &str) -> Option<&'static str> {
    match path {
        "src/components/Button.tsx" => Some(include_str!("../samples/button.tsx")),
        "src/components/Card.tsx" => Some(include_str!("../samples/card.tsx")),
        "src/lib/utils.ts" => Some(include_str!("../samples/utils.ts")),
        "src/app/page.tsx" => Some(include_str!("../samples/page.tsx")),
        _ => None,
    }
}

/// In-memory path → text cache. Entries are never evicted.
#[derive(Debug, Default)]
pub struct FileContents {
    entries: HashMap<String, String>,
}

impl FileContents {
    /// Cache seeded with every available sample file.
    pub fn with_samples() -> Self {
        let mut contents = Self::default();
        for path in [
            "src/components/Button.tsx",
            "src/components/Card.tsx",
            "src/lib/utils.ts",
            "src/app/page.tsx",
        ] {
            if let Some(text) = sample_content(path) {
                contents.entries.insert(path.to_string(), text.to_string());
            }
        }
        contents
    }

    /// Current text of `path`, falling back to sample text, then the placeholder.
    pub fn get_content(&self, path: &str) -> String {
        self.entries
            .get(path)
            .cloned()
            .or_else(|| sample_content(path).map(str::to_string))
            .unwrap_or_else(|| PLACEHOLDER_CONTENT.to_string())
    }

    /// Overwrite the text of `path`.
    pub fn set_content(&mut self, path: &str, text: &str) {
        self.entries.insert(path.to_string(), text.to_string());
    }

    /// Record an entry for `path` if none exists yet.
    pub fn ensure_entry(&mut self, path: &str) {
        if !self.entries.contains_key(path) {
            let text = self.get_content(path);
            self.entries.insert(path.to_string(), text);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
