/// Content-type tag used for highlighting and the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    TypeScript,
    JavaScript,
    Json,
    Css,
    Html,
    #[default]
    PlainText,
}

impl Language {
    /// Resolve the tag for a path from its extension. Unknown suffixes are plain text.
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => return Language::PlainText,
        };
        match ext.as_str() {
            "ts" | "tsx" => Language::TypeScript,
            "js" | "jsx" => Language::JavaScript,
            "json" => Language::Json,
            "css" => Language::Css,
            "html" => Language::Html,
            _ => Language::PlainText,
        }
    }

    /// Name shown in the status bar.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
            Language::Json => "JSON",
            Language::Css => "CSS",
            Language::Html => "HTML",
            Language::PlainText => "Plain Text",
        }
    }

    /// Syntect syntax name used to highlight this language.
    pub fn syntax_name(&self) -> &'static str {
        match self {
            // The default syntect set ships no TypeScript grammar.
            Language::TypeScript | Language::JavaScript => "JavaScript",
            Language::Json => "JSON",
            Language::Css => "CSS",
            Language::Html => "HTML",
            Language::PlainText => "Plain Text",
        }
    }
}

/// Ordered open tabs plus the active file.
#[derive(Debug, Default)]
pub struct Tabs {
    open: Vec<String>,
    active: Option<String>,
}

impl Tabs {
    pub fn paths(&self) -> &[String] {
        &self.open
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Append `path` if it is not open yet and make it active.
    pub fn open(&mut self, path: &str) {
        if !self.is_open(path) {
            self.open.push(path.to_string());
        }
        self.active = Some(path.to_string());
    }

    /// Remove `path`. Closing the active tab activates the first remaining one.
    pub fn close(&mut self, path: &str) {
        let Some(idx) = self.open.iter().position(|p| p == path) else {
            return;
        };
        self.open.remove(idx);
        if self.active.as_deref() == Some(path) {
            self.active = self.open.first().cloned();
        }
    }

    /// Make an already open tab active. Returns false when `path` is not open.
    pub fn activate(&mut self, path: &str) -> bool {
        if !self.is_open(path) {
            return false;
        }
        self.active = Some(path.to_string());
        true
    }

    /// Activate the tab `offset` positions away from the active one, wrapping around.
    pub fn cycle(&mut self, offset: isize) {
        if self.open.is_empty() {
            return;
        }
        let len = self.open.len() as isize;
        let current = self
            .active
            .as_deref()
            .and_then(|a| self.open.iter().position(|p| p == a))
            .unwrap_or(0) as isize;
        let next = (current + offset).rem_euclid(len) as usize;
        self.active = Some(self.open[next].clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_table() {
        assert_eq!(Language::from_path("src/lib/utils.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("src/app/page.tsx"), Language::TypeScript);
        assert_eq!(Language::from_path("a/b.JSX"), Language::JavaScript);
        assert_eq!(Language::from_path("package.json"), Language::Json);
        assert_eq!(Language::from_path("x.css"), Language::Css);
        assert_eq!(Language::from_path("index.html"), Language::Html);
        assert_eq!(Language::from_path("public/logo.svg"), Language::PlainText);
        assert_eq!(Language::from_path("Makefile"), Language::PlainText);
        assert_eq!(Language::from_path("dir.d/README"), Language::PlainText);
    }

    #[test]
    fn open_appends_once_and_activates() {
        let mut tabs = Tabs::default();
        tabs.open("a.ts");
        tabs.open("b.ts");
        tabs.open("a.ts");
        assert_eq!(tabs.paths(), ["a.ts", "b.ts"]);
        assert_eq!(tabs.active(), Some("a.ts"));
    }

    #[test]
    fn close_active_falls_back_to_first() {
        let mut tabs = Tabs::default();
        tabs.open("a.ts");
        tabs.open("b.ts");
        tabs.open("c.ts");
        tabs.close("c.ts");
        assert_eq!(tabs.active(), Some("a.ts"));
        tabs.close("a.ts");
        assert_eq!(tabs.active(), Some("b.ts"));
        tabs.close("b.ts");
        assert_eq!(tabs.active(), None);
        assert!(tabs.is_empty());
    }

    #[test]
    fn close_inactive_keeps_active() {
        let mut tabs = Tabs::default();
        tabs.open("a.ts");
        tabs.open("b.ts");
        tabs.close("a.ts");
        assert_eq!(tabs.active(), Some("b.ts"));
    }

    #[test]
    fn close_unknown_is_noop() {
        let mut tabs = Tabs::default();
        tabs.open("a.ts");
        tabs.close("zzz.ts");
        assert_eq!(tabs.paths(), ["a.ts"]);
        assert_eq!(tabs.active(), Some("a.ts"));
    }

    #[test]
    fn activate_requires_open_tab() {
        let mut tabs = Tabs::default();
        tabs.open("a.ts");
        tabs.open("b.ts");
        assert!(tabs.activate("a.ts"));
        assert_eq!(tabs.active(), Some("a.ts"));
        assert!(!tabs.activate("c.ts"));
        assert_eq!(tabs.active(), Some("a.ts"));
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let mut tabs = Tabs::default();
        tabs.open("a.ts");
        tabs.open("b.ts");
        tabs.open("c.ts");
        tabs.cycle(1);
        assert_eq!(tabs.active(), Some("a.ts"));
        tabs.cycle(-1);
        assert_eq!(tabs.active(), Some("c.ts"));
    }
}
