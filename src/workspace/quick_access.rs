/// Number of chord-addressable slots.
pub const SLOT_COUNT: usize = 4;

/// Chord labels shown next to each slot.
pub const SLOT_CHORDS: [&str; SLOT_COUNT] = ["Ctrl+H", "Ctrl+J", "Ctrl+K", "Ctrl+L"];

/// Fixed-size, editable list of pinned file paths.
///
/// The quick-jump chords and the settings panel both read and write this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAccess {
    slots: [String; SLOT_COUNT],
}

impl Default for QuickAccess {
    fn default() -> Self {
        Self {
            slots: [
                "src/components/Button.tsx".to_string(),
                "src/components/Card.tsx".to_string(),
                "src/lib/utils.ts".to_string(),
                "src/app/page.tsx".to_string(),
            ],
        }
    }
}

impl QuickAccess {
    /// Build from configured paths; missing entries keep their defaults, extras are dropped.
    pub fn from_paths(paths: &[String]) -> Self {
        let mut quick = Self::default();
        for (slot, path) in quick.slots.iter_mut().zip(paths) {
            *slot = path.clone();
        }
        quick
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    /// Replace a slot. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, path: &str) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = path.trim().to_string();
        }
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Slot index holding `path`, if any.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.slots.iter().position(|p| p == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_slots() {
        let quick = QuickAccess::default();
        assert_eq!(quick.get(0), Some("src/components/Button.tsx"));
        assert_eq!(quick.get(3), Some("src/app/page.tsx"));
        assert_eq!(quick.get(4), None);
    }

    #[test]
    fn set_trims_and_ignores_out_of_range() {
        let mut quick = QuickAccess::default();
        quick.set(1, "  package.json ");
        quick.set(9, "nope");
        assert_eq!(quick.get(1), Some("package.json"));
        assert_eq!(quick.slots().len(), SLOT_COUNT);
    }

    #[test]
    fn from_paths_fills_prefix() {
        let quick = QuickAccess::from_paths(&["a.ts".to_string()]);
        assert_eq!(quick.get(0), Some("a.ts"));
        assert_eq!(quick.get(1), Some("src/components/Card.tsx"));

        let many: Vec<String> = (0..6).map(|i| format!("{}.ts", i)).collect();
        let quick = QuickAccess::from_paths(&many);
        assert_eq!(quick.get(3), Some("3.ts"));
        assert_eq!(quick.slots().len(), SLOT_COUNT);
    }

    #[test]
    fn position_finds_slot() {
        let quick = QuickAccess::default();
        assert_eq!(quick.position("src/lib/utils.ts"), Some(2));
        assert_eq!(quick.position("package.json"), None);
    }
}
