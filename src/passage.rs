/// Passage shown when nothing else is configured.
pub const DEFAULT_PASSAGE: &str = "I have a cure for insomnia. It's probably worth millions of dollars but I'm giving it to you free. It isn't warm milk or chamomile tea. It's list making. List stuff from your life like all your teachers or all the live music you've seen or all the Paul Newman movies you've watched.";

/// The fixed text a session asks the user to reproduce
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    text: String,
    chars: Vec<char>,
}

impl Passage {
    /// Build from configured text; an empty text falls back to
    /// [`DEFAULT_PASSAGE`] so a session always has something to type.
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.is_empty() {
            text = DEFAULT_PASSAGE.to_string();
        }
        let chars = text.chars().collect();
        Self { text, chars }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }
}

impl Default for Passage {
    fn default() -> Self {
        Self::new(DEFAULT_PASSAGE)
    }
}
