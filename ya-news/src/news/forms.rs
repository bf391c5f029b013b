use serde::{Deserialize, Serialize};
use shared::forms::{FormErrors, REQUIRED};

pub const BAD_WORDS: [&str; 2] = ["редиска", "негодяй"];
pub const WARNING: &str = "Не ругайтесь!";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Returns the text to store.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let text = self.text.trim();

        if text.is_empty() {
            return Err(FormErrors::single("text", REQUIRED));
        }
        if contains_bad_word(text) {
            return Err(FormErrors::single("text", WARNING));
        }

        Ok(text.to_owned())
    }
}

/// Case-insensitive substring match, no word boundaries: "Редиска" and "редисками" both match.
pub fn contains_bad_word(text: &str) -> bool {
    let lowered = text.to_lowercase();
    BAD_WORDS.iter().any(|word| lowered.contains(word))
}
