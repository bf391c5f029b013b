use serde::{Deserialize, Serialize};
use shared::forms::{FormErrors, REQUIRED};

use super::{slug, Note, NoteData};

pub const TITLE_MAX_LENGTH: usize = 100;

pub const TITLE_TOO_LONG: &str = "Ensure the title has at most 100 characters.";
pub const SLUG_TOO_LONG: &str = "Ensure the slug has at most 100 characters.";
pub const SLUG_INVALID: &str = "Enter a valid slug consisting of Latin letters, numbers, underscores or hyphens.";
pub const SLUG_UNDERIVABLE: &str = "Could not build an address from the title, please enter the slug yourself.";

/// Error shown when another note already uses `slug`.
pub fn slug_warning(slug: &str) -> String {
    format!("{slug} - такой slug уже существует, придумайте уникальное значение!")
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }
}

impl NoteForm {
    /// Field checks only; slug uniqueness needs the store.
    pub fn validate(&self) -> Result<NoteData, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > TITLE_MAX_LENGTH {
            errors.add("title", TITLE_TOO_LONG);
        }

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let slug = match self.slug.trim() {
            "" => slug::from_title(title),
            supplied => supplied.to_owned(),
        };
        if slug.is_empty() {
            if !title.is_empty() {
                errors.add("slug", SLUG_UNDERIVABLE);
            }
        } else if slug.chars().count() > slug::MAX_LENGTH {
            errors.add("slug", SLUG_TOO_LONG);
        } else if !slug::is_valid(&slug) {
            errors.add("slug", SLUG_INVALID);
        }

        errors.into_result()?;

        Ok(NoteData {
            title: title.to_owned(),
            text: text.to_owned(),
            slug,
        })
    }
}
