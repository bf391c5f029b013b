//! Transliterating slugs for Russian (and Ukrainian) titles.
//!
//! Produces the same output as the `pytils.translit.slugify` function the
//! existing notes were created with, so stored slugs and generated ones agree.

/// Longest slug a note may carry.
pub const MAX_LENGTH: usize = 100;

/// `None` for characters outside the transliteration alphabet.
fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        '\'' | '‘' | '’' => "'",
        '"' | '«' | '»' | '“' | '”' => "\"",
        '–' | '—' | '‒' | '−' => "-",
        '…' => "...",
        '№' => "#",

        'щ' => "sch",
        'ё' => "yo",
        'ж' => "zh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'ы' => "yi",
        'ю' => "yu",
        'я' => "ya",
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'э' => "e",
        'ъ' => "`",
        'ь' => "'",

        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",

        _ => return None,
    };

    Some(latin)
}

fn in_alphabet(ch: char) -> bool {
    ch == '-' || ch.is_ascii_alphanumeric() || transliterate(ch).is_some()
}

/// Lowercase ASCII slug of `text`, e.g. "Заметка с автоматическим slug" → `zametka-s-avtomaticheskim-slug`.
///
/// Never truncates; callers cut to [`MAX_LENGTH`].
pub fn slugify(text: &str) -> String {
    let text = text.to_lowercase().replace("&amp;", " and ").replace('&', " and ");

    let mut dashed = String::with_capacity(text.len());
    let mut in_gap = false;
    for ch in text.chars() {
        if ch == '-' || ch.is_whitespace() {
            if !in_gap {
                dashed.push('-');
            }
            in_gap = true;
        } else {
            dashed.push(ch);
            in_gap = false;
        }
    }

    let mut latin = String::with_capacity(dashed.len());
    for ch in dashed.chars().filter(|&ch| in_alphabet(ch)) {
        match transliterate(ch) {
            Some(replacement) => latin.push_str(replacement),
            None => latin.push(ch),
        }
    }

    latin
        .chars()
        .filter(|&ch| ch == '-' || ch == '_' || ch.is_alphanumeric() || ch.is_whitespace())
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Whether a slug typed in by the user is acceptable as is.
pub fn is_valid(slug: &str) -> bool {
    !slug.is_empty()
        && slug.chars().count() <= MAX_LENGTH
        && slug.chars().all(|ch| ch == '-' || ch == '_' || ch.is_ascii_alphanumeric())
}

/// The slug a note gets when none is supplied.
pub fn from_title(title: &str) -> String {
    slugify(title).chars().take(MAX_LENGTH).collect()
}
