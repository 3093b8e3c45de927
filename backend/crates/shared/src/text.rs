//! Text normalization for names typed by humans.
//!
//! Counties, cities and service names arrive with and without diacritics,
//! in any case and with stray whitespace ("Brașov", "brasov ", "BRASOV").
//! Everything that compares or groups such names goes through
//! [`normalize_key`].

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Decompose (NFD) and drop combining marks.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !COMBINING_MARKS.contains(c)).collect()
}

/// Comparison key: trimmed, diacritic-free, lowercase.
pub fn normalize_key(s: &str) -> String {
    strip_diacritics(s.trim()).to_lowercase()
}

/// `"  cluj-napoca   nord "` -> `"Cluj-Napoca Nord"`
///
/// Whitespace runs collapse to one space. Every word and every
/// hyphen-separated part starts with an uppercase letter.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            word.to_lowercase()
                .split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalized equality, or containment in either direction.
///
/// `"Instalatii"` loosely matches `"Instalații sanitare"`. Empty input never
/// matches anything.
pub fn loosely_matches(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_key(a), normalize_key(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

/// Resolve a human-typed name against `(id, name)` candidates.
///
/// Tries exact equality, then normalized equality, then [`loosely_matches`].
/// The first candidate at the strongest level wins.
pub fn match_name<'a, I, T>(candidates: I, target: &str) -> Option<T>
where
    I: IntoIterator<Item = (T, &'a str)>,
    T: Copy,
{
    let candidates: Vec<(T, &str)> = candidates.into_iter().collect();
    let target_trimmed = target.trim();
    if target_trimmed.is_empty() {
        return None;
    }
    let key = normalize_key(target_trimmed);

    candidates
        .iter()
        .find(|(_, name)| name.trim() == target_trimmed)
        .or_else(|| candidates.iter().find(|(_, name)| normalize_key(name) == key))
        .or_else(|| {
            candidates
                .iter()
                .find(|(_, name)| loosely_matches(name, target_trimmed))
        })
        .map(|(id, _)| *id)
}
