//! Comparison keys and cleanup for free-text fields.
//!
//! Zone names, search queries and delivery days are typed by hand, so they
//! are compared through [`normalize`], never byte for byte. The key is only
//! used for lookups; display strings keep their own spelling.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Case and diacritic insensitive key: `"  Ñuñoa "` and `"nunoa"` share the
/// key `"nunoa"`. Inner whitespace runs collapse to one space.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Display form for names typed by hand: `"las  CONDES"` becomes
/// `"Las Condes"`. Every alphabetic run starts upper-case.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut at_start = true;
        for ch in word.chars() {
            if ch.is_alphabetic() {
                if at_start {
                    out.extend(ch.to_uppercase());
                } else {
                    out.extend(ch.to_lowercase());
                }
                at_start = false;
            } else {
                out.push(ch);
                at_start = true;
            }
        }
    }
    out
}

/// Trims a required field, rejecting blank input.
pub(crate) fn clean_required(value: &str, field: &'static str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_and_accents() {
        assert_eq!(normalize("Ñuñoa"), "nunoa");
        assert_eq!(normalize("  ESTACIÓN   Central "), "estacion central");
        assert_eq!(normalize("Miércoles"), normalize("miercoles"));
    }

    #[test]
    fn normalize_tolerates_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn title_case_keeps_accents_and_collapses_spaces() {
        assert_eq!(title_case("las  CONDES"), "Las Condes");
        assert_eq!(title_case(" ñuñoa "), "Ñuñoa");
        assert_eq!(title_case("o'higgins"), "O'Higgins");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn clean_required_reports_the_field() {
        assert_eq!(clean_required("  Ana ", "name").unwrap(), "Ana");
        let err = clean_required("   ", "address").unwrap_err();
        assert_eq!(err, EngineError::validation("address", "must not be empty"));
    }
}
