//! Concept code and path construction.

use i2b2_model::MAX_CODE_LEN;

/// A synthesized concept code. Truncation is a designed outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptCode {
    Full(String),
    /// The candidate exceeded [`MAX_CODE_LEN`]; `dropped` leading suffix
    /// characters were removed.
    Truncated { code: String, dropped: usize },
}

impl ConceptCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Full(code) | Self::Truncated { code, .. } => code,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Full(code) | Self::Truncated { code, .. } => code,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Keeps alphanumeric characters only.
pub fn canonicalize(text: &str) -> String {
    text.chars().filter(|ch| ch.is_alphanumeric()).collect()
}

/// Code suffix for an `id=label` entry. A label that canonicalizes to its
/// own id is not repeated.
pub fn enumerated_suffix(label: &str, raw_id: &str) -> String {
    let canonical = canonicalize(label);
    if canonical == raw_id {
        canonical
    } else {
        format!("{canonical}{raw_id}")
    }
}

/// Joins `prefix` and `suffix`, cutting from the left of the suffix so the
/// prefix survives intact. A prefix already at the limit keeps its last
/// [`MAX_CODE_LEN`] characters.
pub fn build_code(prefix: &str, suffix: &str) -> ConceptCode {
    let prefix_len = prefix.chars().count();
    let suffix_len = suffix.chars().count();
    if prefix_len + suffix_len <= MAX_CODE_LEN {
        return ConceptCode::Full(format!("{prefix}{suffix}"));
    }
    if prefix_len < MAX_CODE_LEN {
        let keep = MAX_CODE_LEN - prefix_len;
        let tail: String = suffix.chars().skip(suffix_len - keep).collect();
        return ConceptCode::Truncated {
            code: format!("{prefix}{tail}"),
            dropped: suffix_len - keep,
        };
    }
    let total = prefix_len + suffix_len;
    let code: String = prefix
        .chars()
        .chain(suffix.chars())
        .skip(total - MAX_CODE_LEN)
        .collect();
    ConceptCode::Truncated {
        code,
        dropped: total - MAX_CODE_LEN,
    }
}

/// Folder segment for a variable: `,` becomes ` - ` and `/` becomes `or`.
pub fn sanitize_segment(text: &str) -> String {
    text.replace(',', " - ").replace('/', "or")
}

/// `/<root>/<folder>/`
pub fn concept_folder(path_root: &str, label: &str) -> String {
    format!("/{path_root}/{}/", sanitize_segment(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_drops_punctuation() {
        assert_eq!(canonicalize("Not applicable (N/A)"), "NotapplicableNA");
        assert_eq!(canonicalize("Größe 2"), "Größe2");
    }

    #[test]
    fn suffix_collapses_matching_id() {
        assert_eq!(enumerated_suffix("Male", "Male"), "Male");
        assert_eq!(enumerated_suffix("Male", "1"), "Male1");
        assert_eq!(enumerated_suffix("Y e s", "Yes"), "Yes");
    }

    #[test]
    fn short_code_is_kept() {
        assert_eq!(build_code("SEX", "Male1"), ConceptCode::Full("SEXMale1".to_string()));
    }

    #[test]
    fn long_suffix_is_cut_from_the_left() {
        let prefix = "Q".repeat(10);
        let suffix = format!("{}{}", "a".repeat(35), "TAIL12345");
        let code = build_code(&prefix, &suffix);
        assert!(code.is_truncated());
        assert_eq!(code.as_str().chars().count(), MAX_CODE_LEN);
        assert!(code.as_str().starts_with(&prefix));
        assert!(code.as_str().ends_with("TAIL12345"));
        assert_eq!(code, ConceptCode::Truncated {
            code: format!("{prefix}{}TAIL12345", "a".repeat(31)),
            dropped: 4,
        });
    }

    #[test]
    fn oversized_prefix_keeps_last_characters() {
        let prefix: String = ('a'..='z').cycle().take(60).collect();
        let code = build_code(&prefix, "1");
        assert_eq!(code.as_str().chars().count(), MAX_CODE_LEN);
        assert!(code.as_str().ends_with('1'));
    }

    #[test]
    fn folder_is_well_formed() {
        assert_eq!(concept_folder("Study", "Height, cm"), "/Study/Height -  cm/");
        assert_eq!(concept_folder("Study", "Yes/No"), "/Study/YesorNo/");
    }
}
