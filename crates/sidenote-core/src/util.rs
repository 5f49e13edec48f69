//! Shared utility functions used across multiple modules.

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Trim every entry, dropping empties and repeats while keeping first-seen order.
pub fn normalize_text_list(values: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !normalized.iter().any(|seen| seen == value) {
            normalized.push(value.to_string());
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" session-a ".to_string())),
            Some("session-a".to_string())
        );
    }

    #[test]
    fn normalize_text_list_dedups_and_trims() {
        let raw = vec![
            " about-me".to_string(),
            String::new(),
            "quick-links".to_string(),
            "about-me ".to_string(),
        ];
        assert_eq!(
            normalize_text_list(&raw),
            vec!["about-me".to_string(), "quick-links".to_string()]
        );
    }
}
