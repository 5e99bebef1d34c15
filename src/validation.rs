use crate::errors::ErrorInfo;

/// Checks that exactly one of two alternative fields for the same slot was
/// supplied. Empty strings count as missing.
///
/// # Errors
///
/// Returns a local `ErrorInfo` naming both fields when neither or both
/// were given.
pub fn exactly_one_of(
    first: (&str, Option<&str>),
    second: (&str, Option<&str>),
) -> Result<(), ErrorInfo> {
    let present = |value: Option<&str>| value.is_some_and(|value| !value.is_empty());
    let (first_name, first_value) = first;
    let (second_name, second_value) = second;
    let (first_name, second_name) = (with_article(first_name), with_article(second_name));

    let supplied = match (present(first_value), present(second_value)) {
        (true, false) | (false, true) => return Ok(()),
        (false, false) => "neither",
        (true, true) => "both",
    };
    Err(ErrorInfo::local(format!(
        "send either {first_name}, or {second_name}, but not both, and you have supplied {supplied}"
    )))
}

fn with_article(name: &str) -> String {
    let article = match name.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    format!("{article} {name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_exactly_one_accepts_either_side() {
        let template = ("templateId", Some("tmpl_1"));
        assert!(exactly_one_of(template, ("inquiryTemplateId", None)).is_ok());
        let inquiry_template = ("inquiryTemplateId", Some("itmpl_1"));
        assert!(exactly_one_of(("templateId", None), inquiry_template).is_ok());
    }

    #[test]
    fn test_exactly_one_rejects_neither() {
        let error = exactly_one_of(("accountId", None), ("referenceId", Some(""))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Local);
        assert!(error.to_string().contains("supplied neither"));
        assert!(error.to_string().contains("an accountId, or a referenceId"));
    }

    #[test]
    fn test_exactly_one_rejects_both() {
        let account = ("accountId", Some("act_1"));
        let error = exactly_one_of(account, ("referenceId", Some("ref-1"))).unwrap_err();
        assert!(error.to_string().contains("supplied both"));
        assert!(error.to_string().contains("referenceId"));
    }
}
