use unic_langid::LanguageIdentifier;

/// Validate a language code used in a language filter
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.trim().is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(lang_id) => {
            let lang_str = lang_id.to_string();
            if lang_str.starts_with('-') || lang_str.ends_with('-') {
                return Err(format!(
                    "Invalid language code format: {}. Expected valid BCP 47 language identifier",
                    lang
                ));
            }
            Ok(())
        }
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate the `--include-lang` and `--exclude-lang` lists together
pub fn validate_language_filters(include: &[String], exclude: &[String]) -> Result<(), String> {
    for lang in include.iter().chain(exclude) {
        validate_language_code(lang)?;
    }

    if !include.is_empty() && include.iter().all(|lang| exclude.contains(lang)) {
        return Err(format!(
            "Every included language is also excluded: {}",
            include.join(", ")
        ));
    }

    Ok(())
}
