use cipher_game::Language;
#[cfg_attr(all(test, not(target_arch = "wasm32")), allow(unused_imports))]
use cipher_game::constants::LANGUAGE_STORAGE_KEY;
use std::cell::Cell;

const LABELS: &[(&str, &str, &str)] = &[
    ("exit_mission", "Exit Mission", "Mission Chhodo"),
    ("level", "LEVEL", "STAR"),
    ("hint_title", "Intelligence Hint", "Hint"),
    ("explanation_title", "Explanation", "Samjhaayi"),
    ("answer_label", "Your Answer", "Aapka Jawaab"),
    ("answer_placeholder", "Enter your solution...", "Yahan likho..."),
    ("submit", "SUBMIT ANSWER", "Jawaab Do"),
    ("analyzing", "ANALYZING...", "Socha ja raha hai..."),
    ("classification", "Classification", "Prakar"),
    ("security_level", "Security Level", "Suraksha Star"),
    ("mission_complete", "Mission Complete!", "Mission Complete!"),
    (
        "mission_complete_body",
        "You've completed all puzzles in this difficulty mode.",
        "Is mode ki saari puzzles poori ho gayi.",
    ),
    ("return_to_base", "Return to Base", "Base par wapas"),
];

fn saved_language() -> Language {
    #[cfg(not(test))]
    {
        crate::dom::local_storage()
            .ok()
            .and_then(|storage| storage.get_item(LANGUAGE_STORAGE_KEY).ok().flatten())
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }
    #[cfg(test)]
    {
        Language::default()
    }
}

thread_local! {
    static CURRENT: Cell<Option<Language>> = const { Cell::new(None) };
}

/// The active interface language, read from localStorage on first use.
#[must_use]
pub fn current_language() -> Language {
    CURRENT.with(|cell| {
        cell.get().unwrap_or_else(|| {
            let language = saved_language();
            cell.set(Some(language));
            language
        })
    })
}

/// Switch the interface language
///
/// Updates the `<html lang>` attribute and persists the choice to localStorage
/// under its own key, separate from the progress record.
pub fn set_language(language: Language) {
    CURRENT.with(|cell| cell.set(Some(language)));
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(el) = crate::dom::root_element() {
            let _ = el.set_attribute("lang", language.as_str());
        }
        if let Ok(storage) = crate::dom::local_storage() {
            if let Err(err) = storage.set_item(LANGUAGE_STORAGE_KEY, language.as_str()) {
                log::warn!(
                    "could not persist language: {}",
                    crate::dom::js_error_message(&err)
                );
            }
        }
    }
}

/// Look up a static interface label. Unknown keys are returned unchanged.
#[must_use]
pub fn t(key: &str, language: Language) -> String {
    LABELS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map_or_else(
            || key.to_string(),
            |(_, en, hi)| match language {
                Language::En => (*en).to_string(),
                Language::Hi => (*hi).to_string(),
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_switch_with_language() {
        assert_eq!(t("submit", Language::En), "SUBMIT ANSWER");
        assert_eq!(t("submit", Language::Hi), "Jawaab Do");
        assert_eq!(t("missing.key", Language::Hi), "missing.key");
    }

    #[test]
    fn every_label_has_both_languages() {
        for (key, en, hi) in LABELS {
            assert!(!en.is_empty() && !hi.is_empty(), "{key}");
        }
    }

    #[test]
    fn current_language_defaults_and_switches() {
        assert_eq!(current_language(), Language::En);
        set_language(Language::Hi);
        assert_eq!(current_language(), Language::Hi);
        set_language(Language::En);
    }
}
