// Display theme helpers

/// Class carried by the `<html>` element for the given mode.
#[must_use]
pub const fn theme_class(dark_mode: bool) -> &'static str {
    if dark_mode { "dark" } else { "light" }
}

/// Apply the dark or light theme
///
/// Swaps the theme class on the HTML element. The preference itself lives in
/// the progress record, so nothing is written here.
pub fn apply_theme(dark_mode: bool) {
    let Some(html) = crate::dom::root_element() else {
        return;
    };
    let classes = html.class_list();
    let _ = classes.remove_1(theme_class(!dark_mode));
    let _ = classes.add_1(theme_class(dark_mode));
}

#[cfg(test)]
mod tests {
    use super::theme_class;

    #[test]
    fn theme_classes_are_distinct() {
        assert_eq!(theme_class(true), "dark");
        assert_eq!(theme_class(false), "light");
    }
}
