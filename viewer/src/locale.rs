/// Two-letter language hint for the authenticator dialogs
/// (`navigator.language` on the web, `LC_ALL`/`LANG` natively).
pub fn language_hint() -> String {
    let lang = raw_locale().unwrap_or_default();
    let lang: String = lang.chars().take(2).collect();
    if lang.len() == 2 && lang.chars().all(|c| c.is_ascii_alphabetic()) {
        lang.to_lowercase()
    } else {
        "en".to_owned()
    }
}

#[cfg(target_arch = "wasm32")]
fn raw_locale() -> Option<String> {
    web_sys::window()?.navigator().language()
}

#[cfg(not(target_arch = "wasm32"))]
fn raw_locale() -> Option<String> {
    std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LANG"))
        .ok()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::language_hint;

    #[test]
    fn hint_is_two_letters() {
        // Whatever the environment, the hint must be a usable two-letter code.
        let hint = language_hint();
        assert_eq!(hint.len(), 2);
        assert!(hint.chars().all(|c| c.is_ascii_lowercase()));
    }
}
