/// Languages offered by the translation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Urdu,
    Spanish,
    French,
    German,
    Chinese,
}

impl Language {
    /// Messages are written in this language, so selecting it translates nothing
    pub const DEFAULT: Language = Language::English;

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Urdu => "ur",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Chinese => "zh",
        }
    }

    pub fn all() -> Vec<Language> {
        vec![
            Language::English,
            Language::Urdu,
            Language::Spanish,
            Language::French,
            Language::German,
            Language::Chinese,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "اردو (Urdu)",
            Language::Spanish => "Español",
            Language::French => "Français",
            Language::German => "Deutsch",
            Language::Chinese => "中文 (Chinese)",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_two_letter_tags() {
        let codes: Vec<&str> = Language::all().iter().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["en", "ur", "es", "fr", "de", "zh"]);
    }

    #[test]
    fn test_only_english_is_default() {
        let defaults: Vec<Language> = Language::all().into_iter().filter(|l| l.is_default()).collect();
        assert_eq!(defaults, vec![Language::English]);
    }
}
