//! Localized validation messages
//!
//! Error codes double as message keys. A catalog maps a language to a table
//! of key/message pairs and is loaded from TOML:
//!
//! ```toml
//! [messages.en]
//! EmptyPlaceholder = "Placeholder is empty."
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Language used when a message is missing in the requested one
pub const FALLBACK_LANGUAGE: &str = "en";

/// Errors that can occur when loading or parsing catalogs
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Message tables per language
#[derive(Debug, Clone)]
pub struct Catalog {
    messages: HashMap<String, HashMap<String, String>>,
}

/// TOML structure for deserializing catalogs
#[derive(Deserialize)]
struct TomlCatalog {
    messages: HashMap<String, HashMap<String, String>>,
}

const DEFAULT_CATALOG: &str = r#"
[messages.en]
Template = "Template"
EmptyPlaceholder = "Placeholder is empty."
PlaceholderNameInvalid = "Placeholder name must start with a letter and may not contain ':', '{' or '}'."
PlaceholderMultipleColon = "Placeholder contains more than one ':'."
PlaceholderNameNotFound = "Placeholder without format must refer to a previously declared name."
PlaceholderTypeInvalid = "Unknown placeholder type; use B, I, F, G, N, P or S."
PlaceholderReuseWrongType = "Reused placeholder name has a different type."
PlaceholderBinLengthInvalid = "Boolean format must be B, B followed by two characters, or B|off|on."
PlaceholderBinInvalidAssign = "Boolean texts may not contain '='."
PlaceholderBinSameText = "Boolean texts for off and on must differ."
PlaceholderIntLengthInvalid = "Integer format must be exactly I."
PlaceholderNumFormatInvalid = "Number format must be one letter, optionally followed by one digit."
PlaceholderStrLengthInvalid = "String format must be exactly S."
MappingEmptyImplicitValue = "Implicit mapping text is empty."
MappingNoImplicitValues = "Implicit mappings are not allowed here."
MappingNoExplicitValues = "Explicit mappings cannot follow implicit ones."
MappingWrongAssignment = "Mapping contains more than one '='."
ExplicitMappingInvalidValue = "Mapping value is not a number."
ExplicitMappingInvRngVal = "Range bound is not a number."
ExplicitMappingInvalidRange = "Range must have the form LOW..HIGH."
ExplicitMappingInvertedRange = "Range lower bound is greater than its upper bound."
MappingNoImplicitTextValues = "Text mapping must have the form original=replacement."
MappingNoOriginalTextValue = "Text mapping original is empty."
MappingWrongTextAssignment = "Text mapping contains more than one '='."
EmptyTemplate = "Template is empty."
NoPlaceholder = "Template contains no placeholder."
TooManyPlaceholders = "Template contains too many placeholders."
TooManyBinPlaceholders = "Too many boolean placeholders."
TooManyIntPlaceholders = "Too many integer placeholders."
TooManyNumPlaceholders = "Too many number placeholders."
TooManyStrPlaceholders = "Too many string placeholders."
SeparatorGroupTooLong = "Group separator must be at most one character."
SeparatorDecimalTooLong = "Decimal separator must be exactly one character."
SeparatorDecimalTooShort = "Decimal separator is missing."
SeparatorsIdentical = "Group and decimal separator must differ."

[messages.de]
Template = "Vorlage"
EmptyPlaceholder = "Platzhalter ist leer."
PlaceholderNameInvalid = "Platzhaltername muss mit einem Buchstaben beginnen und darf kein ':', '{' oder '}' enthalten."
PlaceholderMultipleColon = "Platzhalter enthält mehr als ein ':'."
PlaceholderNameNotFound = "Platzhalter ohne Format muss sich auf einen zuvor deklarierten Namen beziehen."
PlaceholderTypeInvalid = "Unbekannter Platzhaltertyp; erlaubt sind B, I, F, G, N, P oder S."
PlaceholderReuseWrongType = "Wiederverwendeter Platzhaltername hat einen anderen Typ."
PlaceholderBinLengthInvalid = "Binärformat muss B, B mit zwei Zeichen oder B|aus|ein lauten."
PlaceholderBinInvalidAssign = "Binärtexte dürfen kein '=' enthalten."
PlaceholderBinSameText = "Binärtexte für aus und ein müssen sich unterscheiden."
PlaceholderIntLengthInvalid = "Ganzzahlformat muss genau I lauten."
PlaceholderNumFormatInvalid = "Zahlenformat muss ein Buchstabe sein, optional gefolgt von einer Ziffer."
PlaceholderStrLengthInvalid = "Textformat muss genau S lauten."
MappingEmptyImplicitValue = "Text einer impliziten Zuordnung ist leer."
MappingNoImplicitValues = "Implizite Zuordnungen sind hier nicht erlaubt."
MappingNoExplicitValues = "Explizite Zuordnungen dürfen nicht auf implizite folgen."
MappingWrongAssignment = "Zuordnung enthält mehr als ein '='."
ExplicitMappingInvalidValue = "Zuordnungswert ist keine Zahl."
ExplicitMappingInvRngVal = "Bereichsgrenze ist keine Zahl."
ExplicitMappingInvalidRange = "Bereich muss die Form VON..BIS haben."
ExplicitMappingInvertedRange = "Untere Bereichsgrenze ist größer als die obere."
MappingNoImplicitTextValues = "Textzuordnung muss die Form original=ersatz haben."
MappingNoOriginalTextValue = "Original einer Textzuordnung ist leer."
MappingWrongTextAssignment = "Textzuordnung enthält mehr als ein '='."
EmptyTemplate = "Vorlage ist leer."
NoPlaceholder = "Vorlage enthält keinen Platzhalter."
TooManyPlaceholders = "Vorlage enthält zu viele Platzhalter."
TooManyBinPlaceholders = "Zu viele binäre Platzhalter."
TooManyIntPlaceholders = "Zu viele Ganzzahl-Platzhalter."
TooManyNumPlaceholders = "Zu viele Zahlen-Platzhalter."
TooManyStrPlaceholders = "Zu viele Text-Platzhalter."
SeparatorGroupTooLong = "Tausendertrennzeichen darf höchstens ein Zeichen lang sein."
SeparatorDecimalTooLong = "Dezimaltrennzeichen muss genau ein Zeichen lang sein."
SeparatorDecimalTooShort = "Dezimaltrennzeichen fehlt."
SeparatorsIdentical = "Tausender- und Dezimaltrennzeichen müssen sich unterscheiden."
"#;

impl Catalog {
    /// Load catalog from TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load catalog from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        Ok(Catalog {
            messages: parsed.messages,
        })
    }

    /// Overlay another catalog; its messages win
    pub fn merge(&mut self, other: Catalog) {
        for (language, messages) in other.messages {
            self.messages.entry(language).or_default().extend(messages);
        }
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<_> = self.messages.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    /// Look up a message
    ///
    /// Fallback order:
    /// 1. The requested language
    /// 2. [`FALLBACK_LANGUAGE`]
    /// 3. The key itself
    pub fn localize(&self, language: &str, key: &str) -> String {
        [language, FALLBACK_LANGUAGE]
            .iter()
            .find_map(|lang| self.messages.get(*lang)?.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_str(DEFAULT_CATALOG).expect("Default catalog should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_catalog_covers_every_code() {
        let catalog = Catalog::default();
        for language in ["en", "de"] {
            for code in ErrorCode::ALL {
                let message = catalog.messages[language].get(code.as_str());
                assert!(message.is_some(), "{language} lacks {code}");
            }
        }
    }

    #[test]
    fn test_localize_language() {
        let catalog = Catalog::default();
        assert_eq!(catalog.localize("de", "EmptyTemplate"), "Vorlage ist leer.");
        assert_eq!(catalog.localize("en", "EmptyTemplate"), "Template is empty.");
    }

    #[test]
    fn test_localize_fallbacks() {
        let catalog = Catalog::default();
        assert_eq!(catalog.localize("fr", "EmptyTemplate"), "Template is empty.");
        assert_eq!(catalog.localize("de", "NoSuchKey"), "NoSuchKey");
    }

    #[test]
    fn test_merge_overrides() {
        let mut catalog = Catalog::default();
        let custom = Catalog::from_str(
            r#"
[messages.en]
EmptyTemplate = "Nothing to render."

[messages.fr]
EmptyTemplate = "Modèle vide."
"#,
        )
        .expect("Should parse");
        catalog.merge(custom);
        assert_eq!(catalog.localize("en", "EmptyTemplate"), "Nothing to render.");
        assert_eq!(catalog.localize("en", "NoPlaceholder"), "Template contains no placeholder.");
        assert_eq!(catalog.localize("fr", "EmptyTemplate"), "Modèle vide.");
        assert_eq!(catalog.languages(), vec!["de", "en", "fr"]);
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(Catalog::from_str("this is not valid toml {{{{").is_err());
    }
}
