use std::sync::Arc;

use thiserror::Error;

/// Markets crawled and served when `REGIONS` is not set.
pub const DEFAULT_REGIONS: [&str; 12] = [
    "en-us", "zh-cn", "ja-jp", "de-de", "en-gb", "es-es",
    "pt-br", "en-au", "en-ca", "fr-fr", "en-in", "it-it",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnknownRegionError {
    #[error("unknown region: {region}")]
    UnknownRegion { region: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRegionsError {
    #[error("EmptyRegionList: at least one market code is required")]
    EmptyRegionList,
}

/// Closed, ordered set of market codes. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistry {
    codes: Arc<[String]>,
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGIONS)
    }
}

impl RegionRegistry {
    /// Lowercases and trims each code, drops blanks and later duplicates.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim().to_ascii_lowercase();
            if !code.is_empty() && !ordered.contains(&code) {
                ordered.push(code);
            }
        }
        Self { codes: ordered.into() }
    }

    /// Parses a comma-separated list such as `en-us, zh-cn`.
    pub fn parse_list(value: &str) -> Result<Self, ParseRegionsError> {
        let registry = Self::new(value.split(','));
        if registry.codes.is_empty() {
            return Err(ParseRegionsError::EmptyRegionList);
        }
        Ok(registry)
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|known| known == code)
    }

    pub fn validate<'a>(&self, code: &'a str) -> Result<&'a str, UnknownRegionError> {
        if self.contains(code) {
            Ok(code)
        } else {
            Err(UnknownRegionError::UnknownRegion { region: code.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_keeps_declared_order() {
        let registry = RegionRegistry::default();
        assert_eq!(registry.codes().len(), 12);
        assert_eq!(registry.codes()[0], "en-us");
        assert_eq!(registry.codes()[11], "it-it");
    }

    #[test]
    fn parse_list_normalises_and_dedupes() {
        let registry = RegionRegistry::parse_list(" ZH-CN, en-us,,zh-cn ").unwrap();
        assert_eq!(registry.codes(), ["zh-cn".to_string(), "en-us".to_string()]);
    }

    #[test]
    fn parse_list_keeps_long_codes_whole() {
        let registry = RegionRegistry::parse_list("zh-hant-tw-extended-market").unwrap();
        assert_eq!(registry.validate("zh-hant-tw-extended-market"), Ok("zh-hant-tw-extended-market"));
    }

    #[test]
    fn parse_list_rejects_empty() {
        assert_eq!(
            RegionRegistry::parse_list(" , "),
            Err(ParseRegionsError::EmptyRegionList)
        );
    }

    #[test]
    fn validate_is_exact_match() {
        let registry = RegionRegistry::default();
        assert_eq!(registry.validate("ja-jp"), Ok("ja-jp"));
        assert_eq!(
            registry.validate("xx-yy"),
            Err(UnknownRegionError::UnknownRegion { region: "xx-yy".to_string() })
        );
        assert!(registry.validate("JA-JP").is_err());
    }
}
