//! Ambient pipeline configuration (spec §3, ambient additions).
//!
//! The core parser is a pure function of `&[String]` plus three caller
//!-supplied context strings — it never reads this struct. `ParserConfig`
//! only exists for the pipeline entry point, to carry the defaults an
//! external caller would otherwise pass on every invocation.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_store")]
    pub store: String,
    #[serde(default = "default_rel_base")]
    pub rel_base: String,
    #[serde(default = "default_ocr_engine")]
    pub ocr_engine: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            store: default_store(),
            rel_base: default_rel_base(),
            ocr_engine: default_ocr_engine(),
        }
    }
}

fn default_store() -> String {
    "lidl".to_string()
}

fn default_rel_base() -> String {
    String::new()
}

fn default_ocr_engine() -> String {
    "apple_vision".to_string()
}

impl ParserConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_fields() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.store, "lidl");
        assert_eq!(cfg.ocr_engine, "apple_vision");
    }

    #[test]
    fn partial_toml_fills_missing_fields_with_defaults() {
        let cfg = ParserConfig::from_toml_str(r#"store = "lidl-cluj""#).unwrap();
        assert_eq!(cfg.store, "lidl-cluj");
        assert_eq!(cfg.rel_base, "");
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(ParserConfig::from_toml_str("not valid = = toml").is_err());
    }
}
