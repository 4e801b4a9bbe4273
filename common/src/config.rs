use config::{Config, FileFormat};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

use crate::{Error, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub source: SourceConfig,
    #[serde(default)]
    pub cleaning: CleaningConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub restaurants_path: String,
    pub countries_path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub country_columns: CountryColumns,
}

/// Header names of the restaurant table, in the source's own spelling.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: String,
    pub name: String,
    pub country_code: String,
    pub city: String,
    pub locality: String,
    pub cuisines: String,
    pub average_cost_for_two: String,
    pub price_range: String,
    pub rating: String,
    pub votes: String,
    pub has_online_delivery: String,
    pub has_table_booking: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "restaurant_id".to_string(),
            name: "restaurant_name".to_string(),
            country_code: "country_code".to_string(),
            city: "city".to_string(),
            locality: "locality".to_string(),
            cuisines: "cuisines".to_string(),
            average_cost_for_two: "average_cost_for_two".to_string(),
            price_range: "price_range".to_string(),
            rating: "rating".to_string(),
            votes: "votes".to_string(),
            has_online_delivery: "has_online_delivery".to_string(),
            has_table_booking: "has_table_booking".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CountryColumns {
    pub code: String,
    pub name: String,
}

impl Default for CountryColumns {
    fn default() -> Self {
        Self {
            code: "country_code".to_string(),
            name: "country".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CleaningConfig {
    /// Country-code values known to be upstream parsing fragments.
    pub country_code_denylist: Vec<String>,
    pub excluded_ids: Vec<String>,
    pub city_fix: CityFix,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CityFix {
    pub garbled: String,
    pub replacement: String,
}

impl Default for CityFix {
    fn default() -> Self {
        Self {
            garbled: "?".to_string(),
            replacement: "i".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct AnalysisConfig {
    pub locality_min_restaurants: usize,
    pub cuisine_min_restaurants: usize,
    pub cuisine_min_token_len: usize,
    pub competitive_min_votes: u32,
    pub parallel_views: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            locality_min_restaurants: 5,
            cuisine_min_restaurants: 20,
            cuisine_min_token_len: 3,
            competitive_min_votes: 50,
            parallel_views: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Parquet,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output".to_string(),
            format: OutputFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl Settings {
    pub fn new(path: &str) -> Result<Self> {
        let builder = Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        Self::build(builder.build()?)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let builder = Config::builder().add_source(config::File::from_str(raw, FileFormat::Toml));
        Self::build(builder.build()?)
    }

    fn build(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;

        debug!(
            denylist = settings.cleaning.country_code_denylist.len(),
            excluded_ids = settings.cleaning.excluded_ids.len(),
            "Parsed cleaning configuration"
        );

        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings that would make the cleaning rules ambiguous.
    pub fn validate(&self) -> Result<()> {
        check_entries("cleaning.country_code_denylist", &self.cleaning.country_code_denylist)?;
        check_entries("cleaning.excluded_ids", &self.cleaning.excluded_ids)?;

        let fix = &self.cleaning.city_fix;
        if fix.garbled.chars().count() != 1 {
            return Err(Error::Configuration(format!(
                "cleaning.city_fix.garbled must be exactly one character, got {:?}",
                fix.garbled
            )));
        }
        if fix.replacement.is_empty() {
            return Err(Error::Configuration(
                "cleaning.city_fix.replacement must not be empty".to_string(),
            ));
        }
        if fix.replacement.contains(fix.garbled.as_str()) {
            return Err(Error::Configuration(format!(
                "cleaning.city_fix.replacement {:?} contains the garbled character",
                fix.replacement
            )));
        }

        let analysis = &self.analysis;
        if analysis.locality_min_restaurants == 0
            || analysis.cuisine_min_restaurants == 0
            || analysis.cuisine_min_token_len == 0
        {
            return Err(Error::Configuration(
                "analysis minimum thresholds must be greater than zero".to_string(),
            ));
        }

        if self.source.delimiter.len() != 1 {
            return Err(Error::Configuration(format!(
                "source.delimiter must be a single byte, got {:?}",
                self.source.delimiter
            )));
        }

        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.source.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

fn check_entries(key: &str, entries: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.trim().is_empty() {
            return Err(Error::Configuration(format!("{key} contains a blank entry")));
        }
        if !seen.insert(entry.as_str()) {
            return Err(Error::Configuration(format!(
                "{key} lists {entry:?} more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [source]
        restaurants_path = "data/zomato.csv"
        countries_path = "data/countries.csv"
    "#;

    #[test]
    fn defaults_fill_optional_sections() {
        let settings = Settings::from_toml_str(MINIMAL).unwrap();
        assert_eq!(settings.cleaning.city_fix.garbled, "?");
        assert_eq!(settings.cleaning.city_fix.replacement, "i");
        assert_eq!(settings.analysis.locality_min_restaurants, 5);
        assert_eq!(settings.analysis.cuisine_min_restaurants, 20);
        assert_eq!(settings.analysis.competitive_min_votes, 50);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.source.columns.id, "restaurant_id");
        assert_eq!(settings.delimiter_byte(), b',');
    }

    #[test]
    fn reads_cleaning_lists_and_format() {
        let raw = format!(
            "{MINIMAL}
            [cleaning]
            country_code_denylist = [\" Bar Food\", \" Desserts\"]
            excluded_ids = [\"18306543\"]

            [output]
            format = \"parquet\"
            "
        );
        let settings = Settings::from_toml_str(&raw).unwrap();
        assert_eq!(settings.cleaning.country_code_denylist.len(), 2);
        assert_eq!(settings.cleaning.excluded_ids, vec!["18306543".to_string()]);
        assert_eq!(settings.output.format, OutputFormat::Parquet);
    }

    #[test]
    fn blank_denylist_entry_is_fatal() {
        let raw = format!("{MINIMAL}\n[cleaning]\ncountry_code_denylist = [\"  \"]\n");
        let err = Settings::from_toml_str(&raw).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn duplicate_excluded_id_is_fatal() {
        let raw = format!("{MINIMAL}\n[cleaning]\nexcluded_ids = [\"1\", \"1\"]\n");
        assert!(matches!(
            Settings::from_toml_str(&raw),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn city_fix_must_be_single_character() {
        let raw = format!("{MINIMAL}\n[cleaning.city_fix]\ngarbled = \"??\"\n");
        assert!(matches!(
            Settings::from_toml_str(&raw),
            Err(Error::Configuration(_))
        ));

        let raw = format!("{MINIMAL}\n[cleaning.city_fix]\nreplacement = \"i?\"\n");
        assert!(matches!(
            Settings::from_toml_str(&raw),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn missing_source_section_is_a_config_error() {
        let err = Settings::from_toml_str("[output]\ndir = \"out\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.toml");
        std::fs::write(&path, MINIMAL).unwrap();
        let settings = Settings::new(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.source.countries_path, "data/countries.csv");
    }

    #[test]
    fn shipped_config_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/insights.toml");
        let settings = Settings::new(path).unwrap();
        assert_eq!(settings.cleaning.country_code_denylist, vec!["999".to_string()]);
        assert!(settings.analysis.parallel_views);
    }
}
