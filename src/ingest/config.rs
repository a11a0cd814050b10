//! Ingestion settings.

use crate::error::ConfigError;

/// Header name of the key column used when none is configured.
pub const DEFAULT_COLUMN: &str = "email";
pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_QUOTE: char = '"';

/// How a tabular upload is decoded and ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Header name of the column holding the email address.
    pub column: String,
    pub delimiter: char,
    pub quote: char,
    /// Order equal-cardinality groups by name in the report.
    pub sorted_ties: bool,
    /// Lowercase the domain before grouping.
    pub lowercase_domain: bool,
}

impl IngestConfig {
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::new()
    }

    /// Checks the configuration for values the decoder cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column.trim().is_empty() {
            return Err(ConfigError::new("key column name must not be empty"));
        }
        if self.delimiter == self.quote {
            return Err(ConfigError::new(format!(
                "delimiter and quote must differ, both are {:?}",
                self.delimiter
            )));
        }
        for (name, c) in [("delimiter", self.delimiter), ("quote", self.quote)] {
            if c == '\n' || c == '\r' {
                return Err(ConfigError::new(format!("{name} must not be a line break")));
            }
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN.to_string(),
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
            sorted_ties: false,
            lowercase_domain: false,
        }
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug, Clone, Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.config.column = column.into();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.config.quote = quote;
        self
    }

    pub fn sorted_ties(mut self, sorted: bool) -> Self {
        self.config.sorted_ties = sorted;
        self
    }

    pub fn lowercase_domain(mut self, lowercase: bool) -> Self {
        self.config.lowercase_domain = lowercase;
        self
    }

    /// Builds the configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. For a non-panicking
    /// alternative, use [`try_build`](Self::try_build).
    pub fn build(self) -> IngestConfig {
        match self.try_build() {
            Ok(config) => config,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the configuration, returning an error on invalid values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the column name is empty, the delimiter
    /// equals the quote character, or either is a line break.
    ///
    /// # Example
    ///
    /// ```
    /// use rankkit::ingest::IngestConfig;
    ///
    /// let config = IngestConfig::builder()
    ///     .column("address")
    ///     .delimiter(';')
    ///     .try_build()
    ///     .unwrap();
    /// assert_eq!(config.column, "address");
    ///
    /// assert!(IngestConfig::builder().delimiter('"').try_build().is_err());
    /// ```
    pub fn try_build(self) -> Result<IngestConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = IngestConfig::default();
        assert_eq!(config.column, "email");
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quote, '"');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_column_is_rejected() {
        let err = IngestConfig::builder().column("  ").try_build().unwrap_err();
        assert!(err.message().contains("column"));
    }

    #[test]
    fn line_break_delimiter_is_rejected() {
        let err = IngestConfig::builder().delimiter('\n').try_build().unwrap_err();
        assert!(err.message().contains("delimiter"));
    }

    #[test]
    #[should_panic(expected = "must differ")]
    fn build_panics_on_invalid_config() {
        let _ = IngestConfig::builder().quote(',').build();
    }
}
