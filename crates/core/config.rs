//! Configuration for quadtree lineage builds.
use serde::de::Error;

/// Build configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// A quadrant holding at least this many points is split again
    #[serde(default = "Config::default_threshold")]
    pub threshold: usize,

    /// Subdivision deeper than this aborts the build
    #[serde(default = "Config::default_max_depth")]
    pub max_depth: usize,

    /// Length assigned to tree branches that have none
    #[serde(default = "Config::default_branch_length")]
    pub branch_length: f64,
}

impl Config {
    const fn default_threshold() -> usize {
        2
    }

    const fn default_max_depth() -> usize {
        128
    }

    const fn default_branch_length() -> f64 {
        1.0
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        assert!(max_depth > 0, "Max depth must be greater than zero");
        self.max_depth = max_depth;
        self
    }

    pub fn with_branch_length(mut self, length: f64) -> Self {
        assert!(
            length.is_finite() && length > 0.0,
            "Branch length must be a positive finite number"
        );
        self.branch_length = length;
        self
    }

    /// Checks the settings that can be rejected before any data is seen.
    /// The threshold is checked against the point count during the build.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("Max depth must be greater than zero".to_string());
        }

        if !(self.branch_length.is_finite() && self.branch_length > 0.0) {
            return Err(format!(
                "Branch length must be a positive finite number, got {}",
                self.branch_length
            ));
        }

        if self.max_depth > 1024 {
            log::warn!(
                "Max depth of {} is beyond the resolution of f64 coordinates; \
                subdivision will stall long before reaching it",
                self.max_depth
            );
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: Self::default_threshold(),
            max_depth: Self::default_max_depth(),
            branch_length: Self::default_branch_length(),
        }
    }
}
