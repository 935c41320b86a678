use crate::error::{Error, InvalidConfig};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `$HOME/.config/select-gen/config.json`, or nothing if we don't know where home is.
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;

    Some(
        Path::new(&home)
            .join(".config")
            .join("select-gen")
            .join("config.json"),
    )
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sample: SampleConfig,
    pub generator: GeneratorConfig,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct SampleConfig {
    /// How many sample statements to print.
    pub count: usize,
}

impl Default for SampleConfig {
    fn default() -> SampleConfig {
        SampleConfig { count: 1 }
    }
}

/// Settings for random statements.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    /// Every path from the root of a condition tree to a leaf has this many branches.
    pub max_height: usize,
    /// A leaf compares labels when a uniform draw is above this, metrics otherwise.
    pub frac_labels: f64,
    /// A branch is an And when a uniform draw is above this, an Or otherwise.
    pub frac_and: f64,
    /// Standard deviation of generated metric values, as a fraction of the metric's mean.
    pub frac_variance: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            count: 100,
            max_height: 3,
            frac_labels: 0.5,
            frac_and: 0.5,
            frac_variance: 0.5,
            seed: 1,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [("frac_labels", self.frac_labels), ("frac_and", self.frac_and)] {
            if !(0.0..=1.0).contains(&value) {
                Err(InvalidConfig(format!(
                    "{name} must be between 0 and 1, got {value}"
                )))?;
            }
        }

        if !self.frac_variance.is_finite() || self.frac_variance < 0.0 {
            Err(InvalidConfig(format!(
                "frac_variance must be zero or more, got {}",
                self.frac_variance
            )))?;
        }

        Ok(())
    }
}

pub trait ConfigProvider {
    fn get(&self) -> Result<Config, Error>;
}

/// Reads the config from a JSON file. A missing file means defaults, a broken one is an error.
pub struct FileProvider {
    file_path: PathBuf,
}

impl FileProvider {
    pub fn new(path: &Path) -> FileProvider {
        FileProvider {
            file_path: path.to_path_buf(),
        }
    }
}

impl ConfigProvider for FileProvider {
    fn get(&self) -> Result<Config, Error> {
        if !self.file_path.exists() {
            info!("No config file at {:?}, using defaults", self.file_path);

            return Ok(Config::default());
        }

        info!("Reading config from file: {:?}", self.file_path);

        let config: Config = serde_json::from_str(&fs::read_to_string(&self.file_path)?)?;
        config.generator.validate()?;

        Ok(config)
    }
}

/// Reads the config at `path`, or at the default location if no path is given.
pub fn read(path: Option<&Path>) -> Result<Config, Error> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                warn!("HOME is not set, using the default config");

                return Ok(Config::default());
            }
        },
    };

    FileProvider::new(&path).get()
}
