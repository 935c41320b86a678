use crate::config::GeneratorConfig;
use crate::error::{Error, ErrorKind};
use crate::query::{Comparison, Condition, Conditions, Predicate, Select, Statement};
use crate::workload::Metadata;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub const GENERATED_SELECT: &str = "generated_select";
pub const GENERATED_PREDICATE: &str = "generated_predicate";

/// Builds random statements whose leaves only use labels and metrics from a workload.
///
/// The same metadata, settings and seed always produce the same statements.
pub struct RandomGenerator<'a> {
    metadata: &'a Metadata,
    settings: GeneratorConfig,
    rng: StdRng,
}

impl<'a> RandomGenerator<'a> {
    pub fn new(metadata: &'a Metadata, settings: GeneratorConfig) -> Result<Self, Error> {
        settings.validate()?;

        let rng = StdRng::seed_from_u64(settings.seed);

        Ok(RandomGenerator {
            metadata,
            settings,
            rng,
        })
    }

    pub fn generate(&mut self) -> Result<Statement, Error> {
        let condition = self.condition(self.settings.max_height)?;
        debug!("Generated {condition}");

        Ok(Select::new(GENERATED_SELECT, Predicate::new(GENERATED_PREDICATE, condition)).into())
    }

    /// As many statements as the settings ask for.
    pub fn generate_all(&mut self) -> Result<Vec<Statement>, Error> {
        info!("Generating {} statements", self.settings.count);

        (0..self.settings.count).map(|_| self.generate()).collect()
    }

    fn condition(&mut self, height: usize) -> Result<Conditions, Error> {
        if height == 0 {
            let leaf = if self.rng.gen::<f64>() > self.settings.frac_labels {
                self.label_leaf()?
            } else {
                self.metric_leaf()?
            };

            return Ok(leaf.into());
        }

        let is_and = self.rng.gen::<f64>() > self.settings.frac_and;
        let left = self.condition(height - 1)?;
        let right = self.condition(height - 1)?;

        Ok(if is_and {
            Conditions::and(left, right)
        } else {
            Conditions::or(left, right)
        })
    }

    fn label_leaf(&mut self) -> Result<Condition, Error> {
        let metadata = self.metadata;

        let (key, values) = metadata
            .labels
            .iter()
            .choose(&mut self.rng)
            .ok_or(ErrorKind::EmptyMetadata("label"))?;
        let value = values
            .iter()
            .choose(&mut self.rng)
            .ok_or(ErrorKind::EmptyMetadata("label"))?;

        Ok(Condition::label(key.as_str(), value.as_str()))
    }

    fn metric_leaf(&mut self) -> Result<Condition, Error> {
        let metadata = self.metadata;

        let (variable, mean) = metadata
            .metrics
            .iter()
            .choose(&mut self.rng)
            .ok_or(ErrorKind::EmptyMetadata("metric"))?;

        if !mean.is_finite() {
            Err(ErrorKind::NonFiniteMetric(variable.clone()))?;
        }

        let deviation = (mean * self.settings.frac_variance).abs();
        let normal = Normal::new(*mean, deviation)
            .map_err(|_| ErrorKind::NonFiniteMetric(variable.clone()))?;
        let value = truncate_to_thousandths(normal.sample(&mut self.rng));
        if !value.is_finite() {
            Err(ErrorKind::NonFiniteMetric(variable.clone()))?;
        }

        let op = Comparison::ALL[self.rng.gen_range(0..Comparison::ALL.len())];

        Ok(Condition::metric(variable.as_str(), op, value))
    }
}

/// Drops everything past the third decimal, toward zero.
fn truncate_to_thousandths(value: f64) -> f64 {
    let scaled = value * 1000.0;

    // too large to have decimals left anyway
    if scaled.is_finite() {
        scaled.trunc() / 1000.0
    } else {
        value
    }
}
