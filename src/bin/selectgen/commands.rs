use crate::args::GenerateParams;
use log::info;
use select_gen::config::Config;
use select_gen::generator::{samples, RandomGenerator};
use select_gen::output::emit;
use select_gen::query::read_statements;
use select_gen::workload::Metadata;
use select_gen::{statement_to_dnf, Error};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

pub fn sample(config: &Config, count: Option<usize>) -> Result<(), Error> {
    let bound = count.unwrap_or(config.sample.count);

    emit(&mut BufWriter::new(io::stdout().lock()), samples(bound))?;

    Ok(())
}

pub fn metadata(workload: &Path) -> Result<(), Error> {
    let metadata = Metadata::from_path(workload)?;

    println!("{}", metadata.render()?);

    Ok(())
}

pub fn generate(config: &Config, params: &GenerateParams) -> Result<(), Error> {
    let settings = params.apply(config.generator.clone());
    let metadata = Metadata::from_path(&params.workload)?;

    let statements = RandomGenerator::new(&metadata, settings)?.generate_all()?;

    emit(&mut BufWriter::new(io::stdout().lock()), statements)?;

    Ok(())
}

pub fn dnf(input: Option<&Path>) -> Result<(), Error> {
    let statements = match input {
        Some(path) => {
            info!("Reading statements from file: {:?}", path);
            read_statements(BufReader::new(File::open(path)?))?
        }
        None => read_statements(io::stdin().lock())?,
    };

    emit(
        &mut BufWriter::new(io::stdout().lock()),
        statements.into_iter().map(statement_to_dnf),
    )?;

    Ok(())
}
