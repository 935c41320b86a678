use crate::error::Error;
use crate::query::Statement;
use log::{debug, info};
use std::io::Write;

/// Writes one JSON statement per line and returns how many lines were written.
pub fn emit<W, I>(writer: &mut W, statements: I) -> Result<usize, Error>
where
    W: Write,
    I: IntoIterator<Item = Statement>,
{
    let mut written = 0;

    for statement in statements {
        serde_json::to_writer(&mut *writer, &statement)?;
        writeln!(writer)?;

        debug!("Emitted {}", statement.select().name);
        written += 1;
    }

    writer.flush()?;
    info!("Emitted {written} statements");

    Ok(written)
}
