use std::io::{Error, Write};
use tempfile::NamedTempFile;

/// Writes an accounts CSV with the given `(id, balance)` rows.
pub fn accounts_csv(rows: &[(u16, &str)]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "account, first_name, last_name, credit_rating, balance")?;
    for (id, balance) in rows {
        writeln!(file, "{id}, First{id}, Last{id}, 700, {balance}")?;
    }
    file.flush()?;
    Ok(file)
}

/// Writes a transfers CSV with the given `(from, to, amount)` rows.
pub fn transfers_csv(rows: &[(u16, u16, &str)]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "from, to, amount")?;
    for (from, to, amount) in rows {
        writeln!(file, "{from}, {to}, {amount}")?;
    }
    file.flush()?;
    Ok(file)
}
