//! Instrument catalog reader.
//!
//! The exchange publishes its bond list as a semicolon-delimited file. Only
//! rows of the configured category with a symbol and a maturity are kept;
//! anything else is skipped without error.

use super::provider::DataError;
use crate::domain::Instrument;
use std::io::Read;
use std::path::Path;

/// Category literal used by the exchange for government bonds.
pub const GOVERNMENT_BOND_CATEGORY: &str = "Titluri de stat";

const SYMBOL_HEADERS: [&str; 2] = ["Simbol", "Symbol"];
const TYPE_HEADERS: [&str; 2] = ["Tip", "Type"];
const MATURITY_HEADERS: [&str; 2] = ["Data maturitate", "Maturity date"];

/// Read the catalog file at `path`, keeping rows whose type equals `category`.
pub fn read_catalog(path: &Path, category: &str) -> Result<Vec<Instrument>, DataError> {
    if !path.exists() {
        return Err(DataError::CatalogUnavailable {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| {
        DataError::CatalogMalformed(format!("open {}: {e}", path.display()))
    })?;
    let instruments = parse_catalog(file, category)?;
    tracing::debug!(path = %path.display(), count = instruments.len(), "catalog loaded");
    Ok(instruments)
}

/// Parse catalog rows from any reader.
pub fn parse_catalog<R: Read>(reader: R, category: &str) -> Result<Vec<Instrument>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DataError::CatalogMalformed(format!("header row: {e}")))?
        .clone();

    let symbol_idx = column_index(&headers, &SYMBOL_HEADERS);
    let type_idx = column_index(&headers, &TYPE_HEADERS);
    let maturity_idx = column_index(&headers, &MATURITY_HEADERS);

    let (Some(symbol_idx), Some(type_idx), Some(maturity_idx)) =
        (symbol_idx, type_idx, maturity_idx)
    else {
        tracing::warn!(
            headers = ?headers.iter().collect::<Vec<_>>(),
            "catalog is missing symbol/type/maturity columns; no instruments read"
        );
        return Ok(Vec::new());
    };

    let mut instruments = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record
            .map_err(|e| DataError::CatalogMalformed(format!("row {}: {e}", line + 2)))?;

        let field = |idx: usize| record.get(idx).map(str::trim).filter(|s| !s.is_empty());

        let (Some(code), Some(kind), Some(maturity)) =
            (field(symbol_idx), field(type_idx), field(maturity_idx))
        else {
            continue;
        };
        if kind != category {
            continue;
        }
        instruments.push(Instrument::new(code, maturity));
    }

    Ok(instruments)
}

fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim_start_matches('\u{feff}').trim();
        names.iter().any(|n| h == *n)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}Simbol;Denumire;Tip;Data maturitate;Moneda\n\
        R2506A;Titluri 2025;Titluri de stat;01.06.2025;RON\n\
        R2812AE;Titluri 2028 EUR;Titluri de stat;15.12.2028;EUR\n\
        BNET25;Corporate;Obligatiuni corporative;10.10.2025;RON\n\
        ;Missing symbol;Titluri de stat;01.01.2030;RON\n\
        R2701A;No maturity;Titluri de stat;;RON\n";

    #[test]
    fn keeps_only_government_bonds_with_all_fields() {
        let got = parse_catalog(SAMPLE.as_bytes(), GOVERNMENT_BOND_CATEGORY).unwrap();
        assert_eq!(
            got,
            vec![
                Instrument::new("R2506A", "01.06.2025"),
                Instrument::new("R2812AE", "15.12.2028"),
            ]
        );
    }

    #[test]
    fn english_headers_are_accepted() {
        let csv = "Symbol;Type;Maturity date\nX1;Titluri de stat;01.06.2025\n";
        let got = parse_catalog(csv.as_bytes(), GOVERNMENT_BOND_CATEGORY).unwrap();
        assert_eq!(got, vec![Instrument::new("X1", "01.06.2025")]);
    }

    #[test]
    fn values_are_trimmed() {
        let csv = "Simbol;Tip;Data maturitate\n  X1 ; Titluri de stat ; 01.06.2025 \n";
        let got = parse_catalog(csv.as_bytes(), GOVERNMENT_BOND_CATEGORY).unwrap();
        assert_eq!(got, vec![Instrument::new("X1", "01.06.2025")]);
    }

    #[test]
    fn short_rows_are_skipped() {
        let csv = "Simbol;Tip;Data maturitate\nX1;Titluri de stat\nX2;Titluri de stat;01.01.2027\n";
        let got = parse_catalog(csv.as_bytes(), GOVERNMENT_BOND_CATEGORY).unwrap();
        assert_eq!(got, vec![Instrument::new("X2", "01.01.2027")]);
    }

    #[test]
    fn missing_columns_yield_empty_catalog() {
        let csv = "Code;Kind\nX1;Titluri de stat\n";
        let got = parse_catalog(csv.as_bytes(), GOVERNMENT_BOND_CATEGORY).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "Simbol;Tip;Data maturitate\n";
        assert!(parse_catalog(csv.as_bytes(), GOVERNMENT_BOND_CATEGORY)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_file_is_catalog_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bonds_list.csv");
        match read_catalog(&path, GOVERNMENT_BOND_CATEGORY) {
            Err(DataError::CatalogUnavailable { path: p }) => assert_eq!(p, path),
            other => panic!("expected CatalogUnavailable, got {other:?}"),
        }
    }
}
