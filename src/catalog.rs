//! The named-color dataset behind recommendations.
//!
//! The source is a semicolon-separated table whose header names the columns
//! `Mood;Tema;Suasana;Kontras;Nama Warna;Kode Warna` (any order, extra
//! columns ignored). It is read once at startup; after that the [`Catalog`]
//! is never modified.

use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PaletteError, Result};

const COL_MOOD: &str = "Mood";
const COL_THEME: &str = "Tema";
const COL_SUASANA: &str = "Suasana";
const COL_CONTRAST: &str = "Kontras";
const COL_NAME: &str = "Nama Warna";
const COL_CODE: &str = "Kode Warna";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub name: String,
    pub code: String,
    pub mood: String,
    pub theme: String,
    /// Atmosphere.
    pub suasana: String,
    pub contrast: String,
}

impl CatalogRow {
    /// Mood, theme, atmosphere and contrast joined by spaces.
    pub fn descriptor(&self) -> String {
        [
            self.mood.as_str(),
            self.theme.as_str(),
            self.suasana.as_str(),
            self.contrast.as_str(),
        ]
        .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
}

struct Columns {
    mood: usize,
    theme: usize,
    suasana: usize,
    contrast: usize,
    name: usize,
    code: usize,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |wanted: &str| {
            header
                .iter()
                .position(|h| h == wanted)
                .ok_or_else(|| PaletteError::CatalogLoad(format!("missing column `{wanted}`")))
        };
        Ok(Self {
            mood: find(COL_MOOD)?,
            theme: find(COL_THEME)?,
            suasana: find(COL_SUASANA)?,
            contrast: find(COL_CONTRAST)?,
            name: find(COL_NAME)?,
            code: find(COL_CODE)?,
        })
    }

    fn widest(&self) -> usize {
        [self.mood, self.theme, self.suasana, self.contrast, self.name, self.code]
            .into_iter()
            .max()
            .unwrap_or(0)
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(';')
        .map(|field| {
            let field = field.trim();
            field
                .strip_prefix('"')
                .and_then(|f| f.strip_suffix('"'))
                .unwrap_or(field)
                .trim()
                .to_owned()
        })
        .collect()
}

impl Catalog {
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| PaletteError::CatalogLoad(format!("{}: {e}", path.display())))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut columns: Option<Columns> = None;
        let mut rows = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| PaletteError::CatalogLoad(e.to_string()))?;
            let line = line.trim_start_matches('\u{feff}');
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(line);

            let Some(cols) = &columns else {
                columns = Some(Columns::from_header(&fields)?);
                continue;
            };
            if fields.len() <= cols.widest() {
                return Err(PaletteError::CatalogLoad(format!(
                    "line {}: expected at least {} fields, found {}",
                    idx + 1,
                    cols.widest() + 1,
                    fields.len()
                )));
            }
            rows.push(CatalogRow {
                name: fields[cols.name].clone(),
                code: fields[cols.code].clone(),
                mood: fields[cols.mood].clone(),
                theme: fields[cols.theme].clone(),
                suasana: fields[cols.suasana].clone(),
                contrast: fields[cols.contrast].clone(),
            });
        }

        if columns.is_none() {
            return Err(PaletteError::CatalogLoad("catalog has no header".into()));
        }
        if rows.is_empty() {
            return Err(PaletteError::CatalogLoad("catalog has no rows".into()));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}Mood;Tema;Suasana;Kontras;Nama Warna;Kode Warna\n\
        Ceria;Pantai;Santai;Tinggi;Kuning Cerah;#FFD700\n\
        \n\
        Tenang;\"Laut\";Damai;Rendah;Biru Muda;#87CEEB\n";

    #[test]
    fn parses_rows_in_file_order() {
        let catalog = Catalog::parse(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let first = &catalog.rows()[0];
        assert_eq!(first.name, "Kuning Cerah");
        assert_eq!(first.code, "#FFD700");
        assert_eq!(first.descriptor(), "Ceria Pantai Santai Tinggi");
        assert_eq!(catalog.rows()[1].theme, "Laut");
    }

    #[test]
    fn column_order_is_taken_from_header() {
        let text = "Kode Warna;Nama Warna;Extra;Kontras;Suasana;Tema;Mood\n#000000;Hitam;x;Tinggi;Misterius;Malam;Serius\n";
        let catalog = Catalog::parse(text).unwrap();
        let row = &catalog.rows()[0];
        assert_eq!(row.name, "Hitam");
        assert_eq!(row.mood, "Serius");
        assert_eq!(row.descriptor(), "Serius Malam Misterius Tinggi");
    }

    #[test]
    fn missing_column_is_fatal() {
        let text = "Mood;Tema;Suasana;Nama Warna;Kode Warna\nCeria;Pantai;Santai;Kuning;#FFFF00\n";
        let err = Catalog::parse(text).unwrap_err();
        assert_eq!(err, PaletteError::CatalogLoad("missing column `Kontras`".into()));
    }

    #[test]
    fn short_rows_are_fatal() {
        let text = "Mood;Tema;Suasana;Kontras;Nama Warna;Kode Warna\nCeria;Pantai\n";
        assert!(matches!(Catalog::parse(text), Err(PaletteError::CatalogLoad(_))));
    }

    #[test]
    fn empty_sources_are_fatal() {
        assert!(Catalog::parse("").is_err());
        assert!(Catalog::parse("Mood;Tema;Suasana;Kontras;Nama Warna;Kode Warna\n").is_err());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = Catalog::from_path(Path::new("/nonexistent/colors.csv")).unwrap_err();
        assert!(matches!(err, PaletteError::CatalogLoad(_)));
    }
}
