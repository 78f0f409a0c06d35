//! CSV Data Loader Module
//! Handles incident CSV loading and schema validation using Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "iyear",
    "targtype1_txt",
    "attacktype1_txt",
    "nkill",
    "nwound",
];

/// Optional column backing the perpetrator-group rankings.
pub const GROUP_COLUMN: &str = "gname";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Handles incident CSV loading with Polars.
pub struct DatasetLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load an incident CSV using Polars and validate the required columns.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(PathBuf::from(file_path));

        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        for required in REQUIRED_COLUMNS {
            if df.column(required).is_err() {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }
        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the loaded frame carries a column (used for optional columns).
    pub fn has_column(&self, name: &str) -> bool {
        self.df
            .as_ref()
            .map(|df| df.column(name).is_ok())
            .unwrap_or(false)
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_csv() {
        let file = write_csv(
            "iyear,targtype1_txt,attacktype1_txt,nkill,nwound\n\
             2001,Police,Bombing/Explosion,1,2\n\
             2002,Military,Armed Assault,0,\n",
        );

        let mut loader = DatasetLoader::new();
        let df = loader.load_csv(file.path().to_str().unwrap()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(loader.get_row_count(), 2);
        assert!(loader.get_columns().contains(&"nkill".to_string()));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let file = write_csv("iyear,targtype1_txt,nkill,nwound\n2001,Police,1,2\n");

        let mut loader = DatasetLoader::new();
        let err = loader.load_csv(file.path().to_str().unwrap()).unwrap_err();
        match err {
            LoaderError::MissingColumn(name) => assert_eq!(name, "attacktype1_txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let mut loader = DatasetLoader::new();
        let err = loader.load_csv("/nonexistent/incidents.csv").unwrap_err();
        assert!(matches!(err, LoaderError::CsvError(_)));
    }

    #[test]
    fn test_optional_group_column_probe() {
        let file = write_csv(
            "iyear,targtype1_txt,attacktype1_txt,nkill,nwound,gname\n\
             2001,Police,Bombing/Explosion,1,2,Some Group\n",
        );

        let mut loader = DatasetLoader::new();
        loader.load_csv(file.path().to_str().unwrap()).unwrap();
        assert!(loader.has_column(GROUP_COLUMN));
        assert!(!loader.has_column("country_txt"));
    }
}
