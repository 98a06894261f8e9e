use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::domain::RawPurchaseItem;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to open purchase list: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse purchase list: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    name: String,
    cost: String,
}

/// Read `name,cost` rows into unvalidated items. Values are trimmed but otherwise passed
/// through untouched so the validator reports bad costs against their item index.
pub fn items_from_csv<R: Read>(reader: R) -> Result<Vec<RawPurchaseItem>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut items = Vec::new();

    for record in csv_reader.deserialize::<ItemRow>() {
        let row = record?;
        items.push(RawPurchaseItem::new(
            Value::String(row.name),
            Value::String(row.cost),
        ));
    }

    Ok(items)
}

pub fn items_from_csv_path(path: impl AsRef<Path>) -> Result<Vec<RawPurchaseItem>, ImportError> {
    let file = File::open(path)?;
    items_from_csv(file)
}
