//! Canonical column layout of the CKD dataset

/// Column names assigned positionally to every uploaded table, label last
pub const CANONICAL_COLUMNS: [&str; 25] = [
    "age", "bp", "sg", "al", "su", "rbc", "pc", "pcc", "ba", "bgr", "bu", "sc", "sod", "pot",
    "hemo", "pcv", "wc", "rc", "htn", "dm", "cad", "appet", "pe", "ane", "classification",
];

/// Target column
pub const LABEL_COLUMN: &str = "classification";

/// Identifier column dropped before renaming
pub const ID_COLUMN: &str = "id";

/// Columns that arrive as text in the public dataset and are coerced to numbers
pub const COERCED_COLUMNS: [&str; 3] = ["pcv", "wc", "rc"];

/// Cell texts read as missing in every column, besides empty fields
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Number of feature columns (everything except the label)
pub const N_FEATURES: usize = CANONICAL_COLUMNS.len() - 1;

/// Whether a raw header names the identifier column
pub fn is_id_column(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(ID_COLUMN)
}
