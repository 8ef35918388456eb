use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown category '{category}' (not in the training vocabulary)")]
    UnknownCategory { category: String },

    #[error("Division by zero: {what} is zero")]
    DivisionByZero { what: &'static str },

    #[error("Underdetermined fit: {rows} rows, at least {required} required")]
    UnderdeterminedFit { rows: usize, required: usize },

    #[error("Dataset contains no product records")]
    EmptyDataset,

    #[error("Feature mismatch: model expects {expected:?}, got {actual:?}")]
    FeatureMismatch { expected: Vec<String>, actual: Vec<String> },

    #[error("Demand model produced a non-finite prediction ({value})")]
    NonFinitePrediction { value: f64 },

    #[error("Product '{name}' not found")]
    ProductNotFound { name: String },

    #[error("Price {price} outside allowed range [{min}, {max}]")]
    PriceOutOfRange { price: f64, min: f64, max: f64 },

    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("Least-squares solve failed: {0}")]
    Solve(String),
}

pub type SimResult<T> = Result<T, SimError>;
