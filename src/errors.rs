/// Custom error type for the powerlaws crate.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Too few shared support points survive the percentile cutoff to compare two datasets.
    InsufficientOverlap {
        /// Size of the shared support before the cutoff.
        shared: usize,
        /// Points left after the cutoff.
        retained: usize,
    },
    /// Log-log regression had fewer than two distinct x values or a non-finite result.
    DegenerateFit,
    /// Maximum likelihood parameters are undefined for the values provided.
    InvalidMleInput,
    /// Dataset holds no values.
    EmptyDataset,
    /// Dataset holds values that are not positive and finite.
    InvalidData,
    /// Configuration value out of range, named by the field.
    InvalidParameter(&'static str),
    /// Column header not found in the csv file.
    MissingColumn(String),
    /// Rank requested for a value the dataset does not contain.
    NotInSupport(f64),
    /// Every trial of a run failed, nothing to summarize.
    NoTrials,
    /// Error type from csv crate.
    CsvError,
    /// Error type from std::io.
    IoError,
}

impl std::error::Error for FitError {}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FitError::InsufficientOverlap { shared, retained } => write!(
                f,
                "Shared support of {} points leaves {} after the cutoff, need at least 2.",
                shared, retained
            ),
            FitError::DegenerateFit => write!(f, "Log-log regression is undefined for these points."),
            FitError::InvalidMleInput => write!(
                f,
                "Maximum likelihood parameters are undefined for the values provided."
            ),
            FitError::EmptyDataset => write!(f, "Dataset is empty."),
            FitError::InvalidData => write!(f, "Dataset must contain only positive, finite values."),
            FitError::InvalidParameter(name) => write!(f, "Parameter `{}` is out of range.", name),
            FitError::MissingColumn(name) => write!(f, "Column `{}` not found in csv header.", name),
            FitError::NotInSupport(x) => write!(f, "Value {} is not present in the dataset.", x),
            FitError::NoTrials => write!(f, "No trials completed successfully."),
            FitError::CsvError => write!(f, "Could not serialize/deserialize csv file."),
            FitError::IoError => write!(f, "Could not read file from path provided."),
        }
    }
}

impl From<csv::Error> for FitError {
    fn from(_: csv::Error) -> Self {
        FitError::CsvError
    }
}

impl From<std::io::Error> for FitError {
    fn from(_: std::io::Error) -> Self {
        FitError::IoError
    }
}

impl From<std::num::ParseFloatError> for FitError {
    fn from(_: std::num::ParseFloatError) -> Self {
        FitError::InvalidData
    }
}
