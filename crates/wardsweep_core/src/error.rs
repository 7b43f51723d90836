use std::fmt;

/// Errors raised while loading the sweep table.
///
/// Loading is the only fatal stage of the pipeline; everything downstream
/// degrades locally instead of failing.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// The file ended inside the fixed-size metadata preamble.
    TruncatedPreamble {
        lines_found: usize,
        lines_expected: usize,
    },
    /// The preamble was present but no header row followed it.
    MissingHeader,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read sweep table: {e}"),
            LoadError::Csv(e) => write!(f, "failed to parse sweep table: {e}"),
            LoadError::TruncatedPreamble {
                lines_found,
                lines_expected,
            } => {
                write!(
                    f,
                    "sweep table ended inside the metadata preamble \
                     ({lines_found} of {lines_expected} lines present)"
                )
            }
            LoadError::MissingHeader => {
                write!(f, "sweep table has no header row after the preamble")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e)
    }
}
