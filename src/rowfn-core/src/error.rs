use std::error::Error as StdError;
use std::fmt;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bridge operations
#[derive(Debug)]
pub enum Error {
    /// The compiled code and the analyzed plan disagree; the query cannot continue
    Internal(InternalError),

    /// Failure reported by the dictionary proxy, passed through untouched
    Dictionary(rowfn_dict::Error),
}

/// Internal-consistency violations between a runtime call and the analyzed plan
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    /// The suffix delimiter sits at the start of the name
    #[error("function name '{name}' is empty before its '__' suffix")]
    EmptyFunctionName {
        /// Name as invoked
        name: String,
    },

    /// No analyzed call site carries the invoked name
    #[error("no analyzed call site matches function '{name}' (key '{name_key}')")]
    NoMatchingCallSite {
        /// Name as invoked
        name: String,
        /// Canonical key searched for
        name_key: String,
    },

    /// The argument index is past the matched call's arity
    #[error("argument {arg_index} is out of range for '{function}' with {arity} arguments")]
    ArgumentOutOfRange {
        /// Declared name of the matched call site
        function: String,
        /// Requested argument
        arg_index: usize,
        /// Declared arity
        arity: usize,
    },

    /// The argument's type carries no dictionary
    #[error("argument {arg_index} of '{function}' has type {found}, expected dictionary-encoded text")]
    NotDictionaryEncoded {
        /// Declared name of the matched call site
        function: String,
        /// Requested argument
        arg_index: usize,
        /// Type found at that position
        found: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Internal(e) => write!(f, "Internal error: {e}"),
            Error::Dictionary(e) => write!(f, "{e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Internal(e) => Some(e),
            Error::Dictionary(e) => e.source(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(e: InternalError) -> Self {
        Error::Internal(e)
    }
}

impl From<rowfn_dict::Error> for Error {
    fn from(e: rowfn_dict::Error) -> Self {
        Error::Dictionary(e)
    }
}

impl Error {
    /// Whether this is an internal-consistency violation
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }

    /// The dictionary failure, if this error came from a proxy
    pub fn as_dictionary_error(&self) -> Option<&rowfn_dict::Error> {
        match self {
            Error::Dictionary(e) => Some(e),
            _ => None,
        }
    }
}
