use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::num;

pub type Result<T> = std::result::Result<T, RegTreeError>;

/// The three failure classes callers have to distinguish.
///
/// Training errors abort a fit and leave any previous tree untouched,
/// persistence errors never yield a partially decoded tree, and invalid
/// answers are local to one prediction session which stays resumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TrainingData,
    Persistence,
    InvalidAnswer,
}

#[derive(Debug)]
pub enum RegTreeError {
    TrainingData(String),
    InvalidAnswer { answer: i64, children: usize },
    SessionFinished,
    CorruptModel(String),
    IO(io::Error),
    ParseFloat(num::ParseFloatError),
    SerdeJson(serde_json::Error),
}

impl RegTreeError {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            RegTreeError::TrainingData(_) | RegTreeError::ParseFloat(_) => ErrorKind::TrainingData,
            RegTreeError::InvalidAnswer { .. } | RegTreeError::SessionFinished => {
                ErrorKind::InvalidAnswer
            }
            RegTreeError::CorruptModel(_) | RegTreeError::IO(_) | RegTreeError::SerdeJson(_) => {
                ErrorKind::Persistence
            }
        }
    }
}

impl From<&str> for RegTreeError {
    fn from(err: &str) -> RegTreeError {
        RegTreeError::TrainingData(err.to_string())
    }
}

impl From<serde_json::Error> for RegTreeError {
    fn from(err: serde_json::Error) -> RegTreeError {
        RegTreeError::SerdeJson(err)
    }
}

impl From<num::ParseFloatError> for RegTreeError {
    fn from(err: num::ParseFloatError) -> RegTreeError {
        RegTreeError::ParseFloat(err)
    }
}

impl From<io::Error> for RegTreeError {
    fn from(err: io::Error) -> RegTreeError {
        RegTreeError::IO(err)
    }
}

impl Display for RegTreeError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match *self {
            RegTreeError::TrainingData(ref msg) => write!(f, "Training data error: {}", msg),
            RegTreeError::InvalidAnswer { children, .. } => write!(
                f,
                "The answer should be an integer between 0 and {}!",
                children.saturating_sub(1)
            ),
            RegTreeError::SessionFinished => write!(f, "Prediction session is not awaiting an answer"),
            RegTreeError::CorruptModel(ref msg) => write!(f, "Corrupt model: {}", msg),
            RegTreeError::IO(ref e) => write!(f, "IO error: {}", e),
            RegTreeError::ParseFloat(ref e) => write!(f, "ParseFloat error: {}", e),
            RegTreeError::SerdeJson(ref e) => write!(f, "SerdeJson error: {}", e),
        }
    }
}

impl Error for RegTreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            RegTreeError::TrainingData(_) => None,
            RegTreeError::InvalidAnswer { .. } => None,
            RegTreeError::SessionFinished => None,
            RegTreeError::CorruptModel(_) => None,
            RegTreeError::IO(ref e) => Some(e),
            RegTreeError::ParseFloat(ref e) => Some(e),
            RegTreeError::SerdeJson(ref e) => Some(e),
        }
    }
}
