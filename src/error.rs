use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FolioError>;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Git command failed in {path}: {message}")]
    GitCommand { path: PathBuf, message: String },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Image error in {path}: {message}")]
    Image { path: PathBuf, message: String },
    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::open::Error> for FolioError {
    fn from(err: gix::open::Error) -> Self {
        FolioError::Git(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for FolioError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        FolioError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for FolioError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        FolioError::HeadPeel(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for FolioError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        FolioError::RefFind(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for FolioError {
    fn from(err: gix::objs::decode::Error) -> Self {
        FolioError::ObjectDecode(Box::new(err))
    }
}
