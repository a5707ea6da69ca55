use std::fmt;

#[derive(Debug)]
pub enum VinylError {
    Config(ConfigError),
    Load(LoadError),
    /// A host binding call (Web Audio, DOM, Telegram) raised an exception.
    Host(String),
    /// The disk element is not present in the document at mount time.
    MissingElement(String),
}

#[derive(Debug)]
pub enum LoadError {
    Network(String),
    Status { url: String, status: u16 },
    Decode(String),
}

#[derive(Debug)]
pub enum ConfigError {
    OutOfRange { field: &'static str, value: f64 },
    Empty { field: &'static str },
    Invalid(String),
}

impl fmt::Display for VinylError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VinylError::Config(e) => write!(f, "Config error: {e}"),
            VinylError::Load(e) => write!(f, "Load error: {e}"),
            VinylError::Host(msg) => write!(f, "Host call failed: {msg}"),
            VinylError::MissingElement(id) => write!(f, "No element with id '{id}'"),
        }
    }
}

impl std::error::Error for VinylError {}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "Fetch failed: {msg}"),
            LoadError::Status { url, status } => write!(f, "GET {url} returned status {status}"),
            LoadError::Decode(msg) => write!(f, "Could not decode audio: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange { field, value } => write!(f, "{field} out of range: {value}"),
            ConfigError::Empty { field } => write!(f, "{field} must not be empty"),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for VinylError {
    fn from(e: ConfigError) -> Self {
        VinylError::Config(e)
    }
}

impl From<LoadError> for VinylError {
    fn from(e: LoadError) -> Self {
        VinylError::Load(e)
    }
}
