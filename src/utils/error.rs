use thiserror::Error;

#[derive(Error, Debug)]
pub enum AidError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("<aid-group category=\"{category}\"> closed without any <aid> entries")]
    EmptyGroup { category: String },

    #[error("Malformed binary record: {message}")]
    Wire { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Wire,
    Validation,
    Configuration,
    System,
}

impl AidError {
    pub fn wire(message: impl Into<String>) -> Self {
        AidError::Wire {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AidError::Xml(_) | AidError::XmlAttr(_) | AidError::EmptyGroup { .. } => {
                ErrorCategory::Parse
            }
            AidError::Wire { .. } => ErrorCategory::Wire,
            AidError::Validation { .. } => ErrorCategory::Validation,
            AidError::Config { .. } => ErrorCategory::Configuration,
            AidError::Io(_) | AidError::Serialization(_) => ErrorCategory::System,
        }
    }

    /// CLI 使用的結束代碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation => 1,
            ErrorCategory::Parse | ErrorCategory::Wire => 2,
            ErrorCategory::Configuration => 3,
            ErrorCategory::System => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, AidError>;
