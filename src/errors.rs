use crate::models::WindowHandle;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WmError>;

#[derive(Debug, Error)]
pub enum WmError {
    /// An operation referenced a window id that is not managed. Recovered as
    /// a no-op by every handler.
    #[error("not-found: window {0} is not managed")]
    NotFound(WindowHandle),
    /// A window was adopted twice.
    #[error("already-managed: window {0} is already managed")]
    AlreadyManaged(WindowHandle),
    /// A command line did not parse. The connection stays open.
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    /// Socket bind/listen failure at startup. Fatal.
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
    /// The protocol session could not be established. Fatal.
    #[error("protocol connect failure: {0}")]
    ProtocolConnect(String),
    #[error("parsing error: {0}")]
    SerdeParse(#[from] serde_json::Error),
    #[error("config parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("XDG error: {0}")]
    XdgBaseDir(#[from] xdg::BaseDirectoriesError),
}

impl WmError {
    /// Short reason string used in `ERR <reason>` acknowledgments.
    #[must_use]
    pub fn ack_reason(&self) -> String {
        match self {
            Self::NotFound(_) => "not-found".to_string(),
            Self::AlreadyManaged(_) => "already-managed".to_string(),
            Self::MalformedCommand(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}
