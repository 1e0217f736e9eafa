use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// No mapping cleared the fuzzy threshold for this identifier.
    /// Recoverable: the lookup path degrades to an unscored default; this
    /// error only surfaces through the strict `require_identity` variant.
    #[error("no identity mapping for '{0}'")]
    UnresolvedIdentity(String),
}
