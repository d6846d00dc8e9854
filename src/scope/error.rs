use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("No layout registered for screen type {0}")]
    NoLayout(&'static str),
    #[error("Inflater is not bound to a live scope")]
    Unbound,
}
