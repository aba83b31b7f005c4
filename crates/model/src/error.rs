/// Classifies a provider failure.
///
/// The relay only differentiates rate limiting, which callers may want
/// to surface distinctly; everything else (transport failures, malformed
/// responses, rejected requests) is handled the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// Any other failure.
    Other,
}
