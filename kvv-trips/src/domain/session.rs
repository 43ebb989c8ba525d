//! Provider session identifiers.

/// The pair of identifiers the provider issues to continue a search
/// conversation across requests.
///
/// A session is either default (both identifiers empty, no request made
/// yet) or carries both identifiers. A new value replaces the old one
/// whenever the provider hands out fresh identifiers.
///
/// # Examples
///
/// ```
/// use kvv_trips::domain::Session;
///
/// assert!(Session::default().is_default());
///
/// let session = Session::new("KVV_123", "4");
/// assert!(!session.is_default());
/// assert_eq!(session.session_id(), "KVV_123");
/// assert_eq!(session.request_id(), "4");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Session {
    session_id: String,
    request_id: String,
}

impl Session {
    /// Create a session from provider-issued identifiers.
    pub fn new(session_id: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            request_id: request_id.into(),
        }
    }

    /// Returns the session identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// True when no identifiers have been issued yet.
    pub fn is_default(&self) -> bool {
        self.session_id.is_empty() && self.request_id.is_empty()
    }
}
