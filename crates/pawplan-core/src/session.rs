//! Explicit session context.
//!
//! The store never reads ambient authentication state: every operation
//! takes a `&Session`, and the session is built from whatever identity the
//! embedding application resolved. An unauthenticated session makes reads
//! fail closed (empty results) and writes reject.

use crate::model::id::OwnerId;

/// The identity resolved by the external provider for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: OwnerId,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: OwnerId::new(id),
            display_name: None,
            email: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Seam for the external identity collaborator.
///
/// The core only ever asks for the current identity; credential handling
/// and the change stream stay in the embedding application.
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

/// Per-call context carried through every store operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    #[must_use]
    pub const fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Snapshot the provider's current identity into a session value.
    pub fn from_provider<P: IdentityProvider + ?Sized>(provider: &P) -> Self {
        Self {
            identity: provider.current_identity(),
        }
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{Identity, IdentityProvider, Session};

    struct FixedProvider(Option<Identity>);

    impl IdentityProvider for FixedProvider {
        fn current_identity(&self) -> Option<Identity> {
            self.0.clone()
        }
    }

    #[test]
    fn session_snapshots_the_provider() {
        let identity = Identity::new("uid-1").with_email("a@example.com");
        let session = Session::from_provider(&FixedProvider(Some(identity.clone())));
        assert_eq!(session.identity(), Some(&identity));

        let signed_out = Session::from_provider(&FixedProvider(None));
        assert_eq!(signed_out.identity(), None);
        assert_eq!(signed_out, Session::anonymous());
    }
}
