//! Watch-backed container shared by the domain stores
//!
//! Every value is stamped with the session epoch it was committed under.
//! A value from an older epoch reads as `T::default()`, so data fetched for
//! one identity is never shown to another.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::client::mount::ViewMount;
use crate::domain::{BearerToken, DomainError, Session};

/// A value together with the session epoch it belongs to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Committed<T> {
    pub value: T,
    pub epoch: u64,
}

/// What happened to a response when it tried to reach the store
#[derive(Debug, Clone, PartialEq)]
pub enum Commit<T> {
    Applied(T),
    /// A newer request of the same kind was issued
    Superseded,
    /// The view that asked for it is gone
    Unmounted,
    /// Login or logout happened while the request was in flight
    IdentityChanged,
}

impl<T> Commit<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            _ => None,
        }
    }
}

/// Generation counter for one kind of request
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new generation, making every earlier one stale
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_latest(&self, generation: u64) -> bool {
        self.latest.load(Ordering::Acquire) == generation
    }
}

/// Proof that an authenticated request was started, and under which identity
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    epoch: u64,
    token: BearerToken,
}

impl Ticket {
    /// Token captured when the request started
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// A store whose data belongs to one signed-in identity
pub trait IdentityScoped: Send + Sync {
    /// Drop all data and notify subscribers
    fn clear(&self);
}

pub struct SharedStore<T> {
    name: &'static str,
    state: watch::Sender<Committed<T>>,
    session: watch::Receiver<Session>,
}

impl<T> SharedStore<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    pub fn new(name: &'static str, session: watch::Receiver<Session>) -> Self {
        let epoch = session.borrow().epoch();
        let (state, _) = watch::channel(Committed {
            value: T::default(),
            epoch,
        });

        Self {
            name,
            state,
            session,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current session, as seen by this store
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Latest committed value for the current identity
    pub fn snapshot(&self) -> T {
        let current_epoch = self.session.borrow().epoch();
        let state = self.state.borrow();

        if state.epoch == current_epoch {
            state.value.clone()
        } else {
            T::default()
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Committed<T>> {
        self.state.subscribe()
    }

    /// Capture the token and identity, and issue a generation on `sequence`.
    ///
    /// Fails with [`DomainError::MissingCredential`] when signed out, before
    /// any generation is issued.
    pub fn begin(&self, sequence: &RequestSequence) -> Result<Ticket, DomainError> {
        let session = self.session();
        let token = session
            .token()
            .cloned()
            .ok_or(DomainError::MissingCredential)?;

        Ok(Ticket {
            generation: sequence.issue(),
            epoch: session.epoch(),
            token,
        })
    }

    /// Apply `apply` if the ticket is still current, the view is still
    /// mounted, and the identity has not changed
    pub fn commit<R>(
        &self,
        ticket: &Ticket,
        sequence: &RequestSequence,
        mount: &ViewMount,
        apply: impl FnOnce(&mut T) -> R,
    ) -> Commit<R> {
        if !mount.is_mounted() {
            return Commit::Unmounted;
        }

        let mut outcome = Commit::Superseded;
        let current_epoch = self.session.borrow().epoch();

        self.state.send_if_modified(|state| {
            if !sequence.is_latest(ticket.generation) {
                return false;
            }

            if current_epoch != ticket.epoch {
                outcome = Commit::IdentityChanged;
                return false;
            }

            if state.epoch != current_epoch {
                state.value = T::default();
                state.epoch = current_epoch;
            }

            outcome = Commit::Applied(apply(&mut state.value));
            true
        });

        outcome
    }

    /// Run the checks of [`commit`](Self::commit) for a response that leaves
    /// the store untouched
    pub fn settle<R>(
        &self,
        ticket: &Ticket,
        sequence: &RequestSequence,
        mount: &ViewMount,
        value: R,
    ) -> Commit<R> {
        if !mount.is_mounted() {
            Commit::Unmounted
        } else if !sequence.is_latest(ticket.generation) {
            Commit::Superseded
        } else if self.session.borrow().epoch() != ticket.epoch {
            Commit::IdentityChanged
        } else {
            Commit::Applied(value)
        }
    }

    /// Local mutation with no request behind it
    pub fn update<R>(
        &self,
        apply: impl FnOnce(&mut T) -> Result<R, DomainError>,
    ) -> Result<R, DomainError> {
        let current_epoch = self.session.borrow().epoch();
        let mut result = None;

        self.state.send_if_modified(|state| {
            let mut candidate = if state.epoch == current_epoch {
                state.value.clone()
            } else {
                T::default()
            };

            match apply(&mut candidate) {
                Ok(value) => {
                    state.value = candidate;
                    state.epoch = current_epoch;
                    result = Some(Ok(value));
                    true
                }
                Err(e) => {
                    result = Some(Err(e));
                    false
                }
            }
        });

        result.unwrap_or_else(|| Err(DomainError::internal("store update did not run")))
    }

    /// Drop everything, stamped with the current epoch
    pub fn reset(&self) {
        let epoch = self.session.borrow().epoch();
        self.state.send_replace(Committed {
            value: T::default(),
            epoch,
        });
    }
}
