//! Credential store: the one place that writes the session

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::shared::{IdentityScoped, RequestSequence};
use crate::client::api::GatewayApi;
use crate::domain::{
    AccountForm, AccountIntent, AccountOutcome, AccountValidationError, AuthFlags, BearerToken,
    Credentials, DomainError, LoginOutcome, Session,
};

/// Outcome of a submitted sign-in form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Login(LoginOutcome),
    CreateAccount(AccountOutcome),
}

/// Holds the session and the sign-in drawer flags.
///
/// Login, account creation and logout share one request sequence, so a
/// response can only commit if nothing else touched the session after it
/// was issued.
///
/// Every identity change clears the attached stores before returning.
pub struct SessionStore {
    api: Arc<dyn GatewayApi>,
    session: watch::Sender<Session>,
    flags: watch::Sender<AuthFlags>,
    sequence: RequestSequence,
    scoped: RwLock<Vec<Arc<dyn IdentityScoped>>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn GatewayApi>) -> Self {
        let (session, _) = watch::channel(Session::anonymous());
        let (flags, _) = watch::channel(AuthFlags::default());

        Self {
            api,
            session,
            flags,
            sequence: RequestSequence::new(),
            scoped: RwLock::new(Vec::new()),
        }
    }

    /// Clear `store` whenever the signed-in identity changes
    pub fn attach(&self, store: Arc<dyn IdentityScoped>) {
        self.scoped
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(store);
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn token(&self) -> Option<BearerToken> {
        self.session.borrow().token().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn flags(&self) -> AuthFlags {
        *self.flags.borrow()
    }

    /// Sign in. A backend `success: false` is [`LoginOutcome::Rejected`],
    /// not an error.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<LoginOutcome, DomainError> {
        self.login_with(Credentials::new(email, password)?).await
    }

    async fn login_with(&self, credentials: Credentials) -> Result<LoginOutcome, DomainError> {
        let generation = self.sequence.issue();
        let epoch = self.session.borrow().epoch();

        let response = self
            .api
            .login(credentials)
            .await
            .inspect_err(|e| warn!(error = %e, "Login call failed"))?;

        if !self.sequence.is_latest(generation) {
            return Ok(LoginOutcome::Superseded);
        }

        if !response.success {
            self.flags.send_modify(|f| f.failed_login = true);
            info!("Login rejected");
            return Ok(LoginOutcome::Rejected);
        }

        let token = response.token()?;
        if !self.authenticate(generation, epoch, token) {
            return Ok(LoginOutcome::Superseded);
        }

        info!("Signed in");
        Ok(LoginOutcome::Authenticated)
    }

    /// Create an account and sign in with it. Mismatched passwords are
    /// caught here, with no network call.
    pub async fn create_account(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Result<AccountOutcome, DomainError> {
        self.create_account_with(&AccountForm::new(email, password, confirm_password))
            .await
    }

    async fn create_account_with(&self, form: &AccountForm) -> Result<AccountOutcome, DomainError> {
        let credentials = match form.new_account_credentials() {
            Ok(credentials) => credentials,
            Err(AccountValidationError::PasswordsDoNotMatch) => {
                self.flags.send_modify(|f| f.not_matching_passwords = true);
                return Ok(AccountOutcome::PasswordsDoNotMatch);
            }
            Err(e) => return Err(e.into()),
        };

        let generation = self.sequence.issue();
        let epoch = self.session.borrow().epoch();

        let response = self
            .api
            .create_account(credentials)
            .await
            .inspect_err(|e| warn!(error = %e, "Account creation call failed"))?;

        if !self.sequence.is_latest(generation) {
            return Ok(AccountOutcome::Superseded);
        }

        if response.already_exists {
            self.flags.send_modify(|f| f.already_exists = true);
            info!("Account already exists");
            return Ok(AccountOutcome::AlreadyExists);
        }

        let token = response.token()?;
        if !self.authenticate(generation, epoch, token) {
            return Ok(AccountOutcome::Superseded);
        }

        info!("Account created");
        Ok(AccountOutcome::Created)
    }

    /// Submit the sign-in drawer: a filled confirmation field means sign-up
    pub async fn submit(&self, form: AccountForm) -> Result<SubmitOutcome, DomainError> {
        match form.intent() {
            AccountIntent::CreateAccount => self
                .create_account_with(&form)
                .await
                .map(SubmitOutcome::CreateAccount),
            AccountIntent::Login => self
                .login_with(form.login_credentials()?)
                .await
                .map(SubmitOutcome::Login),
        }
    }

    /// Drop the session. Any login still in flight is discarded when it returns.
    pub fn logout(&self) {
        self.sequence.issue();
        self.session.send_modify(|s| *s = s.cleared());
        self.flags.send_replace(AuthFlags::default());
        self.clear_scoped();
        info!("Signed out");
    }

    /// Reset the drawer flags, as when the drawer closes
    pub fn clear_flags(&self) {
        self.flags.send_replace(AuthFlags::default());
    }

    fn authenticate(&self, generation: u64, epoch: u64, token: BearerToken) -> bool {
        let sequence = &self.sequence;

        let committed = self.session.send_if_modified(|session| {
            if !sequence.is_latest(generation) || session.epoch() != epoch {
                return false;
            }
            *session = session.authenticated(token);
            true
        });

        if committed {
            self.flags.send_replace(AuthFlags::default());
            self.clear_scoped();
        }
        committed
    }

    fn clear_scoped(&self) {
        let scoped = self.scoped.read().unwrap_or_else(PoisonError::into_inner);
        for store in scoped.iter() {
            store.clear();
        }
        debug!(stores = scoped.len(), "Cleared identity-scoped stores");
    }
}
