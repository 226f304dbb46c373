//! The console: one signed-in operator's view of the directory.
//!
//! [`Console`] owns both stores, the session guard and the action layer, and
//! is the only thing a front end (the CLI, a UI) talks to. Directory
//! operations refuse to run without a live session, validate their input
//! first, and apply the resulting events before returning.

use std::sync::Arc;

use log::{error, info, warn};
use roster_states::StateCtx;

use crate::auth_state::{AuthEvent, AuthState};
use crate::client::{DirectoryApi, HttpDirectoryClient};
use crate::config::BusinessConfig;
use crate::directory_actions::{DirectoryActions, LoadOutcome};
use crate::directory_state::DirectoryState;
use crate::error::{ConsoleError, DirectoryError};
use crate::route::{Route, resolve_route};
use crate::session::{SessionGuard, SessionStore};
use crate::user::{UserDraft, UserId, UserPatch, UserRecord};
use crate::validation::LoginForm;

pub struct Console<A: ?Sized = HttpDirectoryClient> {
    api: Arc<A>,
    directory: StateCtx<DirectoryState>,
    auth: StateCtx<AuthState>,
    actions: DirectoryActions<A>,
    session: SessionGuard,
}

impl<A: ?Sized> std::fmt::Debug for Console<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("directory", &self.directory)
            .field("auth", &self.auth)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Console<HttpDirectoryClient> {
    /// Console over HTTP, restoring any session saved in `store`.
    pub fn connect(
        config: BusinessConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ConsoleError> {
        let client = HttpDirectoryClient::new(config)
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        Self::new(Arc::new(client), store)
    }
}

impl<A: DirectoryApi + ?Sized> Console<A> {
    pub fn new(api: Arc<A>, store: Arc<dyn SessionStore>) -> Result<Self, ConsoleError> {
        let remembered_email = store.remembered_email()?;
        let session = SessionGuard::restore(store)?;

        let directory = StateCtx::<DirectoryState>::new();
        let mut auth = StateCtx::<AuthState>::new();
        let actions = DirectoryActions::new(api.clone(), directory.updater());

        if let Some(token) = session.token() {
            api.set_bearer_token(Some(token.to_owned()));
            auth.apply(AuthEvent::SessionRestored);
        }
        auth.apply(AuthEvent::EmailRemembered {
            email: remembered_email,
        });

        Ok(Self {
            api,
            directory,
            auth,
            actions,
            session,
        })
    }

    pub fn directory(&self) -> &DirectoryState {
        self.directory.state()
    }

    pub fn auth(&self) -> &AuthState {
        self.auth.state()
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    /// The action layer, for callers that drive several operations at once.
    /// Events it emits are applied on the next [`Self::sync`].
    pub fn actions(&self) -> &DirectoryActions<A> {
        &self.actions
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn route_for(&self, path: &str) -> Route {
        resolve_route(path, self.is_authenticated())
    }

    /// Apply queued events. A rejected credential anywhere in the batch ends
    /// the session, even if a later event in the same batch succeeded.
    pub fn sync(&mut self) -> usize {
        let applied = self.directory.sync() + self.auth.sync();
        if self.actions.take_session_expired() {
            self.expire_session();
        }
        applied
    }

    pub async fn login(&mut self, form: LoginForm, remember: bool) -> Result<(), ConsoleError> {
        form.validate()?;

        self.auth.apply(AuthEvent::LoginRequested);
        let credential = match self.api.authenticate(&form.email, &form.password).await {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Login failed for {}: {e}", form.email);
                self.auth.apply(AuthEvent::LoginFailed {
                    reason: e.reason().to_owned(),
                });
                return Err(e.into());
            }
        };

        let token = credential.token.clone();
        if let Err(e) = self.session.sign_in(credential) {
            self.auth.apply(AuthEvent::LoginFailed {
                reason: e.to_string(),
            });
            return Err(e.into());
        }
        self.api.set_bearer_token(Some(token));

        let remembered = remember.then(|| form.email.clone());
        self.session
            .store()
            .remember_email(remembered.as_deref())?;
        self.auth.apply(AuthEvent::EmailRemembered { email: remembered });
        self.auth.apply(AuthEvent::LoginSucceeded {
            email: Some(form.email),
        });
        Ok(())
    }

    /// End the session and forget everything loaded under it.
    pub fn logout(&mut self) -> Result<(), ConsoleError> {
        self.clear_session();
        self.auth.apply(AuthEvent::LoggedOut);
        info!("Logged out");
        self.session.sign_out()?;
        Ok(())
    }

    pub async fn load_page(&mut self, page: u32) -> Result<LoadOutcome, ConsoleError> {
        self.ensure_authenticated()?;
        let result = self.actions.go_to_page(page).await;
        self.finish(result)
    }

    /// Reload the current page, e.g. after navigating back to the directory.
    pub async fn refresh(&mut self) -> Result<LoadOutcome, ConsoleError> {
        self.ensure_authenticated()?;
        let result = self.actions.refresh().await;
        self.finish(result)
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.actions.set_query(text);
        self.sync();
    }

    pub async fn create_user(&mut self, draft: UserDraft) -> Result<UserRecord, ConsoleError> {
        self.ensure_authenticated()?;
        draft.validate()?;
        let result = self.actions.create_user(draft).await;
        self.finish(result)
    }

    pub async fn edit_user(
        &mut self,
        id: UserId,
        patch: UserPatch,
    ) -> Result<Option<UserRecord>, ConsoleError> {
        self.ensure_authenticated()?;
        patch.validate()?;
        let result = self.actions.edit_user(id, patch).await;
        self.finish(result)
    }

    pub async fn remove_user(&mut self, id: UserId) -> Result<(), ConsoleError> {
        self.ensure_authenticated()?;
        let result = self.actions.remove_user(id).await;
        self.finish(result)
    }

    fn finish<T>(&mut self, result: Result<T, DirectoryError>) -> Result<T, ConsoleError> {
        self.sync();
        result.map_err(ConsoleError::from)
    }

    fn ensure_authenticated(&mut self) -> Result<(), ConsoleError> {
        if self.session.is_authenticated() {
            return Ok(());
        }
        if self.session.credential().is_some() {
            info!("Session credential expired");
            self.expire_session();
        }
        Err(ConsoleError::NotAuthenticated)
    }

    fn expire_session(&mut self) {
        warn!("Session expired, signing out");
        self.clear_session();
        self.auth.apply(AuthEvent::LoginFailed {
            reason: DirectoryError::SessionExpired.display_message(),
        });
        if let Err(e) = self.session.sign_out() {
            error!("Failed to clear expired session: {e}");
        }
    }

    fn clear_session(&mut self) {
        self.api.set_bearer_token(None);
        self.actions.invalidate_loads();
        self.directory.reset();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::session::{MemorySessionStore, SessionCredential};
    use crate::test_utils::{
        FakeDirectoryApi, VALID_EMAIL, VALID_PASSWORD, VALID_TOKEN, page_of, sample_user,
    };

    fn console(api: FakeDirectoryApi) -> Console<FakeDirectoryApi> {
        Console::new(Arc::new(api), Arc::new(MemorySessionStore::new())).unwrap()
    }

    async fn signed_in(api: FakeDirectoryApi) -> Console<FakeDirectoryApi> {
        let mut console = console(api);
        console
            .login(LoginForm::new(VALID_EMAIL, VALID_PASSWORD), false)
            .await
            .unwrap();
        console
    }

    #[tokio::test]
    async fn test_login_attaches_token_and_signs_in() {
        let console = signed_in(FakeDirectoryApi::new()).await;

        assert!(console.is_authenticated());
        assert!(console.auth().is_signed_in());
        assert_eq!(console.auth().email(), Some(VALID_EMAIL));
        assert_eq!(console.api.bearer_token().as_deref(), Some(VALID_TOKEN));
        assert_eq!(console.route_for("/login"), Route::Directory);
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_form_without_calling_api() {
        let mut console = console(FakeDirectoryApi::new());

        let err = console
            .login(LoginForm::new("not-an-email", ""), false)
            .await
            .unwrap_err();

        assert!(matches!(err, ConsoleError::Invalid(ref errors) if errors.len() == 2));
        assert!(!console.auth().is_signing_in());
    }

    #[tokio::test]
    async fn test_bad_credentials_show_reason() {
        let mut console = console(FakeDirectoryApi::new());

        let err = console
            .login(LoginForm::new(VALID_EMAIL, "wrong"), false)
            .await
            .unwrap_err();

        assert!(matches!(err, ConsoleError::Auth(_)));
        assert_eq!(console.auth().error(), Some("user not found"));
        assert!(!console.is_authenticated());
    }

    #[tokio::test]
    async fn test_remember_me_persists_email() {
        let store = Arc::new(MemorySessionStore::new());
        let mut console =
            Console::new(Arc::new(FakeDirectoryApi::new()), store.clone()).unwrap();
        console
            .login(LoginForm::new(VALID_EMAIL, VALID_PASSWORD), true)
            .await
            .unwrap();
        console.logout().unwrap();

        let reopened = Console::new(Arc::new(FakeDirectoryApi::new()), store).unwrap();
        assert_eq!(
            reopened.auth().remembered_email.as_deref(),
            Some(VALID_EMAIL)
        );
        assert!(!reopened.is_authenticated());
    }

    #[tokio::test]
    async fn test_restores_saved_session() {
        let store = Arc::new(MemorySessionStore::new());
        store
            .save(&SessionCredential::new(VALID_TOKEN, Utc::now()))
            .unwrap();

        let console = Console::new(Arc::new(FakeDirectoryApi::new()), store).unwrap();

        assert!(console.is_authenticated());
        assert!(console.auth().is_signed_in());
        assert_eq!(console.api.bearer_token().as_deref(), Some(VALID_TOKEN));
    }

    #[tokio::test]
    async fn test_directory_requires_session() {
        let mut console = console(FakeDirectoryApi::new());

        let err = console.load_page(1).await.unwrap_err();

        assert_eq!(err, ConsoleError::NotAuthenticated);
        assert!(console.api.list_calls().is_empty());
        assert_eq!(console.route_for("/users"), Route::Login);
    }

    #[tokio::test]
    async fn test_load_then_filter() {
        let mut console = signed_in(FakeDirectoryApi::new().with_page(page_of(
            1,
            2,
            vec![sample_user(1, "Anna", "Smith"), sample_user(2, "Bob", "Jones")],
        )))
        .await;

        console.load_page(1).await.unwrap();
        console.set_query("an");

        let visible: Vec<_> = console
            .directory()
            .visible_records()
            .iter()
            .map(|r| r.first_name.clone())
            .collect();
        assert_eq!(visible, vec!["Anna"]);
        assert!(console.directory().has_next_page());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let mut console = signed_in(FakeDirectoryApi::new()).await;

        let err = console
            .create_user(UserDraft::new("", "Leader", "morpheus@reqres.in"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConsoleError::Invalid(_)));
        assert!(console.directory().records().is_empty());
        assert!(console.directory().last_error().is_none());
    }

    #[tokio::test]
    async fn test_create_edit_remove_round_trip() {
        let mut console = signed_in(
            FakeDirectoryApi::new().with_page(page_of(1, 1, vec![sample_user(1, "George", "Bluth")])),
        )
        .await;
        console.load_page(1).await.unwrap();

        let created = console
            .create_user(UserDraft::new("Morpheus", "Leader", "morpheus@reqres.in"))
            .await
            .unwrap();
        assert_eq!(console.directory().records()[0], created);

        console
            .edit_user(created.id.clone(), UserPatch::default().last_name("Prime"))
            .await
            .unwrap();
        assert_eq!(
            console.directory().find(&created.id).map(|r| r.last_name.as_str()),
            Some("Prime")
        );

        console.remove_user(created.id.clone()).await.unwrap();
        assert!(console.directory().find(&created.id).is_none());
        assert_eq!(console.directory().records().len(), 1);
    }

    #[tokio::test]
    async fn test_session_expired_signs_out() {
        let mut console =
            signed_in(FakeDirectoryApi::new().failing_lists(DirectoryError::SessionExpired)).await;

        let err = console.load_page(1).await.unwrap_err();

        assert_eq!(err, ConsoleError::Directory(DirectoryError::SessionExpired));
        assert!(!console.is_authenticated());
        assert!(console.api.bearer_token().is_none());
        assert_eq!(
            console.auth().error(),
            Some(DirectoryError::SessionExpired.to_string().as_str())
        );
        assert_eq!(console.directory(), &DirectoryState::default());
    }

    #[tokio::test]
    async fn test_expiry_is_caught_when_a_later_event_succeeds() {
        let mut console = signed_in(
            FakeDirectoryApi::new()
                .with_page(page_of(1, 1, vec![sample_user(1, "George", "Bluth")]))
                .failing_mutations(DirectoryError::SessionExpired),
        )
        .await;

        {
            let actions = console.actions();
            let (removed, loaded) =
                tokio::join!(actions.remove_user(UserId::from(1)), actions.go_to_page(1));
            assert_eq!(removed, Err(DirectoryError::SessionExpired));
            assert!(loaded.is_ok());
        }
        console.sync();

        assert!(!console.is_authenticated());
        assert!(console.api.bearer_token().is_none());
        assert_eq!(console.directory(), &DirectoryState::default());
    }

    #[tokio::test]
    async fn test_logout_resets_directory() {
        let mut console = signed_in(
            FakeDirectoryApi::new().with_page(page_of(1, 1, vec![sample_user(1, "George", "Bluth")])),
        )
        .await;
        console.load_page(1).await.unwrap();

        console.logout().unwrap();

        assert!(!console.is_authenticated());
        assert_eq!(console.directory(), &DirectoryState::default());
        assert!(!console.auth().is_signed_in());
    }
}
