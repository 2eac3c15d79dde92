//! Generic session controller.
//!
//! One controller exists per mounted account family. It owns the lifecycle
//! state machine, the identity cache, and the navigation intents; the HTTP
//! adapter reports observed 401s back into it through a hook.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};
use tokio::sync::{Mutex, watch};

use crate::domain::credentials::LoginCredentials;
use crate::domain::envelope::ApiEnvelope;
use crate::domain::ports::{ApiError, ApiGateway, IdentityStore};

use super::role_profile::RoleProfile;
use super::route_intent::{RouteIntents, RouteReason};

/// Observable lifecycle of one role's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState<I> {
    /// Nothing resolved yet.
    Unknown,
    /// A login or session check is in flight.
    Checking,
    /// Signed in.
    Authenticated(I),
    /// Signed out.
    Anonymous,
}

impl<I> SessionState<I> {
    /// True once signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Single-shot arming flag for session-expiry reactions.
///
/// Armed while a session is live. The first expiry observer wins the swap
/// and performs the clear-and-redirect; concurrent observers see `false`.
/// While disarmed (no live session) expiry observations are ignored, which
/// keeps a failed login's 401 from redirecting anyone.
#[derive(Debug, Default)]
struct AuthExpiryGuard {
    armed: AtomicBool,
}

impl AuthExpiryGuard {
    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    fn fire(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }
}

/// Callback the HTTP adapter invokes whenever a 401 crosses the wire.
pub type AuthExpiryHook = Arc<dyn Fn() + Send + Sync>;

/// Session controller for one account family.
///
/// Drives the `Unknown → Checking → {Authenticated, Anonymous}` machine,
/// keeps the persisted identity in lockstep, and publishes navigation
/// intents instead of navigating itself.
pub struct SessionController<R: RoleProfile> {
    gateway: Arc<dyn ApiGateway>,
    store: Arc<dyn IdentityStore>,
    routes: RouteIntents,
    state: watch::Sender<SessionState<R::Identity>>,
    expiry: AuthExpiryGuard,
    // Serialises login/logout so interleaved submissions cannot race the
    // persisted records.
    ops: Mutex<()>,
}

impl<R: RoleProfile> SessionController<R> {
    /// Create a controller in the `Unknown` state.
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>, store: Arc<dyn IdentityStore>) -> Self {
        let (state, _rx) = watch::channel(SessionState::Unknown);
        Self {
            gateway,
            store,
            routes: RouteIntents::new(),
            state,
            expiry: AuthExpiryGuard::default(),
            ops: Mutex::new(()),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState<R::Identity> {
        self.state.borrow().clone()
    }

    /// Subscribe to lifecycle transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState<R::Identity>> {
        self.state.subscribe()
    }

    /// Navigation intents this controller publishes.
    #[must_use]
    pub fn routes(&self) -> &RouteIntents {
        &self.routes
    }

    /// Hook for the HTTP adapter's 401 interception.
    ///
    /// Holds the controller weakly so a registered hook never keeps a
    /// dismounted controller alive.
    #[must_use]
    pub fn auth_expiry_hook(self: &Arc<Self>) -> AuthExpiryHook {
        let controller = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(controller) = controller.upgrade() {
                controller.handle_auth_expiry();
            }
        })
    }

    /// React to an observed session expiry.
    ///
    /// Returns `true` for the single observer that performed the
    /// clear-and-redirect; every concurrent or later observer gets `false`.
    pub fn handle_auth_expiry(&self) -> bool {
        if !self.expiry.fire() {
            return false;
        }
        self.clear_persisted();
        self.state.send_replace(SessionState::Anonymous);
        self.routes.request(R::login_route(), RouteReason::LoginRequired);
        true
    }

    /// Resolve the initial state from the identity cache.
    ///
    /// Cache-first: a cached identity authenticates immediately so the
    /// interface renders without a round trip. Run [`Self::spawn_validation`]
    /// afterwards (or await [`Self::current_user`]) to confirm the session
    /// against the server.
    pub fn bootstrap(&self) -> SessionState<R::Identity> {
        self.state.send_replace(SessionState::Checking);
        match R::load_cached(self.store.as_ref()) {
            Some(identity) => {
                self.expiry.arm();
                self.state
                    .send_replace(SessionState::Authenticated(identity.clone()));
                SessionState::Authenticated(identity)
            }
            None => {
                self.state.send_replace(SessionState::Anonymous);
                SessionState::Anonymous
            }
        }
    }

    /// Ask the server who is signed in and reconcile local state with the
    /// answer.
    ///
    /// Resolves to `Ok(None)` after clearing the cache when the server says
    /// nobody is signed in; transport failures propagate and leave the
    /// current state untouched, so a flaky network never signs anyone out.
    pub async fn current_user(&self) -> Result<Option<R::Identity>, ApiError> {
        match self.gateway.get(R::me_path()).await {
            Ok(reply) => match ApiEnvelope::<Value>::decode(reply)?.accept() {
                Ok(Some(data)) => {
                    let identity = R::identity_from_me(&data)?;
                    self.persist(&identity, None);
                    self.expiry.arm();
                    self.state
                        .send_replace(SessionState::Authenticated(identity.clone()));
                    Ok(Some(identity))
                }
                Ok(None) => {
                    self.resolve_signed_out();
                    Ok(None)
                }
                Err(refusal) => {
                    tracing::debug!("{} session check declined: {refusal}", R::ROLE);
                    self.resolve_signed_out();
                    Ok(None)
                }
            },
            Err(error) if error.requires_login() => {
                self.resolve_signed_out();
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Confirm a cache-first bootstrap against the server in the background.
    pub fn spawn_validation(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(error) = controller.current_user().await {
                tracing::warn!("background session validation failed: {error}");
            }
        })
    }

    /// Submit credentials and establish a session.
    ///
    /// On refusal the server message comes back verbatim inside the error
    /// and the state settles on `Anonymous`; no navigation intent is
    /// published, so the user stays on the login screen.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<R::Identity, ApiError> {
        let _serialised = self.ops.lock().await;
        self.expiry.disarm();
        self.state.send_replace(SessionState::Checking);

        let body = json!({
            "email": credentials.email(),
            "password": credentials.password(),
        });
        let outcome = async {
            let reply = self.gateway.post(R::login_path(), &body).await?;
            let data = ApiEnvelope::<Value>::decode(reply)?.require_data()?;
            let identity = R::identity_from_login(&data)?;
            self.persist(&identity, Some(&data));
            Ok(identity)
        }
        .await;

        match outcome {
            Ok(identity) => {
                self.expiry.arm();
                self.state
                    .send_replace(SessionState::Authenticated(identity.clone()));
                self.routes
                    .request(R::dashboard_route(), RouteReason::LoginSucceeded);
                Ok(identity)
            }
            Err(error) => {
                self.state.send_replace(SessionState::Anonymous);
                Err(error)
            }
        }
    }

    /// Sign out.
    ///
    /// The server call is best-effort: a failure is logged and the local
    /// session still ends, cleanly, with a navigation intent to the login
    /// screen.
    pub async fn logout(&self) {
        let _serialised = self.ops.lock().await;
        if let Err(error) = self.gateway.post(R::logout_path(), &json!({})).await {
            tracing::warn!("{} logout call failed, clearing locally: {error}", R::ROLE);
        }
        self.expiry.disarm();
        self.clear_persisted();
        self.state.send_replace(SessionState::Anonymous);
        self.routes.request(R::login_route(), RouteReason::LoggedOut);
    }

    fn persist(&self, identity: &R::Identity, login_data: Option<&Value>) {
        let result = match login_data {
            Some(data) => R::persist_login(self.store.as_ref(), identity, data),
            None => R::persist_refresh(self.store.as_ref(), identity),
        };
        if let Err(error) = result {
            tracing::warn!("could not persist {} identity: {error}", R::ROLE);
        }
    }

    fn clear_persisted(&self) {
        if let Err(error) = R::clear(self.store.as_ref()) {
            tracing::warn!("could not clear persisted {} identity: {error}", R::ROLE);
        }
    }

    fn resolve_signed_out(&self) {
        let redirected = self.handle_auth_expiry();
        if !redirected {
            self.clear_persisted();
            self.state.send_replace(SessionState::Anonymous);
        }
    }
}
