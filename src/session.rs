//! Signed-in state
//!
//! A `Session` is created once at startup and handed to whoever needs it.
//! It owns the API client (so the bearer token always matches the user) and
//! the store the token is persisted in between runs.

use crate::api::{ApiClient, AuthResponse, User};
use anyhow::{Context, Result};
#[cfg(test)]
use std::sync::{Arc, Mutex};

const KEYRING_SERVICE: &str = "codescent";
const KEYRING_ACCOUNT: &str = "session-token";

/// Where the session token survives between runs
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// OS keyring (Keychain, Credential Manager, Secret Service)
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            account: KEYRING_ACCOUNT.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, &self.account).context("Failed to open keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read session token from keyring"),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store session token in keyring")
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to remove session token from keyring"),
        }
    }
}

/// In-process store
#[cfg(test)]
#[derive(Default, Clone)]
pub struct MemoryStore {
    token: Arc<Mutex<Option<String>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    pub fn peek(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }
}

#[cfg(test)]
impl TokenStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.peek())
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}

pub struct Session {
    user: Option<User>,
    client: ApiClient,
    store: Box<dyn TokenStore>,
}

impl Session {
    /// A signed-out session
    pub fn new(client: ApiClient, store: Box<dyn TokenStore>) -> Self {
        Self {
            user: None,
            client: client.with_token(None),
            store,
        }
    }

    /// Start from the stored token, if any. A token the backend no longer
    /// accepts is discarded; a network failure keeps it for next time but
    /// still starts signed out.
    pub async fn restore(client: ApiClient, store: Box<dyn TokenStore>) -> Self {
        let mut session = Session::new(client, store);
        let token = match session.store.load() {
            Ok(Some(t)) if !t.is_empty() => t,
            Ok(_) => return session,
            Err(e) => {
                log::warn!("could not read stored session: {:#}", e);
                return session;
            }
        };

        let candidate = session.client.clone().with_token(Some(token));
        match candidate.me().await {
            Ok(user) => {
                log::info!("restored session for {}", user.name);
                session.client = candidate;
                session.user = Some(user);
            }
            Err(e) if e.is_unauthorized() => {
                log::info!("stored session expired");
                if let Err(e) = session.store.clear() {
                    log::warn!("{:#}", e);
                }
            }
            Err(e) => log::warn!(
                "could not validate stored session against {}: {}",
                session.client.base_url(),
                e
            ),
        }
        session
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Client carrying the current token, for handing to background tasks
    pub fn client(&self) -> ApiClient {
        self.client.clone()
    }

    /// Adopt a successful login/signup response.
    pub fn establish(&mut self, auth: AuthResponse) -> Result<()> {
        if let Some(token) = &auth.token {
            self.store.save(token)?;
        }
        self.client = self.client.clone().with_token(auth.token);
        log::info!("signed in as {}", auth.user.name);
        self.user = Some(auth.user);
        Ok(())
    }

    /// Drop local state. Always succeeds locally; the caller tells the
    /// backend separately (see [`notify_logout`]).
    pub fn clear(&mut self) -> ApiClient {
        let previous = self.client.clone();
        self.user = None;
        self.client = self.client.clone().with_token(None);
        if let Err(e) = self.store.clear() {
            log::warn!("{:#}", e);
        }
        previous
    }

    pub async fn logout(&mut self) {
        let previous = self.clear();
        notify_logout(&previous).await;
    }
}

/// Best-effort backend logout; failures are only logged.
pub async fn notify_logout(client: &ApiClient) {
    if client.token().is_none() {
        return;
    }
    if let Err(e) = client.logout().await {
        log::warn!("logout request failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9/api/v1").unwrap()
    }

    fn auth(token: Option<&str>) -> AuthResponse {
        AuthResponse {
            token: token.map(String::from),
            user: User {
                id: "u1".into(),
                name: "Ada Lovelace".into(),
                username: Some("ada".into()),
                email: Some("ada@example.com".into()),
                photo: None,
            },
        }
    }

    #[test]
    fn test_new_session_is_signed_out() {
        let session = Session::new(client(), Box::new(MemoryStore::default()));
        assert!(!session.is_authenticated());
        assert!(session.client().token().is_none());
    }

    #[test]
    fn test_establish_persists_token() {
        let store = MemoryStore::default();
        let mut session = Session::new(client(), Box::new(store.clone()));
        session.establish(auth(Some("tok-123"))).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().name, "Ada Lovelace");
        assert_eq!(session.client().token(), Some("tok-123"));
        assert_eq!(store.peek().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_cookie_style_auth_without_token() {
        let store = MemoryStore::default();
        let mut session = Session::new(client(), Box::new(store.clone()));
        session.establish(auth(None)).unwrap();
        assert!(session.is_authenticated());
        assert!(store.peek().is_none());
    }

    #[test]
    fn test_clear_wipes_everything() {
        let store = MemoryStore::default();
        let mut session = Session::new(client(), Box::new(store.clone()));
        session.establish(auth(Some("tok-123"))).unwrap();

        let previous = session.clear();
        assert_eq!(previous.token(), Some("tok-123"));
        assert!(!session.is_authenticated());
        assert!(session.client().token().is_none());
        assert!(store.peek().is_none());
    }

    #[tokio::test]
    async fn test_restore_without_token_skips_network() {
        let session = Session::restore(client(), Box::new(MemoryStore::default())).await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_without_token_is_local_only() {
        let mut session = Session::new(client(), Box::new(MemoryStore::default()));
        session.logout().await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_unreachable_backend_keeps_stored_token() {
        let store = MemoryStore::with_token("tok-old");
        let session = Session::restore(client(), Box::new(store.clone())).await;
        assert!(!session.is_authenticated());
        assert_eq!(store.peek().as_deref(), Some("tok-old"));
    }
}
