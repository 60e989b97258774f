//! Bearer token storage and logout notification
//!
//! The session token lives behind the `SessionStore` trait so the request
//! pipeline never touches ambient global state directly. The default store
//! persists the token to a single file under the user's config directory;
//! an in-memory store exists for environments without one (and for tests).

use std::path::PathBuf;
use std::sync::Mutex;

/// File name the bearer token is persisted under.
pub const TOKEN_FILE: &str = "csm-auth-token";

/// Storage for the single active session token.
///
/// At most one token is active at a time; `load()` returning `None` means
/// the client is unauthenticated.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Collaborator notified when the pipeline classifies a 401.
///
/// The pipeline only clears the token; whatever "go back to login" means
/// (a message, a redirect) is the shell's decision.
pub trait UnauthorizedHook: Send + Sync {
    fn on_unauthorized(&self);
}

/// Token store backed by a file under the config directory.
///
/// When no config directory exists, the store behaves as permanently
/// unauthenticated: loads return `None` and saves are logged no-ops.
pub struct FileSessionStore {
    path: Option<PathBuf>,
}

impl FileSessionStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            path: dir.map(|d| d.join(TOKEN_FILE)),
        }
    }

    /// Store under `~/.config/csmctl/`.
    pub fn default_location() -> Self {
        Self::new(dirs::config_dir().map(|d| d.join("csmctl")))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(_) => None,
        }
    }

    fn save(&self, token: &str) {
        let Some(path) = self.path.as_ref() else {
            tracing::debug!("No session directory available; token not persisted");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create session directory {}: {}", parent.display(), e);
                return;
            }
        }

        if let Err(e) = std::fs::write(path, token) {
            tracing::warn!("Failed to persist session token: {}", e);
        }
    }

    fn clear(&self) {
        let Some(path) = self.path.as_ref() else {
            return;
        };

        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove session token: {}", e),
        }
    }
}

/// In-memory token store for tests and tokenless environments.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    fn save(&self, token: &str) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}
