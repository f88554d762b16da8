use std::sync::Arc;

use crate::http::auth::SessionValidator;
use crate::media::{LibraryExplorer, LibraryFs, LibraryRoot, OsLibraryFs, PathContainer};

/// Shared application state injected into all route handlers via axum::extract::State.
/// Everything in here is read-only after startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub explorer: LibraryExplorer,
    /// Raw access to the music library, for streaming single files.
    pub library: Arc<dyn LibraryFs>,
    /// Static assets of the web client. `None` disables `/assets`.
    pub assets: Option<Arc<dyn LibraryFs>>,
    pub sessions: Arc<dyn SessionValidator>,
}

impl AppState {
    pub fn new(
        library: Arc<dyn LibraryFs>,
        mount: &str,
        assets: Option<Arc<dyn LibraryFs>>,
        sessions: Arc<dyn SessionValidator>,
    ) -> Self {
        Self {
            explorer: LibraryExplorer::new(Arc::clone(&library), mount),
            library,
            assets,
            sessions,
        }
    }

    /// State reading the music library (and optionally the assets) from disk.
    pub fn on_disk(
        music_root: LibraryRoot,
        mount: &str,
        assets_root: Option<LibraryRoot>,
        sessions: Arc<dyn SessionValidator>,
    ) -> Self {
        let library: Arc<dyn LibraryFs> = Arc::new(OsLibraryFs::new(PathContainer::new(
            Arc::new(music_root),
        )));
        let assets = assets_root.map(|root| {
            Arc::new(OsLibraryFs::new(PathContainer::new(Arc::new(root)))) as Arc<dyn LibraryFs>
        });
        Self::new(library, mount, assets, sessions)
    }
}
