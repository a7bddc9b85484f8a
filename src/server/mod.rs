//! Development server with live reload
//!
//! Pages are rendered per request from an in-memory content store. When
//! watching, a changed content directory produces a fresh store that
//! replaces the previous one wholesale; stores themselves are never mutated.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::pages::{PageRenderer, Rendered};
use crate::Folio;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    pages: PageRenderer,
    store: RwLock<Arc<ContentStore>>,
    static_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    fn new(pages: PageRenderer, store: ContentStore, static_dir: PathBuf, live_reload: bool) -> Self {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Self {
            pages,
            store: RwLock::new(Arc::new(store)),
            static_dir,
            reload_tx,
            live_reload,
        }
    }

    /// The store current requests should render against
    fn snapshot(&self) -> Arc<ContentStore> {
        let guard = self.store.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn replace_store(&self, store: ContentStore) {
        let mut guard = self.store.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(store);
    }
}

/// A page route of the site
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageRoute {
    Home,
    Blog,
    Post(Vec<String>),
    About,
}

/// Start the development server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let store = folio.load_store()?;
    tracing::info!("Loaded {} posts", store.len());

    let state = Arc::new(ServerState::new(
        PageRenderer::new(folio.config.clone())?,
        store,
        folio.static_dir.clone(),
        watch,
    ));

    let app = router(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, folio.config.root);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let folio = folio.clone();
        let state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(&folio, &state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Page and asset routes; the live reload socket exists only when watching
fn router(state: Arc<ServerState>) -> Router {
    let mut router: Router<Arc<ServerState>> = Router::new();
    if state.live_reload {
        router = router.route("/__livereload", get(livereload_handler));
    }

    router
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch content and static files; rebuild the store and notify browsers
fn watch_and_reload(folio: &Folio, state: &ServerState) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&folio.content_dir, &folio.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".DS_Store") && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                if relevant.iter().any(|e| e.path.starts_with(&folio.content_dir)) {
                    match folio.load_store() {
                        Ok(store) => {
                            tracing::info!("Reloaded {} posts", store.len());
                            state.replace_store(store);
                        }
                        Err(e) => {
                            // Keep serving the previous store
                            tracing::error!("Reload failed: {}", e);
                            continue;
                        }
                    }
                }

                let _ = state.reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Route pages through the renderers, everything else through the static directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let route = match_route(state.pages.config(), request.uri().path());

    let rendered = match route {
        Some(PageRoute::Home) => state.pages.home(&state.snapshot()).map(Rendered::Page),
        Some(PageRoute::Blog) => state.pages.blog_index(&state.snapshot()).map(Rendered::Page),
        Some(PageRoute::About) => state.pages.about().map(Rendered::Page),
        Some(PageRoute::Post(segments)) => state.pages.post(&state.snapshot(), &segments),
        None => return serve_static(&state, request).await,
    };

    match rendered {
        Ok(Rendered::Page(html)) => html_response(&state, StatusCode::OK, html),
        Ok(Rendered::NotFound { html, .. }) => html_response(&state, StatusCode::NOT_FOUND, html),
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response()
        }
    }
}

async fn serve_static(state: &ServerState, mut request: Request<Body>) -> Response {
    // Assets live under the site root, but on disk at the top of the static dir
    let root = state.pages.config().root.trim_end_matches('/');
    if !root.is_empty() {
        let stripped = request
            .uri()
            .path()
            .strip_prefix(root)
            .filter(|rest| rest.starts_with('/'))
            .and_then(|rest| rest.parse::<Uri>().ok());
        match stripped {
            Some(uri) => *request.uri_mut() = uri,
            None => return not_found_response(state),
        }
    }

    let mut service = ServeDir::new(&state.static_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found_response(state),
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn not_found_response(state: &ServerState) -> Response {
    match state.pages.not_found() {
        Ok(html) => html_response(state, StatusCode::NOT_FOUND, html),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn html_response(state: &ServerState, status: StatusCode, html: String) -> Response {
    let html = if state.live_reload {
        inject_live_reload(&html)
    } else {
        html
    };
    (status, Html(html)).into_response()
}

/// Map a request path to a page route; `None` means a static asset
fn match_route(config: &SiteConfig, path: &str) -> Option<PageRoute> {
    let root = config.root.trim_end_matches('/');
    let rest = path.strip_prefix(root)?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        return None;
    }

    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let blog = config.blog_dir.trim_matches('/');

    if rest.is_empty() {
        return Some(PageRoute::Home);
    }
    if rest == "about" {
        return Some(PageRoute::About);
    }
    if rest == blog {
        return Some(PageRoute::Blog);
    }

    let slug = rest.strip_prefix(blog)?.strip_prefix('/')?;
    let segments = slug
        .split('/')
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect();
    Some(PageRoute::Post(segments))
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
