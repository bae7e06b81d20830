//! Page load handler.

use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, set_sentry_user};
use crate::render::{IndexTemplate, render_document};
use crate::state::AppState;
use crate::storage::SessionStore;

/// Start a page: restore the stored session, fetch the feed and register the
/// page's controller.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<IndexTemplate> {
    let store = SessionStore::new(session);
    let mut controller = state.new_controller();
    controller.startup(&store).await?;

    if let Some(user) = controller.current_user() {
        set_sentry_user(&user.username);
    }

    let (id, page) = state.open_page(controller).await;
    let controller = page.lock().await;
    tracing::debug!(page_id = %id, "Opened page");
    Ok(render_document(
        id,
        controller.page(),
        controller.current_user(),
    )?)
}
