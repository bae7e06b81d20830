//! Story route handlers: submit, favorite and delete.

use axum::{Form, extract::Path, response::Html};
use serde::Deserialize;
use tracing::instrument;

use snooze_core::{NewStory, StoryId};

use super::app_fragment;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::OpenPage;
use crate::render::render_item;

/// Submit form data.
#[derive(Debug, Deserialize)]
pub struct StoryForm {
    pub author: String,
    pub title: String,
    pub url: String,
}

/// Post a new story.
#[instrument(skip_all, fields(page_id = %open.id))]
pub async fn submit(open: OpenPage, Form(form): Form<StoryForm>) -> Result<Html<String>> {
    let new_story = NewStory::new(&form.title, &form.author, &form.url)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut controller = open.page.lock().await;
    if let Some(story) = controller.submit_story(&new_story).await? {
        add_breadcrumb(
            "story",
            "Submitted story",
            Some(&[("story_id", story.story_id.as_str())]),
        );
    }
    app_fragment(&controller)
}

/// Star click. Returns the clicked story's item with its settled star.
#[instrument(skip_all, fields(page_id = %open.id, story_id = %story_id))]
pub async fn favorite(open: OpenPage, Path(story_id): Path<StoryId>) -> Result<Html<String>> {
    let mut controller = open.page.lock().await;
    if controller.page().starred_item(&story_id).is_none() {
        return Err(AppError::BadRequest(format!(
            "Story {story_id} is not on this page"
        )));
    }
    controller.toggle_favorite(&story_id).await?;

    let item = controller
        .page()
        .starred_item(&story_id)
        .ok_or_else(|| AppError::BadRequest(format!("Story {story_id} is not on this page")))?;
    Ok(Html(render_item(item)?))
}

/// Delete one of the user's stories.
#[instrument(skip_all, fields(page_id = %open.id, story_id = %story_id))]
pub async fn delete(open: OpenPage, Path(story_id): Path<StoryId>) -> Result<Html<String>> {
    let mut controller = open.page.lock().await;
    controller.delete_story(&story_id).await?;

    add_breadcrumb(
        "story",
        "Deleted story",
        Some(&[("story_id", story_id.as_str())]),
    );
    app_fragment(&controller)
}
