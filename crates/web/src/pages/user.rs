//! Public user profile page.

use axum::{
    extract::{Path, State},
    response::Html,
};
use folio_api::extractors::MaybeAuthUser;
use maud::html;

use super::render_page;
use crate::{
    PageError, PageResult, WebState,
    components::{format_date, paragraphs},
};

pub async fn profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Path(username): Path<String>,
) -> PageResult<Html<String>> {
    let profile = state
        .app
        .user_service
        .find_by_username(&username)
        .await?
        .ok_or_else(|| PageError::not_found("User"))?;

    let content = html! {
        section class="profile" {
            @if let Some(avatar) = &profile.avatar_url {
                img class="avatar" src=(avatar) alt={ (profile.username) "'s avatar" };
            }
            h1 {
                (profile.username)
                @if profile.is_admin() {
                    " " span class="badge" { "Admin" }
                }
            }
            p class="meta" { "Joined " (format_date(&profile.created_at)) }
            @if let Some(bio) = &profile.bio {
                (paragraphs(bio))
            }
            @if let Some(website) = &profile.website {
                p { a href=(website) rel="noopener nofollow" target="_blank" { (website) } }
            }
        }
    };

    Ok(render_page(&state, &profile.username, viewer.as_ref(), content))
}
