//! Projects, links and HTML modules.

use axum::{
    extract::{Path, State},
    response::Html,
};
use folio_api::extractors::MaybeAuthUser;
use folio_db::entities::{
    html_module::{self, LinkType},
    project::{self, ProjectCategory},
};
use maud::{Markup, PreEscaped, html};

use super::render_page;
use crate::{
    PageError, PageResult, WebState,
    components::{paragraphs, tag_list},
};

/// Display label of a project category.
#[must_use]
pub const fn project_category_label(category: ProjectCategory) -> &'static str {
    match category {
        ProjectCategory::Miniprogram => "Mini program",
        ProjectCategory::App => "App",
        ProjectCategory::Webpage => "Web page",
    }
}

fn project_card(project: &project::Model) -> Markup {
    html! {
        article class="project-card" {
            @if let Some(icon) = &project.icon {
                img class="icon" src=(icon) alt="" loading="lazy";
            }
            h3 { (project.title) }
            p class="meta" {
                (project_category_label(project.category))
                " · " (project.downloads) " downloads"
            }
            @if let Some(description) = &project.description {
                (paragraphs(description))
            }
            p class="tags" {
                @for tag in tag_list(&project.tags) {
                    span class="tag" { (tag) } " "
                }
            }
            @if let Some(qr) = &project.qr_code_url {
                img class="qr" src=(qr) alt={ "QR code for " (project.title) } loading="lazy";
            }
            @if project.file_url.is_some() || project.web_url.is_some() {
                form data-api={ "/api/projects/" (project.id) "/download" } {
                    button type="submit" {
                        @if project.file_url.is_some() { "Download" } @else { "Open" }
                    }
                }
            }
        }
    }
}

pub async fn projects(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let projects = state.app.project_service.list_published().await?;

    let content = html! {
        h1 { "Projects" }
        @if projects.is_empty() {
            p class="empty" { "No projects yet." }
        } @else {
            div class="project-grid" {
                @for project in &projects {
                    (project_card(project))
                }
            }
        }
    };

    Ok(render_page(&state, "Projects", viewer.as_ref(), content))
}

pub async fn links(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let (external, personal) = tokio::try_join!(
        state.app.link_service.visible_external(),
        state.app.link_service.public_personal(),
    )?;

    let content = html! {
        h1 { "Links" }
        @if !personal.is_empty() {
            section {
                h2 { "Find me elsewhere" }
                ul class="link-list" {
                    @for link in &personal {
                        li {
                            a href=(link.url) rel="me noopener" target="_blank" { (link.name) }
                            @if let Some(description) = &link.description {
                                " " small { (description) }
                            }
                        }
                    }
                }
            }
        }
        section {
            h2 { "Friends & resources" }
            @if external.is_empty() {
                p class="empty" { "No links yet." }
            } @else {
                ul class="link-list" {
                    @for link in &external {
                        li { a href=(link.url) rel="noopener" target="_blank" { (link.name) } }
                    }
                }
            }
        }
    };

    Ok(render_page(&state, "Links", viewer.as_ref(), content))
}

fn module_card(module: &html_module::Model) -> Markup {
    html! {
        article class="module-card" {
            @if let Some(cover) = &module.cover_image {
                img src=(cover) alt=(module.title) loading="lazy";
            }
            h3 { (module.title) }
            @if let Some(description) = &module.description {
                p { (description) }
            }
            @match module.link_type {
                LinkType::Page => {
                    a href={ "/modules/" (module.slug) } { "Open" }
                }
                LinkType::External => {
                    @if let Some(url) = &module.external_url {
                        a href=(url) rel="noopener" target="_blank" { "Visit" }
                    }
                }
                LinkType::Modal => {
                    details {
                        summary { "Preview" }
                        div class="module-content" { (PreEscaped(&module.content)) }
                    }
                }
            }
        }
    }
}

pub async fn modules(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
) -> PageResult<Html<String>> {
    let modules = state.app.html_module_service.list_active().await?;

    let content = html! {
        h1 { "Modules" }
        @if modules.is_empty() {
            p class="empty" { "No modules yet." }
        } @else {
            div class="module-grid" {
                @for module in &modules {
                    (module_card(module))
                }
            }
        }
    };

    Ok(render_page(&state, "Modules", viewer.as_ref(), content))
}

/// A module rendered as its own page.
pub async fn module_page(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<WebState>,
    Path(slug): Path<String>,
) -> PageResult<Html<String>> {
    let module = state
        .app
        .html_module_service
        .page(&slug)
        .await?
        .ok_or_else(|| PageError::not_found("Module"))?;

    // Module content is trusted HTML written by an admin
    let content = html! {
        h1 { (module.title) }
        div class="module-content" { (PreEscaped(&module.content)) }
    };

    Ok(render_page(&state, &module.title, viewer.as_ref(), content))
}
