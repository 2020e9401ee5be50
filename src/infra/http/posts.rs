use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State, rejection::FormRejection},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tracing::debug;

use crate::{
    application::{error::post_error_to_http, posts::PostService},
    domain::posts::PostId,
    presentation::views::{
        IndexTemplate, LayoutChrome, LayoutContext, PostFormTemplate, PostFormView, PostListView,
        render_template_response,
    },
};

use super::{
    forms::PostForm,
    middleware::{assign_request_id, log_responses},
    store_health_response,
};

const HOME: &str = "/";

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub chrome: LayoutChrome,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add_submit))
        .route("/delete/{id}", get(delete_post))
        .route("/update/{id}", get(update_form).post(update_submit))
        .route("/_health/store", get(store_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(assign_request_id))
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.posts.list().await {
        Ok(posts) => {
            let view = LayoutContext::new(state.chrome.clone(), PostListView { posts });
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_to_http("infra::http::posts::index", err).into_response(),
    }
}

async fn add_form(State(state): State<HttpState>) -> Response {
    let view = LayoutContext::new(state.chrome.clone(), PostFormView::blank());
    render_template_response(PostFormTemplate { view }, StatusCode::OK)
}

async fn add_submit(State(state): State<HttpState>, Form(form): Form<PostForm>) -> Response {
    match state.posts.create(form.into_draft()).await {
        Ok(_) => Redirect::to(HOME).into_response(),
        Err(err) => post_error_to_http("infra::http::posts::add_submit", err).into_response(),
    }
}

async fn delete_post(State(state): State<HttpState>, Path(id): Path<PostId>) -> Response {
    match state.posts.delete(id).await {
        Ok(removed) => {
            if !removed {
                debug!(
                    target = "infra::http::posts",
                    post_id = id,
                    "delete requested for absent post"
                );
            }
            Redirect::to(HOME).into_response()
        }
        Err(err) => post_error_to_http("infra::http::posts::delete_post", err).into_response(),
    }
}

async fn update_form(State(state): State<HttpState>, Path(id): Path<PostId>) -> Response {
    match state.posts.find(id).await {
        Ok(post) => {
            let view = LayoutContext::new(state.chrome.clone(), PostFormView::prefilled(post));
            render_template_response(PostFormTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_to_http("infra::http::posts::update_form", err).into_response(),
    }
}

/// Existence is checked before the form body is looked at, so an unknown id
/// answers 404 even when the submission is incomplete.
async fn update_submit(
    State(state): State<HttpState>,
    Path(id): Path<PostId>,
    form: Result<Form<PostForm>, FormRejection>,
) -> Response {
    let mut post = match state.posts.find(id).await {
        Ok(post) => post,
        Err(err) => {
            return post_error_to_http("infra::http::posts::update_submit", err).into_response();
        }
    };

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return rejection.into_response(),
    };

    post.apply(form.into_draft());
    match state.posts.replace(post).await {
        Ok(_) => Redirect::to(HOME).into_response(),
        Err(err) => post_error_to_http("infra::http::posts::update_submit", err).into_response(),
    }
}

async fn store_health(State(state): State<HttpState>) -> Response {
    store_health_response(state.posts.list().await.map(|_| ()))
}
