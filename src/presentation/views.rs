use crate::{
    application::error::HttpError,
    domain::posts::{Post, PostId},
};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Site-wide values shared by every page.
#[derive(Debug, Clone)]
pub struct LayoutChrome {
    pub site_title: String,
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            site_title: chrome.site_title,
            content,
        }
    }
}

pub struct PostListView {
    pub posts: Vec<Post>,
}

impl PostListView {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Values for the shared add/update form.
pub struct PostFormView {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub author: String,
    pub title: String,
    pub content: String,
}

impl PostFormView {
    pub fn blank() -> Self {
        Self {
            heading: "Add a new post",
            action: "/add".to_string(),
            submit_label: "Publish",
            author: String::new(),
            title: String::new(),
            content: String::new(),
        }
    }

    pub fn prefilled(post: Post) -> Self {
        let Post {
            id,
            author,
            title,
            content,
        } = post;

        Self {
            heading: "Update post",
            action: update_path(id),
            submit_label: "Save changes",
            author,
            title,
            content,
        }
    }
}

pub fn update_path(id: PostId) -> String {
    format!("/update/{id}")
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<PostListView>,
}

#[derive(Template)]
#[template(path = "post_form.html")]
pub struct PostFormTemplate {
    pub view: LayoutContext<PostFormView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome() -> LayoutChrome {
        LayoutChrome {
            site_title: "Notes".to_string(),
        }
    }

    #[test]
    fn index_escapes_post_fields() {
        let posts = vec![Post {
            id: 4,
            author: "<b>mallory</b>".to_string(),
            title: "Hello & welcome".to_string(),
            content: "<script>alert(1)</script>".to_string(),
        }];
        let view = LayoutContext::new(chrome(), PostListView { posts });
        let html = IndexTemplate { view }.render().expect("render");

        assert!(html.contains("<title>Notes</title>"));
        assert!(html.contains("&#60;script&#62;"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("href=\"/update/4\""));
        assert!(html.contains("href=\"/delete/4\""));
    }

    #[test]
    fn index_renders_empty_state() {
        let view = LayoutContext::new(chrome(), PostListView { posts: Vec::new() });
        let html = IndexTemplate { view }.render().expect("render");

        assert!(html.contains("No posts yet"));
    }

    #[test]
    fn prefilled_form_posts_back_to_update_route() {
        let post = Post {
            id: 12,
            author: "Ada".to_string(),
            title: "Engines".to_string(),
            content: "Analytical".to_string(),
        };
        let view = LayoutContext::new(chrome(), PostFormView::prefilled(post));
        let html = PostFormTemplate { view }.render().expect("render");

        assert!(html.contains("action=\"/update/12\""));
        assert!(html.contains("value=\"Ada\""));
        assert!(html.contains(">Analytical</textarea>"));
    }
}
