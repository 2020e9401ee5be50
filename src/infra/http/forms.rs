use serde::Deserialize;

use crate::domain::posts::PostDraft;

#[derive(Debug, Deserialize)]
pub(crate) struct PostForm {
    pub(crate) author: String,
    pub(crate) title: String,
    pub(crate) content: String,
}

impl PostForm {
    pub(crate) fn into_draft(self) -> PostDraft {
        PostDraft {
            author: self.author,
            title: self.title,
            content: self.content,
        }
    }
}
