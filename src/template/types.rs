use std::collections::HashMap;

use serde::Serialize;

use crate::content::ContentItem;

use super::sanitize::escape_html;

/// Placeholder tokens understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Username,
    PostUrl,
    PostTitle,
    Comments,
}

impl Token {
    pub const ALL: [Token; 4] = [
        Token::Username,
        Token::PostUrl,
        Token::PostTitle,
        Token::Comments,
    ];

    /// Literal placeholder text, braces included
    pub fn placeholder(self) -> &'static str {
        match self {
            Token::Username => "{{username}}",
            Token::PostUrl => "{{post_url}}",
            Token::PostTitle => "{{post_title}}",
            Token::Comments => "{{comments}}",
        }
    }

    /// Token whose placeholder starts `input`, if any
    pub(crate) fn match_prefix(input: &str) -> Option<Token> {
        Token::ALL
            .into_iter()
            .find(|token| input.starts_with(token.placeholder()))
    }
}

/// Values to substitute, keyed by token.
///
/// Values are inserted verbatim; callers escape them for the output context.
/// `for_content` and `with_username` do that for the notification body.
#[derive(Debug, Clone, Default)]
pub struct TemplateBindings {
    values: HashMap<Token, String>,
}

impl TemplateBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, token: Token, value: impl Into<String>) -> Self {
        self.values.insert(token, value.into());
        self
    }

    pub fn get(&self, token: Token) -> Option<&str> {
        self.values.get(&token).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Item-level bindings: URL as-is, title and comment HTML-escaped
    pub fn for_content(item: &ContentItem, comment: &str) -> Self {
        Self::new()
            .bind(Token::PostUrl, item.url.clone())
            .bind(Token::PostTitle, escape_html(&item.title))
            .bind(Token::Comments, escape_html(comment))
    }

    /// Recipient-level binding: display name HTML-escaped
    pub fn with_username(display_name: &str) -> Self {
        Self::new().bind(Token::Username, escape_html(display_name))
    }
}
