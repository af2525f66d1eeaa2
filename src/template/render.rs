//! Single-pass placeholder substitution.
//!
//! A template is split once into literal text and token slots. Rendering
//! walks the slots and never looks at substituted text again, so a value that
//! contains a placeholder string (e.g. a comment reading `{{username}}`) is
//! emitted literally.

use super::types::{TemplateBindings, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Token),
}

/// A parsed template, ready for (partial) rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find("{{") {
            literal.push_str(&rest[..pos]);
            rest = &rest[pos..];

            match Token::match_prefix(rest) {
                Some(token) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(token));
                    rest = &rest[token.placeholder().len()..];
                }
                None => {
                    // Unknown placeholder, keep the braces verbatim
                    literal.push_str("{{");
                    rest = &rest[2..];
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Fill the bound slots with literal text, leaving unbound slots open.
    pub fn bind(&self, bindings: &TemplateBindings) -> CompiledTemplate {
        let mut segments: Vec<Segment> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            let resolved = match segment {
                Segment::Slot(token) => match bindings.get(*token) {
                    Some(value) => Segment::Literal(value.to_string()),
                    None => Segment::Slot(*token),
                },
                Segment::Literal(text) => Segment::Literal(text.clone()),
            };

            // Merge adjacent literals so later renders stay cheap
            if let Segment::Literal(text) = &resolved {
                if let Some(Segment::Literal(prev)) = segments.last_mut() {
                    prev.push_str(text);
                    continue;
                }
            }
            segments.push(resolved);
        }

        CompiledTemplate { segments }
    }

    /// Render to a string; unbound slots are written back as placeholders.
    pub fn render(&self, bindings: &TemplateBindings) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Slot(token) => {
                    output.push_str(bindings.get(*token).unwrap_or(token.placeholder()))
                }
            }
        }
        output
    }

    /// Tokens still open in this template
    pub fn open_tokens(&self) -> Vec<Token> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Slot(token) => Some(*token),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

/// Substitute recognized placeholders in `template`
pub fn render(template: &str, bindings: &TemplateBindings) -> String {
    CompiledTemplate::parse(template).render(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_bindings() -> TemplateBindings {
        TemplateBindings::new()
            .bind(Token::PostUrl, "https://x/1")
            .bind(Token::PostTitle, "Hi")
            .bind(Token::Comments, "ok")
    }

    #[test]
    fn test_render_known_tokens() {
        let output = render("{{post_title}}: {{comments}} ({{post_url}})", &post_bindings());
        assert_eq!(output, "Hi: ok (https://x/1)");
    }

    #[test]
    fn test_unknown_and_unbound_tokens_verbatim() {
        let output = render("{{greeting}} {{username}}, {{post_title}}", &post_bindings());
        assert_eq!(output, "{{greeting}} {{username}}, Hi");
    }

    #[test]
    fn test_case_sensitive() {
        let output = render("{{POST_TITLE}} {{post_title}}", &post_bindings());
        assert_eq!(output, "{{POST_TITLE}} Hi");
    }

    #[test]
    fn test_repeated_token() {
        let output = render("{{post_title}}/{{post_title}}", &post_bindings());
        assert_eq!(output, "Hi/Hi");
    }

    #[test]
    fn test_values_not_rescanned() {
        let bindings = TemplateBindings::new()
            .bind(Token::Comments, "{{username}}")
            .bind(Token::Username, "Ann");
        assert_eq!(render("{{comments}}|{{username}}", &bindings), "{{username}}|Ann");
    }

    #[test]
    fn test_partial_bind_keeps_values_literal() {
        let base = CompiledTemplate::parse("Hi {{username}}: {{comments}}").bind(
            &TemplateBindings::new().bind(Token::Comments, "see {{username}}"),
        );
        assert_eq!(base.open_tokens(), vec![Token::Username]);

        let output = base.render(&TemplateBindings::new().bind(Token::Username, "Bo"));
        assert_eq!(output, "Hi Bo: see {{username}}");
    }

    #[test]
    fn test_idempotent_without_tokens() {
        let template = "<p>No placeholders {here} or {{there</p>";
        let once = render(template, &post_bindings());
        assert_eq!(once, template);
        assert_eq!(render(&once, &post_bindings()), once);
    }

    #[test]
    fn test_dangling_braces() {
        assert_eq!(render("{{", &post_bindings()), "{{");
        assert_eq!(render("a{{post_title", &post_bindings()), "a{{post_title");
        assert_eq!(render("", &post_bindings()), "");
    }

    #[test]
    fn test_multibyte_text_around_tokens() {
        let output = render("€ {{post_title}} ✓ ü", &post_bindings());
        assert_eq!(output, "€ Hi ✓ ü");
    }
}
