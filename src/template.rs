//! Handlers that render a fixed body template with path parameters.
//!
//! Used by the `rexroute` binary to serve routes declared in a config file.
//! A template is plain text where `{name}` is replaced by the value of the
//! path parameter `name`. Placeholders naming no parameter are kept verbatim.

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::handler::Handler;
use crate::router::PathParams;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Parsed body template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTemplate {
    segments: Vec<Segment>,
}

impl BodyTemplate {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = text;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_param_name(&after[..close]) => {
                    if open > 0 {
                        segments.push(Segment::Literal(rest[..open].to_string()));
                    }
                    segments.push(Segment::Param(after[..close].to_string()));
                    rest = &after[close + 1..];
                }
                _ => {
                    segments.push(Segment::Literal(rest[..=open].to_string()));
                    rest = after;
                }
            }
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Self { segments }
    }

    /// Names of all placeholders, in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    #[must_use]
    pub fn render(&self, params: &PathParams) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(name) => match params.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

fn is_param_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Handler answering with a fixed status and a rendered [`BodyTemplate`]
#[derive(Debug, Clone)]
pub struct TemplateHandler {
    status: u16,
    content_type: &'static str,
    template: BodyTemplate,
}

impl TemplateHandler {
    #[must_use]
    pub fn new(status: u16, content_type: &'static str, template: &str) -> Self {
        Self {
            status,
            content_type,
            template: BodyTemplate::parse(template),
        }
    }
}

impl Handler for TemplateHandler {
    fn serve(&self, _req: &HandlerRequest, res: &mut HandlerResponse, params: &PathParams) {
        res.set_status(self.status)
            .set_content_type(self.content_type);
        res.body = self.template.render(params).into_bytes();
    }
}
