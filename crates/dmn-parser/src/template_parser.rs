//! Template parser
//!
//! A template is text with embedded `${expression}` segments. Text without
//! any `${` is a single text segment.

use crate::error::{ParseError, Result};
use crate::expression_parser::ExpressionParser;
use dmn_core::ast::{Template, TemplateSegment};

pub struct TemplateParser;

impl TemplateParser {
    pub fn parse(input: &str) -> Result<Template> {
        let mut segments = Vec::new();
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            if start > 0 {
                segments.push(TemplateSegment::Text(rest[..start].to_string()));
            }
            let body_start = start + 2;
            let body_len = Self::find_closing_brace(&rest[body_start..])
                .ok_or_else(|| ParseError::UnterminatedTemplate(input.to_string()))?;
            let body = &rest[body_start..body_start + body_len];
            segments.push(TemplateSegment::Expression(ExpressionParser::parse(body)?));
            rest = &rest[body_start + body_len + 1..];
        }

        if !rest.is_empty() {
            segments.push(TemplateSegment::Text(rest.to_string()));
        }

        Ok(Template { segments })
    }

    /// True if the text opens with `${`
    ///
    /// Anything else is an expression body that still needs its delimiters,
    /// even when a `${` appears further in.
    pub fn is_template(input: &str) -> bool {
        input.trim_start().starts_with("${")
    }

    /// Offset of the `}` closing an expression body, skipping string literals
    fn find_closing_brace(body: &str) -> Option<usize> {
        let mut in_string = false;
        let mut escaped = false;
        for (i, b) in body.bytes().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'}' => return Some(i),
                _ => {}
            }
        }
        None
    }
}
