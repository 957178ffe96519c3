//! Builder-pattern printer for rendering syntax errors.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use super::SyntaxErrors;

/// Builder for rendering syntax errors against their source.
pub struct SyntaxErrorsPrinter<'e, 's> {
    errors: &'e SyntaxErrors,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> SyntaxErrorsPrinter<'e, 's> {
    pub fn new(errors: &'e SyntaxErrors) -> Self {
        Self {
            errors,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, error) in self.errors.iter().enumerate() {
            let mut snippet = Snippet::source(source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(adjust_range(error.range.clone(), source.len()))
                    .label(&error.message),
            );
            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let report = vec![Level::ERROR.primary_title(&error.message).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{error}")?;
        }
        Ok(())
    }
}

/// Zero-width errors still get a caret.
fn adjust_range(range: Range<usize>, limit: usize) -> Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range
}
