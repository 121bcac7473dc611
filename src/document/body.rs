// ABOUTME: Body rendering interface for converted documents
// ABOUTME: The markup renderer is pluggable; the default passes the body through unchanged

use super::error::Result;

/// Converts a document body into the output format placed in the template context
pub trait BodyRenderer: Send + Sync {
    fn render(&self, body: &str) -> Result<String>;
}

/// Leaves the body exactly as written
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenderer;

impl BodyRenderer for PassthroughRenderer {
    fn render(&self, body: &str) -> Result<String> {
        Ok(body.to_string())
    }
}

impl<F> BodyRenderer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn render(&self, body: &str) -> Result<String> {
        self(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentError;

    #[test]
    fn test_passthrough() {
        assert_eq!(PassthroughRenderer.render("*text*\n").unwrap(), "*text*\n");
    }

    #[test]
    fn test_closure_renderer() {
        let shout = |body: &str| -> Result<String> { Ok(body.to_uppercase()) };
        assert_eq!(shout.render("quiet").unwrap(), "QUIET");

        let failing =
            |_: &str| -> Result<String> { Err(DocumentError::BodyRender("bad input".into())) };
        assert!(failing.render("x").is_err());
    }
}
