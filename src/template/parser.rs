// ABOUTME: Recursive-descent compiler from template source text to a Template
// ABOUTME: Handles $var$, $$, $if$/$else$/$endif$, $for$/$sep$/$endfor$ and paired newline swallowing

use tracing::debug;

use super::ast::{Node, Reference, Template};
use super::error::{Result, TemplateError};

/// Default maximum depth of nested conditionals and loops
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Maximum number of characters shown in a syntax error excerpt
const EXCERPT_CHARS: usize = 40;

impl Template {
    /// Compile template source with the default nesting limit
    pub fn compile(source: &str) -> Result<Self> {
        compile_with_limit(source, DEFAULT_MAX_DEPTH)
    }

    /// Compile template source, rejecting nesting deeper than `max_depth`
    pub fn compile_with_limit(source: &str, max_depth: usize) -> Result<Self> {
        compile_with_limit(source, max_depth)
    }
}

/// Compile template source with the default nesting limit
pub fn compile(source: &str) -> Result<Template> {
    compile_with_limit(source, DEFAULT_MAX_DEPTH)
}

/// Compile template source, rejecting nesting deeper than `max_depth`
pub fn compile_with_limit(source: &str, max_depth: usize) -> Result<Template> {
    let mut parser = Parser::new(source, max_depth);
    let nodes = parser.template()?;

    if parser.pos < source.len() {
        let err = parser.failure();
        debug!("Template compilation failed: {}", err);
        return Err(err);
    }

    debug!(
        "Compiled template: {} bytes into {} top-level nodes",
        source.len(),
        nodes.len()
    );
    Ok(Template::from_nodes(nodes))
}

/// Which delimiters close a block and split it in two
struct BlockSyntax {
    open: &'static str,
    middle: &'static str,
    close: &'static str,
}

const CONDITIONAL: BlockSyntax = BlockSyntax {
    open: "$if(",
    middle: "$else$",
    close: "$endif$",
};

const LOOP: BlockSyntax = BlockSyntax {
    open: "$for(",
    middle: "$sep$",
    close: "$endfor$",
};

type Branches = (Vec<Node>, Option<Vec<Node>>);

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    /// Furthest offset at which an expected token was missing
    furthest: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, max_depth: usize) -> Self {
        Self {
            source,
            pos: 0,
            furthest: 0,
            depth: 0,
            max_depth,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn miss(&mut self) {
        self.furthest = self.furthest.max(self.pos);
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            self.miss();
            false
        }
    }

    fn eat_newline(&mut self) -> bool {
        let len = if self.rest().starts_with("\r\n") {
            2
        } else if self.rest().starts_with('\n') {
            1
        } else {
            return false;
        };
        self.pos += len;
        true
    }

    /// Zero or more template elements, in priority order
    fn template(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            if let Some(node) = self.control()? {
                nodes.push(node);
            } else if let Some(reference) = self.variable() {
                nodes.push(Node::Variable(reference));
            } else if self.eat("$$") {
                push_literal(&mut nodes, "$");
            } else if let Some(text) = self.literal_run() {
                push_literal(&mut nodes, text);
            } else {
                break;
            }
        }
        Ok(nodes)
    }

    fn control(&mut self) -> Result<Option<Node>> {
        if let Some((reference, (then_branch, else_branch))) = self.block(&CONDITIONAL)? {
            return Ok(Some(Node::Conditional {
                reference,
                then_branch,
                else_branch,
            }));
        }
        Ok(self
            .block(&LOOP)?
            .map(|(reference, (body, separator))| Node::Loop {
                reference,
                body,
                separator,
            }))
    }

    fn block(&mut self, syntax: &BlockSyntax) -> Result<Option<(Reference, Branches)>> {
        let start = self.pos;
        let Some(reference) = self.open_tag(syntax.open) else {
            return Ok(None);
        };

        if self.depth >= self.max_depth {
            return Err(TemplateError::NestingTooDeep {
                line: line_number(self.source, start),
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let branches = self.block_contents(syntax)?;
        self.depth -= 1;

        match branches {
            Some(branches) => Ok(Some((reference, branches))),
            None => {
                self.pos = start;
                Ok(None)
            }
        }
    }

    /// A newline after the open tag is swallowed only if the close tag is
    /// also followed by one. Otherwise it stays at the front of the body.
    fn block_contents(&mut self, syntax: &BlockSyntax) -> Result<Option<Branches>> {
        let after_open = self.pos;
        let opened_line = self.eat_newline();
        let newline = &self.source[after_open..self.pos];

        let Some((mut first, second)) = self.branches(syntax)? else {
            return Ok(None);
        };
        if opened_line && !self.eat_newline() {
            prepend_literal(&mut first, newline);
        }
        Ok(Some((first, second)))
    }

    fn branches(&mut self, syntax: &BlockSyntax) -> Result<Option<Branches>> {
        let first = self.template()?;
        let second = if self.eat(syntax.middle) {
            Some(self.template()?)
        } else {
            None
        };

        if self.eat(syntax.close) {
            Ok(Some((first, second)))
        } else {
            Ok(None)
        }
    }

    /// `open Reference ")$"`
    fn open_tag(&mut self, open: &str) -> Option<Reference> {
        let start = self.pos;
        if !self.eat(open) {
            return None;
        }
        match self.reference() {
            Some(reference) if self.eat(")$") => Some(reference),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    /// `"$" Reference "$"` where the reference does not start with a keyword
    fn variable(&mut self) -> Option<Reference> {
        let start = self.pos;
        if !self.eat("$") {
            return None;
        }
        match self.reference() {
            Some(reference) if !reference.is_reserved() && self.eat("$") => Some(reference),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    fn reference(&mut self) -> Option<Reference> {
        let mut components = vec![self.name()?];
        while self.rest().starts_with('.') {
            let before_dot = self.pos;
            self.pos += 1;
            match self.name() {
                Some(name) => components.push(name),
                None => {
                    self.pos = before_dot;
                    break;
                }
            }
        }
        Reference::new(components)
    }

    fn name(&mut self) -> Option<String> {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_name_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len == 0 {
            self.miss();
            return None;
        }
        self.pos += len;
        Some(rest[..len].to_string())
    }

    fn literal_run(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.find('$').unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn failure(&self) -> TemplateError {
        let offset = self.furthest;
        let line = line_number(self.source, offset);
        let excerpt: String = self.source[offset..].chars().take(EXCERPT_CHARS).collect();
        if excerpt.is_empty() {
            TemplateError::UnexpectedEnd { line }
        } else {
            TemplateError::Syntax { line, excerpt }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn line_number(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn prepend_literal(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Literal(first)) = nodes.first_mut() {
        first.insert_str(0, text);
    } else {
        nodes.insert(0, Node::Literal(text.to_string()));
    }
}

fn push_literal(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Literal(previous)) = nodes.last_mut() {
        previous.push_str(text);
    } else {
        nodes.push(Node::Literal(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(path: &str) -> Reference {
        Reference::new(path.split('.')).unwrap()
    }

    fn literal(text: &str) -> Node {
        Node::Literal(text.to_string())
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        let template = compile("Hello, world!\nSecond line").unwrap();
        assert_eq!(template.nodes(), &[literal("Hello, world!\nSecond line")]);
    }

    #[test]
    fn test_empty_source() {
        assert!(compile("").unwrap().is_empty());
    }

    #[test]
    fn test_variables_and_escapes() {
        let template = compile("price: $$5 for $item.name$").unwrap();
        assert_eq!(
            template.nodes(),
            &[
                literal("price: $5 for "),
                Node::Variable(reference("item.name")),
            ]
        );
    }

    #[test]
    fn test_name_characters() {
        let template = compile("$page-title_2$").unwrap();
        assert_eq!(template.nodes(), &[Node::Variable(reference("page-title_2"))]);
    }

    #[test]
    fn test_conditional_with_else() {
        let template = compile("$if(x)$A$else$B$endif$").unwrap();
        assert_eq!(
            template.nodes(),
            &[Node::Conditional {
                reference: reference("x"),
                then_branch: vec![literal("A")],
                else_branch: Some(vec![literal("B")]),
            }]
        );
    }

    #[test]
    fn test_loop_with_separator() {
        let template = compile("$for(items)$$items$$sep$, $endfor$").unwrap();
        assert_eq!(
            template.nodes(),
            &[Node::Loop {
                reference: reference("items"),
                body: vec![Node::Variable(reference("items"))],
                separator: Some(vec![literal(", ")]),
            }]
        );
    }

    #[test]
    fn test_paired_newlines_are_swallowed() {
        let template = compile("$if(x)$\nA\n$endif$\nrest").unwrap();
        assert_eq!(
            template.nodes(),
            &[
                Node::Conditional {
                    reference: reference("x"),
                    then_branch: vec![literal("A\n")],
                    else_branch: None,
                },
                literal("rest"),
            ]
        );
    }

    #[test]
    fn test_unpaired_newline_is_kept() {
        // newline after the open tag only: neither newline is swallowed
        let template = compile("$if(x)$\nA$endif$ tail").unwrap();
        assert_eq!(
            template.nodes(),
            &[
                Node::Conditional {
                    reference: reference("x"),
                    then_branch: vec![literal("\nA")],
                    else_branch: None,
                },
                literal(" tail"),
            ]
        );

        // newline after the close tag only
        let template = compile("$for(x)$A$endfor$\n").unwrap();
        assert_eq!(
            template.nodes(),
            &[
                Node::Loop {
                    reference: reference("x"),
                    body: vec![literal("A")],
                    separator: None,
                },
                literal("\n"),
            ]
        );
    }

    #[test]
    fn test_crlf_newlines_are_swallowed() {
        let template = compile("$if(x)$\r\nA\r\n$endif$\r\n").unwrap();
        assert_eq!(
            template.nodes(),
            &[Node::Conditional {
                reference: reference("x"),
                then_branch: vec![literal("A\r\n")],
                else_branch: None,
            }]
        );
    }

    #[test]
    fn test_nested_blocks() {
        let template = compile("$for(a)$$if(a.b)$[$a.b$]$endif$$endfor$").unwrap();
        assert_eq!(template.depth(), 2);
    }

    #[test]
    fn test_reserved_word_is_not_a_variable() {
        let err = compile("$endif$").unwrap_err();
        assert_eq!(
            err,
            TemplateError::Syntax {
                line: 1,
                excerpt: "$endif$".to_string(),
            }
        );
        assert!(compile("$sep.x$").is_err());
        // keywords are only reserved as the first component
        assert!(compile("$x.if$ $iffy$").is_ok());
    }

    #[test]
    fn test_missing_endif_fails_at_end() {
        let err = compile("$if(x)$A").unwrap_err();
        assert_eq!(err, TemplateError::UnexpectedEnd { line: 1 });
    }

    #[test]
    fn test_failure_line_and_excerpt() {
        let err = compile("line one\nline two\n$if(x)$ body $endfor$ after").unwrap_err();
        assert_eq!(err.line(), 3);
        assert_eq!(err.excerpt(), "$endfor$ after");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let source = format!("$endfor${}", "x".repeat(100));
        let err = compile(&source).unwrap_err();
        assert_eq!(err.excerpt().chars().count(), EXCERPT_CHARS);
    }

    #[test]
    fn test_unterminated_variable() {
        let err = compile("Hello $name").unwrap_err();
        assert!(err.is_at_end());

        let err = compile("Hello $name and more").unwrap_err();
        assert_eq!(err.excerpt(), " and more");
    }

    #[test]
    fn test_lone_dollar_fails() {
        assert!(compile("cost: $ 5").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("{}x{}", "$if(a)$".repeat(3), "$endif$".repeat(3));
        assert!(compile_with_limit(&source, 3).is_ok());

        let err = compile_with_limit(&source, 2).unwrap_err();
        assert_eq!(err, TemplateError::NestingTooDeep { line: 1, limit: 2 });
    }

    #[test]
    fn test_unpaired_newline_before_nested_block() {
        // the kept newline becomes its own literal ahead of the inner block
        let template = compile("$if(a)$\n$if(b)$x$endif$$endif$").unwrap();
        assert_eq!(
            template.nodes(),
            &[Node::Conditional {
                reference: reference("a"),
                then_branch: vec![
                    literal("\n"),
                    Node::Conditional {
                        reference: reference("b"),
                        then_branch: vec![literal("x")],
                        else_branch: None,
                    },
                ],
                else_branch: None,
            }]
        );
    }

    #[test]
    fn test_many_deep_unpaired_blocks() {
        let nested = format!("{}x{}", "$for(a)$\n".repeat(60), "$endfor$".repeat(60));
        let source = nested.repeat(200);
        let template = compile(&source).unwrap();
        assert_eq!(template.nodes().len(), 200);
        assert_eq!(template.depth(), 60);
    }

    #[test]
    fn test_deep_unpaired_newlines_parse_quickly() {
        // every block has a newline after its open tag but not its close tag
        let depth = 40;
        let source = format!("{}x{}", "$if(a)$\n".repeat(depth), "$endif$".repeat(depth));
        let template = compile(&source).unwrap();
        assert_eq!(template.depth(), depth);
    }
}
