//! Structural LaTeX parser.
//!
//! Turns document text into a tree of commands, environments, brace groups and text runs. It
//! does not know any LaTeX semantics beyond what a [`Format`] tells it: which commands take
//! arguments (and of what shape), and which environments hold raw text. Everything else is
//! carried through as opaque content.
//!
//! The parser works with an explicit stack of open frames rather than recursion, so deeply
//! nested input cannot overflow the call stack. Unbalanced input is a [`ParseDefect`]; nothing
//! is patched up.

use crate::error::ParseDefect;
use crate::formats::Format;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One node of the parsed tree.
pub enum Node {
    /// A control sequence, with any arguments its format declares.
    Command(Command),
    /// A `\begin{..} .. \end{..}` block.
    Environment(Environment),
    /// A bare `{ .. }` group.
    Group(Group),
    /// A run of text, including raw verbatim content.
    Text(Text),
}

impl Node {
    #[must_use]
    /// Byte range of the node in the source.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Command(c) => c.span.clone(),
            Self::Environment(e) => e.span.clone(),
            Self::Group(g) => g.span.clone(),
            Self::Text(t) => t.span.clone(),
        }
    }

    #[must_use]
    /// Nested nodes in document order. Command arguments are not children; see [`Command::args`].
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Environment(e) => &e.children,
            Self::Group(g) => &g.children,
            Self::Command(_) | Self::Text(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A control sequence such as `\section*{Intro}`.
pub struct Command {
    /// Name without the backslash.
    pub name: String,
    /// Whether a `*` followed the name (only detected for commands declaring one).
    pub starred: bool,
    /// Parsed arguments in source order.
    pub args: Vec<Argument>,
    /// Byte range from the backslash to the end of the last argument.
    pub span: Range<usize>,
}

impl Command {
    /// Braced arguments, skipping optional ones.
    pub fn mandatory_args(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|a| !a.optional)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One argument of a command.
pub struct Argument {
    /// `[..]` rather than `{..}`.
    pub optional: bool,
    /// Source text between the delimiters.
    pub raw: String,
    /// Parsed content of the argument.
    pub children: Vec<Node>,
    /// Byte range of the content, delimiters excluded.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A `\begin{name} .. \end{name}` block.
pub struct Environment {
    /// Environment name.
    pub name: String,
    /// Whether the body was captured raw.
    pub verbatim: bool,
    /// Body content.
    pub children: Vec<Node>,
    /// Byte range from `\begin` to the end of `\end{..}`.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A brace group that is not a command argument.
pub struct Group {
    /// Group content.
    pub children: Vec<Node>,
    /// Byte range including both braces.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Plain text.
pub struct Text {
    /// The text itself.
    pub text: String,
    /// Byte range of the text.
    pub span: Range<usize>,
}

/// Parse `source` into top-level nodes.
///
/// # Errors
///
/// Returns a [`ParseDefect`] for unbalanced braces, brackets or environments, and for
/// `\begin`/`\end`/`\verb` without their delimiters. A command missing a mandatory argument
/// is kept with the arguments read so far.
pub fn parse<F: Format + ?Sized>(source: &str, format: &F) -> Result<Vec<Node>, ParseDefect> {
    Parser {
        source,
        format,
        pos: 0,
        text_start: None,
        stack: vec![Frame::new(FrameKind::Root, 0)],
    }
    .run()
}

/// A command whose arguments are still being read.
struct PendingCommand {
    name: String,
    starred: bool,
    args: Vec<Argument>,
    spec: Vec<char>,
    next: usize,
    start: usize,
}

enum FrameKind {
    Root,
    Group,
    Environment(String),
    Argument {
        command: PendingCommand,
        optional: bool,
        /// Unmatched `[` seen so far inside an optional argument.
        depth: usize,
    },
}

struct Frame {
    kind: FrameKind,
    /// Opening delimiter for groups and environments, content start for arguments.
    start: usize,
    children: Vec<Node>,
}

impl Frame {
    fn new(kind: FrameKind, start: usize) -> Self {
        Self {
            kind,
            start,
            children: Vec::new(),
        }
    }
}

struct Parser<'s, 'f, F: ?Sized> {
    source: &'s str,
    format: &'f F,
    pos: usize,
    text_start: Option<usize>,
    stack: Vec<Frame>,
}

impl<F: Format + ?Sized> Parser<'_, '_, F> {
    fn run(mut self) -> Result<Vec<Node>, ParseDefect> {
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.flush_text();
                    self.control_sequence()?;
                }
                '{' => {
                    self.flush_text();
                    self.stack.push(Frame::new(FrameKind::Group, self.pos));
                    self.pos += 1;
                }
                '}' => {
                    self.flush_text();
                    self.close_brace()?;
                }
                '[' | ']' if self.in_optional_argument() => {
                    if self.nest_bracket(c) {
                        self.flush_text();
                        let content_end = self.pos;
                        self.pos += 1;
                        self.close_frame(content_end)?;
                    } else {
                        self.text_start.get_or_insert(self.pos);
                        self.pos += 1;
                    }
                }
                '%' => {
                    self.flush_text();
                    self.skip_comment();
                }
                _ => {
                    self.text_start.get_or_insert(self.pos);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.flush_text();
        self.finish()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn defect(&self, offset: usize, message: impl Into<String>) -> ParseDefect {
        ParseDefect::at(self.source, offset, message)
    }

    fn push_node(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn flush_text(&mut self) {
        if let Some(start) = self.text_start.take() {
            if start < self.pos {
                self.push_node(Node::Text(Text {
                    text: self.source[start..self.pos].to_string(),
                    span: start..self.pos,
                }));
            }
        }
    }

    fn skip_comment(&mut self) {
        self.pos = self.source[self.pos..]
            .find('\n')
            .map_or(self.source.len(), |i| self.pos + i);
    }

    fn in_optional_argument(&self) -> bool {
        matches!(
            self.stack.last().map(|f| &f.kind),
            Some(FrameKind::Argument { optional: true, .. })
        )
    }

    /// Track bracket nesting in the open optional argument; `true` when `c` closes it.
    fn nest_bracket(&mut self, c: char) -> bool {
        let Some(Frame {
            kind: FrameKind::Argument { depth, .. },
            ..
        }) = self.stack.last_mut()
        else {
            return false;
        };
        match c {
            '[' => {
                *depth += 1;
                false
            }
            _ if *depth == 0 => true,
            _ => {
                *depth -= 1;
                false
            }
        }
    }

    /// Offset past the whitespace preceding `expected`, if `expected` comes next.
    ///
    /// Whitespace may span at most one line break; a blank line ends the lookahead.
    fn lookahead(&self, expected: char) -> Option<usize> {
        let mut newlines = 0;
        for (i, c) in self.source[self.pos..].char_indices() {
            match c {
                ' ' | '\t' | '\r' => {}
                '\n' => {
                    newlines += 1;
                    if newlines > 1 {
                        return None;
                    }
                }
                c if c == expected => return Some(self.pos + i),
                _ => return None,
            }
        }
        None
    }

    fn control_sequence(&mut self) -> Result<(), ParseDefect> {
        let source = self.source;
        let start = self.pos;
        self.pos += 1;
        let rest = &source[self.pos..];
        let letters = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
        let name_len = if letters > 0 {
            letters
        } else if let Some(symbol) = rest.chars().next() {
            symbol.len_utf8()
        } else {
            self.push_node(Node::Text(Text {
                text: "\\".to_string(),
                span: start..self.pos,
            }));
            return Ok(());
        };
        let name = rest[..name_len].to_string();
        self.pos += name_len;

        match name.as_str() {
            "begin" => self.begin_environment(start),
            "end" => self.end_environment(start),
            "verb" => self.inline_verbatim(start),
            _ => {
                if let Some(spec) = self.format.argument_spec(&name) {
                    let pending = PendingCommand {
                        name,
                        starred: false,
                        args: Vec::new(),
                        spec: spec.chars().collect(),
                        next: 0,
                        start,
                    };
                    self.advance_command(pending)
                } else {
                    self.push_node(Node::Command(Command {
                        name,
                        starred: false,
                        args: Vec::new(),
                        span: start..self.pos,
                    }));
                    Ok(())
                }
            }
        }
    }

    /// Read the next declared argument of `pending`, or emit it once none remain.
    fn advance_command(&mut self, mut pending: PendingCommand) -> Result<(), ParseDefect> {
        while let Some(&shape) = pending.spec.get(pending.next) {
            pending.next += 1;
            match shape {
                '*' => {
                    if self.peek() == Some('*') {
                        self.pos += 1;
                        pending.starred = true;
                    }
                }
                '[' | '{' => {
                    let optional = shape == '[';
                    match self.lookahead(shape) {
                        Some(open) => {
                            self.pos = open + 1;
                            self.stack.push(Frame::new(
                                FrameKind::Argument {
                                    command: pending,
                                    optional,
                                    depth: 0,
                                },
                                self.pos,
                            ));
                            return Ok(());
                        }
                        None if optional => {}
                        // `\let\oldref\ref` and `\titleformat{\section}` name a command
                        // without calling it.
                        None => break,
                    }
                }
                _ => {}
            }
        }
        self.push_node(Node::Command(Command {
            name: pending.name,
            starred: pending.starred,
            args: pending.args,
            span: pending.start..self.pos,
        }));
        Ok(())
    }

    fn close_brace(&mut self) -> Result<(), ParseDefect> {
        let at = self.pos;
        let closes = matches!(
            self.stack.last().map(|f| &f.kind),
            Some(FrameKind::Group | FrameKind::Argument { optional: false, .. })
        );
        if !closes {
            return Err(self.defect(at, "unmatched '}'"));
        }
        self.pos += 1;
        self.close_frame(at)
    }

    /// Pop the innermost frame and attach what it built to its parent.
    fn close_frame(&mut self, content_end: usize) -> Result<(), ParseDefect> {
        if self.stack.len() < 2 {
            return Ok(());
        }
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        match frame.kind {
            FrameKind::Root => Ok(()),
            FrameKind::Group => {
                self.push_node(Node::Group(Group {
                    children: frame.children,
                    span: frame.start..self.pos,
                }));
                Ok(())
            }
            FrameKind::Environment(name) => {
                self.push_node(Node::Environment(Environment {
                    name,
                    verbatim: false,
                    children: frame.children,
                    span: frame.start..self.pos,
                }));
                Ok(())
            }
            FrameKind::Argument {
                mut command,
                optional,
                ..
            } => {
                command.args.push(Argument {
                    optional,
                    raw: self.source[frame.start..content_end].to_string(),
                    children: frame.children,
                    span: frame.start..content_end,
                });
                self.advance_command(command)
            }
        }
    }

    /// Read the `{name}` following `\begin` or `\end`.
    fn environment_name(&mut self, start: usize, keyword: &str) -> Result<String, ParseDefect> {
        let missing = || format!("\\{keyword} without an environment name");
        let Some(open) = self.lookahead('{') else {
            return Err(self.defect(start, missing()));
        };
        let Some(len) = self.source[open + 1..].find('}') else {
            return Err(self.defect(start, missing()));
        };
        let name = self.source[open + 1..open + 1 + len].trim().to_string();
        if name.is_empty() {
            return Err(self.defect(start, missing()));
        }
        self.pos = open + 1 + len + 1;
        Ok(name)
    }

    fn begin_environment(&mut self, start: usize) -> Result<(), ParseDefect> {
        let name = self.environment_name(start, "begin")?;
        if !self.format.is_verbatim(&name) {
            self.stack
                .push(Frame::new(FrameKind::Environment(name), start));
            return Ok(());
        }

        let terminator = format!("\\end{{{name}}}");
        let body_start = self.pos;
        let Some(len) = self.source[body_start..].find(&terminator) else {
            return Err(self.defect(start, format!("environment '{name}' is never closed")));
        };
        let body_end = body_start + len;
        self.pos = body_end + terminator.len();
        let children = if body_end > body_start {
            vec![Node::Text(Text {
                text: self.source[body_start..body_end].to_string(),
                span: body_start..body_end,
            })]
        } else {
            Vec::new()
        };
        self.push_node(Node::Environment(Environment {
            name,
            verbatim: true,
            children,
            span: start..self.pos,
        }));
        Ok(())
    }

    fn end_environment(&mut self, start: usize) -> Result<(), ParseDefect> {
        let name = self.environment_name(start, "end")?;
        let open = match self.stack.last().map(|f| &f.kind) {
            Some(FrameKind::Environment(open)) => open.clone(),
            Some(FrameKind::Group | FrameKind::Argument { .. }) => {
                return Err(self.defect(start, format!("\\end{{{name}}} inside an unclosed group")));
            }
            Some(FrameKind::Root) | None => {
                return Err(self.defect(start, format!("\\end{{{name}}} without matching \\begin")));
            }
        };
        if open != name {
            return Err(self.defect(
                start,
                format!("\\end{{{name}}} does not match \\begin{{{open}}}"),
            ));
        }
        self.close_frame(start)
    }

    /// `\verb|..|` content is opaque and may contain unbalanced braces.
    fn inline_verbatim(&mut self, start: usize) -> Result<(), ParseDefect> {
        if self.peek() == Some('*') {
            self.pos += 1;
        }
        let unterminated = || "unterminated \\verb".to_string();
        let Some(delimiter) = self.peek().filter(|c| !c.is_whitespace()) else {
            return Err(self.defect(start, unterminated()));
        };
        let body_start = self.pos + delimiter.len_utf8();
        let line = self.source[body_start..]
            .split('\n')
            .next()
            .unwrap_or_default();
        let Some(len) = line.find(delimiter) else {
            return Err(self.defect(start, unterminated()));
        };
        self.pos = body_start + len + delimiter.len_utf8();
        self.push_node(Node::Text(Text {
            text: self.source[start..self.pos].to_string(),
            span: start..self.pos,
        }));
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Node>, ParseDefect> {
        if let Some(frame) = self.stack.last().filter(|_| self.stack.len() > 1) {
            let message = match &frame.kind {
                FrameKind::Group | FrameKind::Root => "unclosed '{'".to_string(),
                FrameKind::Environment(name) => format!("environment '{name}' is never closed"),
                FrameKind::Argument { command, optional, .. } => format!(
                    "unclosed {} argument of \\{}",
                    if *optional { "optional" } else { "mandatory" },
                    command.name
                ),
            };
            let offset = match frame.kind {
                FrameKind::Group | FrameKind::Environment(_) | FrameKind::Root => frame.start,
                FrameKind::Argument { .. } => frame.start.saturating_sub(1),
            };
            return Err(self.defect(offset, message));
        }
        Ok(self.stack.pop().map(|root| root.children).unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "tests/latex.rs"]
mod tests;
