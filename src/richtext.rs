//! Inline styled-text spans and the small markup syntax the report copy is
//! written in.
//!
//! Narrative pages are authored as strings using `**bold**`, `*italic*` and
//! `[color=#RRGGBB]{text}` and parsed into [`Span`]s, which convert straight
//! into [`genpdf::style::StyledString`] values for rendering.

use std::fmt;

use genpdf::style::{Color, Style, StyledString};

/// A fragment of text with inline styling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        span.to_styled_string()
    }
}

/// Parse errors produced by [`parse_markup`], with the byte index where the
/// problem was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

/// Parses the report markup into a list of [`Span`]s.
///
/// Constructs may nest (italic inside bold, color around either); the parser
/// validates strictly and reports malformed input with a position.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    Parser {
        input,
        pos: 0,
        spans: Vec::new(),
    }
    .run()
}

#[derive(Clone, Copy, Debug, Default)]
struct Attrs {
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Attrs {
    fn span(self, text: String) -> Span {
        Span {
            text,
            bold: self.bold,
            italic: self.italic,
            color: self.color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Delimiter {
    Bold,
    Italic,
    Brace,
}

impl Delimiter {
    fn token(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
            Self::Brace => "}",
        }
    }

    fn what(self) -> &'static str {
        match self {
            Self::Bold => "bold span",
            Self::Italic => "italic span",
            Self::Brace => "color span",
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    spans: Vec<Span>,
}

impl Parser<'_> {
    fn run(mut self) -> Result<Vec<Span>, ParseError> {
        self.segment(Attrs::default(), None)?;
        Ok(self.spans)
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consumes text until `until` closes (or the input ends, for the top
    /// level), pushing completed spans as style boundaries are crossed.
    fn segment(&mut self, attrs: Attrs, until: Option<Delimiter>) -> Result<(), ParseError> {
        let mut text = String::new();
        while self.pos < self.input.len() {
            if let Some(delim) = until {
                if self.eat(delim.token()) {
                    self.emit(attrs, &mut text);
                    return Ok(());
                }
            }
            if self.eat("**") {
                self.emit(attrs, &mut text);
                self.segment(Attrs { bold: true, ..attrs }, Some(Delimiter::Bold))?;
            } else if self.eat("*") {
                self.emit(attrs, &mut text);
                self.segment(
                    Attrs {
                        italic: true,
                        ..attrs
                    },
                    Some(Delimiter::Italic),
                )?;
            } else if self.rest().starts_with("[color=") {
                let color = self.color_directive()?;
                self.emit(attrs, &mut text);
                self.segment(
                    Attrs {
                        color: Some(color),
                        ..attrs
                    },
                    Some(Delimiter::Brace),
                )?;
            } else if self.rest().starts_with('}') {
                return Err(ParseError::new(
                    self.pos,
                    "unexpected `}` without a matching `[color=...]`",
                ));
            } else if self.rest().starts_with(']') {
                return Err(ParseError::new(self.pos, "unexpected closing token `]`"));
            } else if self.rest().starts_with('[') {
                return Err(ParseError::new(
                    self.pos,
                    "unsupported directive; expected `[color=#RRGGBB]{...}`",
                ));
            } else if let Some(ch) = self.rest().chars().next() {
                text.push(ch);
                self.pos += ch.len_utf8();
            }
        }

        match until {
            Some(delim) => Err(ParseError::new(
                self.pos,
                format!("unterminated {}", delim.what()),
            )),
            None => {
                self.emit(attrs, &mut text);
                Ok(())
            }
        }
    }

    fn emit(&mut self, attrs: Attrs, text: &mut String) {
        if !text.is_empty() {
            self.spans.push(attrs.span(std::mem::take(text)));
        }
    }

    fn color_directive(&mut self) -> Result<Color, ParseError> {
        self.pos += "[color=".len();
        if !self.eat("#") {
            return Err(ParseError::new(
                self.pos,
                "expected `#` followed by a hexadecimal RGB value",
            ));
        }
        let hex_start = self.pos;
        let hex_end = hex_start + 6;
        if hex_end > self.input.len() {
            return Err(ParseError::new(
                hex_start,
                "incomplete color specification; expected 6 hexadecimal digits",
            ));
        }
        let hex = &self.input[hex_start..hex_end];
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::new(
                hex_start,
                "invalid RGB specification; use hexadecimal digits only",
            ));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        let color = Color::Rgb(channel(0), channel(2), channel(4));
        self.pos = hex_end;
        if !self.eat("]") {
            return Err(ParseError::new(
                self.pos,
                "expected `]` to close the color directive",
            ));
        }
        if !self.eat("{") {
            return Err(ParseError::new(
                self.pos,
                "expected `{` to start the colored text",
            ));
        }
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_styles_reflect_flags() {
        let span = Span::new("Hello").bold().italic().colored(Color::Rgb(10, 20, 30));
        let styled = span.to_styled_string();
        assert_eq!(styled.s, "Hello");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn plain_text_is_a_single_span() {
        let spans = parse_markup("Hello world").expect("parse succeeds");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "Hello world");
        assert!(!spans[0].is_bold());
    }

    #[test]
    fn nested_styles_stack() {
        let spans = parse_markup("This is **very *cool***!").expect("parse succeeds");
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].text(), "This is ");
        assert!(!spans[0].is_bold());
        assert!(spans[1].is_bold());
        assert_eq!(spans[1].text(), "very ");
        assert!(spans[2].is_bold());
        assert!(spans[2].is_italic());
        assert_eq!(spans[2].text(), "cool");
        assert_eq!(spans[3].text(), "!");
        assert!(!spans[3].is_bold());
    }

    #[test]
    fn color_directive_applies_to_braced_text() {
        let spans = parse_markup("[color=#d62728]{Red} text").expect("parse succeeds");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text(), "Red");
        assert_eq!(spans[0].color(), Some(Color::Rgb(0xd6, 0x27, 0x28)));
        assert_eq!(spans[1].text(), " text");
        assert_eq!(spans[1].color(), None);
    }

    #[test]
    fn unterminated_bold_is_an_error() {
        let err = parse_markup("**oops").unwrap_err();
        assert!(err.message().contains("unterminated bold"));
        assert_eq!(err.index(), 6);
    }

    #[test]
    fn invalid_color_is_an_error() {
        let err = parse_markup("[color=#12FG34]{x}").unwrap_err();
        assert!(err.message().contains("invalid RGB"));
    }

    #[test]
    fn stray_closers_are_errors() {
        assert!(parse_markup("oops}").is_err());
        assert!(parse_markup("[note]{x}").is_err());
    }
}
