use lachs::Span;

#[lachs::token]
pub enum Token {
    #[terminal("var")]
    Var,
    #[terminal("let")]
    Let,
    #[terminal("const")]
    Const,
    #[terminal("function")]
    Function,
    #[terminal("return")]
    Return,
    #[terminal("if")]
    If,
    #[terminal("else")]
    Else,
    #[terminal("while")]
    While,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[literal("[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
    #[literal("[0-9]+(\\.[0-9]+)?")]
    Number,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[terminal("==")]
    DoubleEquals,
    #[terminal("!=")]
    NotEquals,
    #[terminal("=")]
    Equals,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Star,
    #[terminal("/")]
    Slash,
    #[terminal("<")]
    LessThan,
    #[terminal(">")]
    GreaterThan,
    #[terminal(",")]
    Comma,
    #[terminal(";")]
    Semicolon,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("{")]
    LBrace,
    #[terminal("}")]
    RBrace,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Var(inner) => inner.position.clone(),
            Token::Let(inner) => inner.position.clone(),
            Token::Const(inner) => inner.position.clone(),
            Token::Function(inner) => inner.position.clone(),
            Token::Return(inner) => inner.position.clone(),
            Token::If(inner) => inner.position.clone(),
            Token::Else(inner) => inner.position.clone(),
            Token::While(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Number(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::DoubleEquals(inner) => inner.position.clone(),
            Token::NotEquals(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Star(inner) => inner.position.clone(),
            Token::Slash(inner) => inner.position.clone(),
            Token::LessThan(inner) => inner.position.clone(),
            Token::GreaterThan(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::Semicolon(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBrace(inner) => inner.position.clone(),
            Token::RBrace(inner) => inner.position.clone(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Var(_) => "'var'".to_string(),
            Token::Let(_) => "'let'".to_string(),
            Token::Const(_) => "'const'".to_string(),
            Token::Function(_) => "'function'".to_string(),
            Token::Return(_) => "'return'".to_string(),
            Token::If(_) => "'if'".to_string(),
            Token::Else(_) => "'else'".to_string(),
            Token::While(_) => "'while'".to_string(),
            Token::True(_) => "'true'".to_string(),
            Token::False(_) => "'false'".to_string(),
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::Number(inner) => format!("number '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            Token::DoubleEquals(_) => "'=='".to_string(),
            Token::NotEquals(_) => "'!='".to_string(),
            Token::Equals(_) => "'='".to_string(),
            Token::Plus(_) => "'+'".to_string(),
            Token::Minus(_) => "'-'".to_string(),
            Token::Star(_) => "'*'".to_string(),
            Token::Slash(_) => "'/'".to_string(),
            Token::LessThan(_) => "'<'".to_string(),
            Token::GreaterThan(_) => "'>'".to_string(),
            Token::Comma(_) => "','".to_string(),
            Token::Semicolon(_) => "';'".to_string(),
            Token::LParen(_) => "'('".to_string(),
            Token::RParen(_) => "')'".to_string(),
            Token::LBrace(_) => "'{'".to_string(),
            Token::RBrace(_) => "'}'".to_string(),
        }
    }
}

/// Replace `// line` and `/* block */` comments with whitespace.
///
/// Newlines are kept so that token positions still match the source.
/// Comment markers inside string literals are left alone.
pub fn strip_comments(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = ' ';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    result.push(if skipped == '\n' { '\n' } else { ' ' });
                    previous = skipped;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comment() {
        assert_eq!(strip_comments("let a = 1; // one\nlet b;"), "let a = 1; \nlet b;");
    }

    #[test]
    fn test_strip_block_comment_keeps_newlines() {
        let stripped = strip_comments("a /* x\ny */ b");
        assert_eq!(stripped.lines().count(), 2);
        assert!(stripped.starts_with("a "));
        assert!(stripped.ends_with(" b"));
        assert!(!stripped.contains('x'));
    }

    #[test]
    fn test_comment_markers_in_strings_survive() {
        let source = r#"print("http://x /* y */");"#;
        assert_eq!(strip_comments(source), source);
    }
}
