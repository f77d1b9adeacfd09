use crate::timestamp::Timestamp;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Token(Token),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("name template is empty")]
    Empty,
    #[error("unbalanced braces in name template")]
    UnbalancedBraces,
    #[error("unknown template token: {0}")]
    UnknownToken(String),
}

pub fn parse_template(input: &str) -> Result<Vec<TemplatePart>, TemplateError> {
    if input.is_empty() {
        return Err(TemplateError::Empty);
    }

    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                let mut token = String::new();
                let mut found_close = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        found_close = true;
                        break;
                    }
                    if next == '{' {
                        return Err(TemplateError::UnbalancedBraces);
                    }
                    token.push(next);
                }
                if !found_close || token.is_empty() {
                    return Err(TemplateError::UnbalancedBraces);
                }
                parts.push(TemplatePart::Token(parse_token(&token)?));
            }
            '}' => return Err(TemplateError::UnbalancedBraces),
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }

    Ok(parts)
}

/// Renders the template with zero padded components: four digits for the
/// year, two for everything else.
pub fn render_template(parts: &[TemplatePart], timestamp: &Timestamp) -> String {
    let mut output = String::new();
    for part in parts {
        match part {
            TemplatePart::Literal(s) => output.push_str(s),
            TemplatePart::Token(token) => {
                let value = match token {
                    Token::Year => format!("{:04}", timestamp.year),
                    Token::Month => format!("{:02}", timestamp.month),
                    Token::Day => format!("{:02}", timestamp.day),
                    Token::Hour => format!("{:02}", timestamp.hour),
                    Token::Minute => format!("{:02}", timestamp.minute),
                    Token::Second => format!("{:02}", timestamp.second),
                };
                output.push_str(&value);
            }
        }
    }
    output
}

/// Canonical filename: rendered template followed by the original extension,
/// case preserved.
pub fn format_name(parts: &[TemplatePart], timestamp: &Timestamp, extension: &str) -> String {
    let mut name = render_template(parts, timestamp);
    name.push_str(extension);
    name
}

fn parse_token(token: &str) -> Result<Token, TemplateError> {
    match token {
        "year" => Ok(Token::Year),
        "month" => Ok(Token::Month),
        "day" => Ok(Token::Day),
        "hour" => Ok(Token::Hour),
        "minute" => Ok(Token::Minute),
        "second" => Ok(Token::Second),
        other => Err(TemplateError::UnknownToken(other.to_string())),
    }
}
