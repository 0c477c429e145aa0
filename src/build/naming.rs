//! Output file naming templates.
//!
//! Supported tokens:
//!
//! | Token               | Value                                        |
//! |---------------------|----------------------------------------------|
//! | `[name]`            | logical name (entry name or file stem)       |
//! | `[hash]`            | build hash (20 hex chars)                    |
//! | `[hash:N]`          | build hash truncated to N chars              |
//! | `[contenthash]`     | this file's own content hash (20 hex chars)  |
//! | `[contenthash:N]`   | content hash truncated to N chars            |
//! | `[ext]`             | output extension, without the dot            |
//!
//! For entries the build hash is the overall bundle hash, so pages can
//! reference every entry through the one hash they are given. For static
//! sub-resources it is the file's content hash.
//!
//! The `local` development sentinel is never truncated.

use std::fmt;
use std::str::FromStr;

use super::hash::LOCAL_HASH;

/// Hash length used by a bare `[hash]` token.
pub const DEFAULT_HASH_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Name,
    Hash(usize),
    ContentHash(usize),
    Ext,
}

/// Parsed naming template such as `[name].[hash].[ext]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl NameTemplate {
    /// Render a file name from the build hash and the file's content hash.
    pub fn render(&self, name: &str, hash: &str, content_hash: &str, ext: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + hash.len());
        for token in &self.tokens {
            match token {
                Token::Literal(s) => out.push_str(s),
                Token::Name => out.push_str(name),
                Token::Hash(len) => out.push_str(truncate(hash, *len)),
                Token::ContentHash(len) => out.push_str(truncate(content_hash, *len)),
                Token::Ext => out.push_str(ext),
            }
        }
        out
    }
}

fn truncate(hash: &str, len: usize) -> &str {
    if hash == LOCAL_HASH {
        return hash;
    }
    hash.get(..len).unwrap_or(hash)
}

impl Default for NameTemplate {
    /// `[name].[hash].[ext]`
    fn default() -> Self {
        Self {
            source: "[name].[hash].[ext]".to_string(),
            tokens: vec![
                Token::Name,
                Token::Literal(".".into()),
                Token::Hash(DEFAULT_HASH_LEN),
                Token::Literal(".".into()),
                Token::Ext,
            ],
        }
    }
}

impl FromStr for NameTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = Vec::new();
        let mut rest = s;

        while let Some(start) = rest.find('[') {
            if start > 0 {
                tokens.push(Token::Literal(rest[..start].to_string()));
            }
            let end = rest[start..]
                .find(']')
                .map(|i| start + i)
                .ok_or_else(|| format!("unclosed `[` in `{s}`"))?;
            let token = match &rest[start + 1..end] {
                "name" => Token::Name,
                "ext" => Token::Ext,
                "hash" => Token::Hash(DEFAULT_HASH_LEN),
                "contenthash" => Token::ContentHash(DEFAULT_HASH_LEN),
                other => {
                    if let Some(len) = other.strip_prefix("hash:") {
                        Token::Hash(parse_len(len, other)?)
                    } else if let Some(len) = other.strip_prefix("contenthash:") {
                        Token::ContentHash(parse_len(len, other)?)
                    } else {
                        return Err(format!("unknown token `[{other}]`"));
                    }
                }
            };
            tokens.push(token);
            rest = &rest[end + 1..];
        }
        if !rest.is_empty() {
            tokens.push(Token::Literal(rest.to_string()));
        }

        if !tokens.contains(&Token::Name) {
            return Err(format!("`{s}` must contain `[name]`"));
        }

        Ok(Self {
            source: s.to_string(),
            tokens,
        })
    }
}

fn parse_len(len: &str, token: &str) -> Result<usize, String> {
    match len.parse::<usize>() {
        Ok(0) => Err(format!("hash length must be positive in `[{token}]`")),
        Ok(len) => Ok(len),
        Err(_) => Err(format!("invalid hash length in `[{token}]`")),
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "0123456789abcdef0123456789abcdef";
    const CONTENT: &str = "fedcba9876543210fedcba9876543210";

    #[test]
    fn test_default_entry_template() {
        let t: NameTemplate = "[name].[hash].[ext]".parse().unwrap();
        assert_eq!(t.render("app", HASH, CONTENT, "js"), "app.0123456789abcdef0123.js");
        assert_eq!(t, NameTemplate::default());
    }

    #[test]
    fn test_truncated_hash() {
        let t: NameTemplate = "[name].[hash:8].[ext]".parse().unwrap();
        assert_eq!(t.render("logo", HASH, CONTENT, "svg"), "logo.01234567.svg");
    }

    #[test]
    fn test_local_sentinel_not_truncated() {
        let t: NameTemplate = "[name].[hash:3].[ext]".parse().unwrap();
        assert_eq!(t.render("styles", "local", "local", "css"), "styles.local.css");
        let t: NameTemplate = "[name].[hash].[ext]".parse().unwrap();
        assert_eq!(t.render("styles", "local", "local", "css"), "styles.local.css");
    }

    #[test]
    fn test_literal_segments() {
        let t: NameTemplate = "js/[name]-[hash:4].min.[ext]".parse().unwrap();
        assert_eq!(t.render("app", HASH, CONTENT, "js"), "js/app-0123.min.js");
    }

    #[test]
    fn test_content_hash_token() {
        let t: NameTemplate = "[name].[contenthash:6].[ext]".parse().unwrap();
        assert_eq!(t.render("app", HASH, CONTENT, "js"), "app.fedcba.js");
        let t: NameTemplate = "[name].[contenthash].[ext]".parse().unwrap();
        assert_eq!(t.render("app", HASH, CONTENT, "js"), "app.fedcba9876543210fedc.js");
    }

    #[test]
    fn test_parse_errors() {
        assert!("[name].[chunkhash].[ext]".parse::<NameTemplate>().is_err());
        assert!("[name].[hash:x].[ext]".parse::<NameTemplate>().is_err());
        assert!("[name].[hash:0].[ext]".parse::<NameTemplate>().is_err());
        assert!("[name].[contenthash:].[ext]".parse::<NameTemplate>().is_err());
        assert!("[name.[ext]".parse::<NameTemplate>().is_err());
        assert!("bundle.[hash].[ext]".parse::<NameTemplate>().is_err());
    }
}
