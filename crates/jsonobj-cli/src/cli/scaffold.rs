//! Definition scaffolding.
//!
//! Turns a user-supplied type name into the three spellings a generated file
//! needs and renders the embedded template with them.
//!
//! | Input | Type name | File | Static |
//! |-------|-----------|------|--------|
//! | `ProductAttributes` | `ProductAttributes` | `product_attributes.rs` | `PRODUCT_ATTRIBUTES` |
//! | `product-attributes` | `ProductAttributes` | `product_attributes.rs` | `PRODUCT_ATTRIBUTES` |
//! | `HTTPHeaders` | `HTTPHeaders` | `http_headers.rs` | `HTTP_HEADERS` |

use std::fs;
use std::path::{Path, PathBuf};

use jsonobj::error::{Error, Result};
use minijinja::{context, Environment};
use tracing::debug;

use super::templates::OBJECT_TEMPLATE;

/// A validated type name in all its spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    pub pascal: String,
    pub snake: String,
    pub screaming: String,
}

impl ObjectName {
    /// Returns `None` unless `raw` starts with an ASCII letter and contains
    /// only ASCII alphanumerics, `_`, `-` or spaces.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = raw.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '));
        if !valid {
            return None;
        }
        let words = split_words(raw);
        Some(Self {
            pascal: words.iter().map(|w| capitalize(w)).collect(),
            snake: words.join("_").to_ascii_lowercase(),
            screaming: words.join("_").to_ascii_uppercase(),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.rs", self.snake)
    }
}

/// Split on separators and on case boundaries. Runs of capitals stay together
/// (`HTTPHeaders` → `HTTP`, `Headers`).
fn split_words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.collect();
            // Acronyms keep their casing.
            if word.chars().all(|c| !c.is_ascii_lowercase()) && word.len() > 1 {
                word.to_string()
            } else {
                format!("{}{}", first.to_ascii_uppercase(), rest)
            }
        }
        None => String::new(),
    }
}

/// Render the definition file for `name`.
pub fn render(name: &ObjectName, module: &str) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("object.rs", OBJECT_TEMPLATE)
        .map_err(|e| Error::Template(e.to_string()))?;
    let template = env
        .get_template("object.rs")
        .map_err(|e| Error::Template(e.to_string()))?;
    template
        .render(context! {
            name => &name.pascal,
            snake => &name.snake,
            screaming => &name.screaming,
            module => module,
        })
        .map_err(|e| Error::Template(e.to_string()))
}

/// Render and write the definition file into `dir`, returning its path.
pub fn generate(name: &ObjectName, dir: &Path, module: &str, force: bool) -> Result<PathBuf> {
    let target = dir.join(name.file_name());
    if target.exists() && !force {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to overwrite)", target.display()),
        )));
    }

    let source = render(name, module)?;
    fs::create_dir_all(dir)?;
    fs::write(&target, source)?;
    debug!(path = %target.display(), object = %name.pascal, "definition written");
    Ok(target)
}
