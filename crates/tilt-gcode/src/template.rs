//! Placeholder substitution for user scripts.
//!
//! `{name}` is replaced by the value bound to `name`; `{{` and `}}` produce
//! literal braces. Anything else is an error, and the caller decides what to
//! emit instead.

use std::collections::BTreeMap;

use thiserror::Error;

/// Why a template could not be rendered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// A placeholder names no known value.
    #[error("unknown placeholder {{{name}}}")]
    Unresolved {
        /// The placeholder name.
        name: String,
    },

    /// Braces do not pair up.
    #[error("malformed template at byte {position}: {reason}")]
    Malformed {
        /// Byte offset of the offending brace.
        position: usize,
        /// What went wrong.
        reason: &'static str,
    },
}

/// Named values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: BTreeMap<&'static str, String>,
}

impl TemplateVars {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name, value.into());
        self
    }

    /// Look up a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Substitute every placeholder in `template`.
pub fn render(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, c)| c == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) => {
                            return Err(TemplateError::Malformed {
                                position: pos,
                                reason: "nested '{'",
                            })
                        }
                        Some((_, c)) => name.push(c),
                        None => {
                            return Err(TemplateError::Malformed {
                                position: pos,
                                reason: "unclosed '{'",
                            })
                        }
                    }
                }
                match vars.get(&name) {
                    Some(value) => out.push_str(value),
                    None => return Err(TemplateError::Unresolved { name }),
                }
            }
            '}' => {
                if chars.next_if(|&(_, c)| c == '}').is_none() {
                    return Err(TemplateError::Malformed {
                        position: pos,
                        reason: "unmatched '}'",
                    });
                }
                out.push('}');
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Split script text into lines, honouring literal `\n` escapes.
pub fn script_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .lines()
        .map(|l| l.trim().to_string())
        .collect()
}
