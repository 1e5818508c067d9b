//! YAML frontmatter splitting and property queries
//!
//! A note may start with a YAML block fenced by `---` lines. The block is
//! removed from the body before conversion; its properties decide whether the
//! note is published and which template variables get filled in.

use indexmap::IndexMap;
use serde_yaml::Value;

/// Values accepted as "true" for exclusion properties (case-insensitive)
const TRUTHY: &[&str] = &["true", "yes", "y", "on", "1"];

/// Parsed frontmatter properties in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: IndexMap<String, Value>,
}

/// A note split into its frontmatter and body
#[derive(Debug)]
pub struct ParsedNote<'a> {
    /// Properties from the leading YAML block (empty if none)
    pub frontmatter: Frontmatter,
    /// Markdown after the YAML block
    pub body: &'a str,
    /// Parse error if the block was present but not valid YAML
    pub yaml_error: Option<String>,
}

impl Frontmatter {
    /// Look up a raw property value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether the note had no properties
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Render a property as a single string suitable for a template variable
    ///
    /// Lists are joined with `", "`. Null values, nested mappings and missing
    /// keys give `None`.
    pub fn scalar_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(render_value)
    }

    /// Whether a property holds a truthy value
    ///
    /// Accepts YAML booleans, the number 1, and the strings
    /// `true`, `yes`, `y`, `on`, `1` in any case.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(value_is_truthy)
    }

    /// Return the first exclusion property that is set on this note
    pub fn excluded_by<'p>(&self, properties: &'p [String]) -> Option<&'p str> {
        properties
            .iter()
            .find(|property| self.is_truthy(property))
            .map(String::as_str)
    }
}

/// Split a note into frontmatter and body
///
/// The block must start on the first line (after an optional BOM) with `---`
/// and end with a line containing only `---` or `...`. Without a closing line
/// the whole text is body. A block that is not a YAML mapping is dropped from
/// the body and reported through [`ParsedNote::yaml_error`].
pub fn parse(content: &str) -> ParsedNote<'_> {
    let not_found = ParsedNote {
        frontmatter: Frontmatter::default(),
        body: content,
        yaml_error: None,
    };

    let text = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = strip_opening_fence(text) else {
        return not_found;
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return match parse_yaml(yaml) {
                Ok(frontmatter) => ParsedNote {
                    frontmatter,
                    body,
                    yaml_error: None,
                },
                Err(message) => ParsedNote {
                    frontmatter: Frontmatter::default(),
                    body,
                    yaml_error: Some(message),
                },
            };
        }
        offset += line.len();
    }

    not_found
}

fn strip_opening_fence(text: &str) -> Option<&str> {
    let (first, rest) = match text.find('\n') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => return None,
    };
    (first.trim_end() == "---").then_some(rest)
}

fn parse_yaml(yaml: &str) -> Result<Frontmatter, String> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    match value {
        Value::Null => Ok(Frontmatter::default()),
        Value::Mapping(mapping) => {
            let mut fields = IndexMap::with_capacity(mapping.len());
            for (key, value) in mapping {
                if let Some(key) = render_value(&key) {
                    fields.insert(key, value);
                }
            }
            Ok(Frontmatter { fields })
        }
        _ => Err("frontmatter is not a mapping".to_string()),
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Mapping(_) => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            Some(parts.join(", "))
        }
        Value::Tagged(tagged) => render_value(&tagged.value),
    }
}

fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64() == Some(1),
        Value::String(s) => {
            let s = s.trim();
            TRUTHY.iter().any(|t| s.eq_ignore_ascii_case(t))
        }
        Value::Tagged(tagged) => value_is_truthy(&tagged.value),
        _ => false,
    }
}
