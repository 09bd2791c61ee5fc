//! Decoding of the list-valued columns stored as serialized text.
//!
//! Rows carry `ingredients`, `nutrition` and `steps` as text. Two encodings
//! occur in the data: JSON arrays, and Python list literals (`['a', "b's"]`)
//! from the original CSV export. Anything unparseable decodes to an empty
//! list; a bad field never fails the request.

use serde::Deserialize;
use serde_json::Value;

/// One serialized ingredient as it appears at the storage boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    PlainName(String),
    Structured(StructuredIngredient),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructuredIngredient {
    #[serde(alias = "ingredient")]
    pub name: String,
    #[serde(default, alias = "amount")]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl IngredientEntry {
    /// Canonical form used everywhere past the decode step.
    pub fn into_name(self) -> String {
        match self {
            IngredientEntry::PlainName(name) => name,
            IngredientEntry::Structured(s) => s.name,
        }
    }
}

pub fn decode_ingredients(raw: Option<&str>) -> Vec<String> {
    let Some(items) = raw.and_then(parse_list) else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<IngredientEntry>(item).ok())
        .map(IngredientEntry::into_name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Nutrition values are positional, so a single non-numeric entry
/// invalidates the whole list.
pub fn decode_nutrition(raw: Option<&str>) -> Vec<f64> {
    raw.and_then(parse_list)
        .and_then(|items| items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>())
        .unwrap_or_default()
}

/// Steps are either a serialized list or newline separated text.
pub fn decode_steps(raw: Option<&str>) -> Vec<String> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Vec::new();
    };
    if text.starts_with('[') && text.ends_with(']') {
        if let Some(items) = parse_list(text) {
            return items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a JSON array, falling back to a Python list literal.
fn parse_list(raw: &str) -> Option<Vec<Value>> {
    let raw = raw.trim();
    serde_json::from_str::<Vec<Value>>(raw)
        .ok()
        .or_else(|| parse_python_list(raw))
}

fn parse_python_list(raw: &str) -> Option<Vec<Value>> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        skip_whitespace(&mut chars);
        match chars.peek().copied() {
            None => break,
            Some(quote @ ('\'' | '"')) => {
                chars.next();
                items.push(Value::String(read_quoted(&mut chars, quote)?));
            }
            Some(_) => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    literal.push(c);
                    chars.next();
                }
                let number: f64 = literal.trim().parse().ok()?;
                items.push(Value::Number(serde_json::Number::from_f64(number)?));
            }
        }
        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) -> Option<String> {
    let mut out = String::new();
    loop {
        match chars.next()? {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                other => out.push(other),
            },
            c if c == quote => return Some(out),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_string_array() {
        assert_eq!(
            decode_ingredients(Some(r#"["flour", "sugar", "eggs"]"#)),
            vec!["flour", "sugar", "eggs"]
        );
    }

    #[test]
    fn test_python_list_literal() {
        assert_eq!(
            decode_ingredients(Some(r#"['winter squash', "baker's yeast", 'salt']"#)),
            vec!["winter squash", "baker's yeast", "salt"]
        );
    }

    #[test]
    fn test_structured_entries_normalize_to_name() {
        let raw = r#"[{"ingredient": "olive oil", "amount": "2 tbsp"}, "garlic", {"name": "basil", "unit": "cup"}]"#;
        assert_eq!(
            decode_ingredients(Some(raw)),
            vec!["olive oil", "garlic", "basil"]
        );
    }

    #[test]
    fn test_untagged_union_shapes() {
        let plain: IngredientEntry = serde_json::from_str(r#""salt""#).unwrap();
        assert_eq!(plain, IngredientEntry::PlainName("salt".to_string()));
        let structured: IngredientEntry =
            serde_json::from_str(r#"{"ingredient": "salt", "amount": 1}"#).unwrap();
        assert!(matches!(structured, IngredientEntry::Structured(ref s) if s.name == "salt"));
    }

    #[test]
    fn test_corrupted_ingredients_decode_empty() {
        assert!(decode_ingredients(Some("['unterminated")).is_empty());
        assert!(decode_ingredients(Some("not a list")).is_empty());
        assert!(decode_ingredients(Some("{\"a\": 1}")).is_empty());
        assert!(decode_ingredients(Some("")).is_empty());
        assert!(decode_ingredients(None).is_empty());
    }

    #[test]
    fn test_nutrition() {
        assert_eq!(
            decode_nutrition(Some("[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]")),
            vec![51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]
        );
        assert!(decode_nutrition(Some("[1.0, 'x']")).is_empty());
        assert!(decode_nutrition(Some("garbage")).is_empty());
        assert!(decode_nutrition(None).is_empty());
    }

    #[test]
    fn test_steps_from_list_and_lines() {
        assert_eq!(
            decode_steps(Some("['preheat oven', 'bake 20 minutes']")),
            vec!["preheat oven", "bake 20 minutes"]
        );
        assert_eq!(
            decode_steps(Some("preheat oven\r\n\n  bake 20 minutes  \n")),
            vec!["preheat oven", "bake 20 minutes"]
        );
        assert!(decode_steps(Some("   ")).is_empty());
    }

    #[test]
    fn test_python_list_escapes_and_trailing_comma() {
        assert_eq!(
            decode_ingredients(Some(r"['it\'s', 'a\\b', ]")),
            vec!["it's", "a\\b"]
        );
        assert!(decode_ingredients(Some("[]")).is_empty());
    }
}
