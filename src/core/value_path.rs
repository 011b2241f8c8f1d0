use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One step into a nested document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A dotted path into a document, e.g. `dampening.type` or `rule.conditions[0].value`.
/// Keys that are not plain identifiers can be written in quoted bracket form:
/// `labels["app.kubernetes.io/name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path: {0}")]
pub struct PathParseError(String);

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn parse(input: &str) -> Result<Self, PathParseError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let chars: Vec<char> = raw.chars().collect();
        let mut idx = 0usize;
        let mut segments = Vec::new();

        while idx < chars.len() {
            match chars[idx] {
                '.' => {
                    if segments.is_empty() {
                        return Err(PathParseError("path cannot start with '.'".into()));
                    }
                    idx += 1;
                    segments.push(Segment::Key(parse_key(&chars, &mut idx)?));
                }
                '[' => segments.push(parse_bracket(&chars, &mut idx)?),
                _ if segments.is_empty() => {
                    segments.push(Segment::Key(parse_key(&chars, &mut idx)?));
                }
                ch => {
                    return Err(PathParseError(format!(
                        "unexpected character '{}' at position {}",
                        ch, idx
                    )));
                }
            }
        }

        Ok(Self::new(segments))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if is_identifier(key) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Key(key) => {
                    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
                    write!(f, "[\"{}\"]", escaped)?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn parse_key(chars: &[char], idx: &mut usize) -> Result<String, PathParseError> {
    let start = *idx;
    while *idx < chars.len() && !matches!(chars[*idx], '.' | '[' | ']') {
        *idx += 1;
    }
    if *idx == start {
        return Err(PathParseError(format!("expected key at position {}", start)));
    }
    Ok(chars[start..*idx].iter().collect())
}

fn parse_bracket(chars: &[char], idx: &mut usize) -> Result<Segment, PathParseError> {
    *idx += 1;
    let Some(&first) = chars.get(*idx) else {
        return Err(PathParseError("unterminated '[' segment".into()));
    };

    if first == '"' || first == '\'' {
        let quote = first;
        *idx += 1;
        let mut key = String::new();
        let mut closed = false;
        while *idx < chars.len() {
            let ch = chars[*idx];
            *idx += 1;
            if ch == '\\' {
                let Some(&next) = chars.get(*idx) else {
                    return Err(PathParseError("unterminated escape in quoted key".into()));
                };
                key.push(next);
                *idx += 1;
            } else if ch == quote {
                closed = true;
                break;
            } else {
                key.push(ch);
            }
        }
        if !closed {
            return Err(PathParseError("unterminated quoted key".into()));
        }
        if chars.get(*idx) != Some(&']') {
            return Err(PathParseError("expected closing ']'".into()));
        }
        *idx += 1;
        return Ok(Segment::Key(key));
    }

    let start = *idx;
    while *idx < chars.len() && chars[*idx] != ']' {
        *idx += 1;
    }
    if *idx >= chars.len() {
        return Err(PathParseError("unterminated '[' segment".into()));
    }
    let raw: String = chars[start..*idx].iter().collect();
    *idx += 1;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathParseError("empty bracket segment".into()));
    }
    match trimmed.parse::<usize>() {
        Ok(index) => Ok(Segment::Index(index)),
        Err(_) => Ok(Segment::Key(trimmed.to_string())),
    }
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

pub fn get<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match segment {
            Segment::Key(key) => current.as_object()?.get(key)?,
            Segment::Index(index) => current.as_array()?.get(*index)?,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate objects and arrays as
/// needed. A non-container found mid-path is replaced by the container the
/// next segment requires.
pub fn set(root: &mut Value, path: &Path, value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }
    let slot = ensure_slot(root, path);
    *slot = value;
}

pub fn delete(root: &mut Value, path: &Path) {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let next = match segment {
            Segment::Key(key) => current.as_object_mut().and_then(|map| map.get_mut(key)),
            Segment::Index(index) => current.as_array_mut().and_then(|list| list.get_mut(*index)),
        };
        match next {
            Some(value) => current = value,
            None => return,
        }
    }
    match last {
        Segment::Key(key) => {
            if let Some(map) = current.as_object_mut() {
                map.shift_remove(key);
            }
        }
        Segment::Index(index) => {
            if let Some(list) = current.as_array_mut() {
                if *index < list.len() {
                    list.remove(*index);
                }
            }
        }
    }
}

fn container_for(next: Option<&Segment>) -> Value {
    match next {
        Some(Segment::Index(_)) => Value::Array(Vec::new()),
        _ => Value::Object(serde_json::Map::new()),
    }
}

fn ensure_slot<'a>(root: &'a mut Value, path: &Path) -> &'a mut Value {
    let segments = path.segments();
    let mut current = root;
    for (idx, segment) in segments.iter().enumerate() {
        let next = segments.get(idx + 1);
        match segment {
            Segment::Key(key) => {
                if !current.is_object() {
                    *current = Value::Object(serde_json::Map::new());
                }
                let map = current
                    .as_object_mut()
                    .expect("slot was just made an object");
                if !map.contains_key(key) {
                    map.insert(key.clone(), container_for(next));
                }
                current = map.get_mut(key).expect("key inserted above");
            }
            Segment::Index(index) => {
                if !current.is_array() {
                    *current = Value::Array(Vec::new());
                }
                let list = current.as_array_mut().expect("slot was just made an array");
                if list.len() <= *index {
                    list.resize(*index + 1, Value::Null);
                }
                if list[*index].is_null() {
                    list[*index] = container_for(next);
                }
                current = list.get_mut(*index).expect("index resized above");
            }
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::{Path, Segment, delete, get, set};
    use serde_json::{Value, json};

    #[test]
    fn parse_dotted_path_with_indexes() {
        let path = Path::parse("rule.conditions[0].value").expect("path should parse");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("rule".to_string()),
                Segment::Key("conditions".to_string()),
                Segment::Index(0),
                Segment::Key("value".to_string()),
            ]
        );
    }

    #[test]
    fn parse_quoted_bracket_key() {
        let path = Path::parse("labels[\"app.kubernetes.io/name\"]").expect("path");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("labels".to_string()),
                Segment::Key("app.kubernetes.io/name".to_string()),
            ]
        );
    }

    #[test]
    fn parse_rejects_leading_dot() {
        assert!(Path::parse(".dampening.type").is_err());
    }

    #[test]
    fn display_round_trips() {
        for raw in ["dampening.type", "rows[1].path", "labels[\"a.b\"]"] {
            let path = Path::parse(raw).expect("path");
            assert_eq!(path.to_string(), raw);
        }
    }

    #[test]
    fn set_creates_nested_structure() {
        let mut root = Value::Object(serde_json::Map::new());
        let path = Path::parse("eventFilter.selectors.kind").expect("path");
        set(&mut root, &path, json!("gateway"));
        assert_eq!(get(&root, &path), Some(&json!("gateway")));
    }

    #[test]
    fn set_through_array_index() {
        let mut root = Value::Object(serde_json::Map::new());
        let path = Path::parse("handlers[2]").expect("path");
        set(&mut root, &path, json!("email_handler"));
        assert_eq!(root, json!({ "handlers": [null, null, "email_handler"] }));
    }

    #[test]
    fn set_overwrites_existing_leaf() {
        let mut root = json!({ "dampening": { "type": "consecutive" } });
        let path = Path::parse("dampening.type").expect("path");
        set(&mut root, &path, json!("active_time"));
        assert_eq!(get(&root, &path), Some(&json!("active_time")));
    }

    #[test]
    fn delete_removes_leaf_and_ignores_missing() {
        let mut root = json!({ "data": { "labels": { "zone": "a" } } });
        delete(&mut root, &Path::parse("data.labels.zone").expect("path"));
        assert_eq!(root, json!({ "data": { "labels": {} } }));
        delete(&mut root, &Path::parse("data.missing.deep").expect("path"));
        assert_eq!(root, json!({ "data": { "labels": {} } }));
    }
}
