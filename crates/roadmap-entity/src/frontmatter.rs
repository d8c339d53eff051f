//! Frontmatter extraction
//!
//! A record carries its fields in a `---`-fenced YAML block at the very top
//! of the text. Everything after the closing fence is body and is ignored by
//! the resolver.

use serde_yaml::{Mapping, Value};

/// Failure to extract a key-value block
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    /// Opening fence present, closing fence missing
    #[error("frontmatter block is not closed")]
    Unterminated,
    /// Block is not valid YAML
    #[error("YAML parse error: {0}")]
    Syntax(String),
    /// Block is valid YAML but not a mapping
    #[error("frontmatter is not a key-value block")]
    NotAMapping,
}

/// Split `text` into its frontmatter block and body
///
/// Returns `Ok(None)` when the text has no opening fence.
///
/// # Errors
/// [`BlockError::Unterminated`] when the opening fence is never closed.
pub fn split(text: &str) -> Result<Option<(&str, &str)>, BlockError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(None);
    };
    if first.trim_end() != "---" {
        return Ok(None);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        let fence = line.trim_end();
        if fence == "---" || fence == "..." {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Ok(Some((block, body)));
        }
        offset += line.len();
    }
    Err(BlockError::Unterminated)
}

/// Parse a frontmatter block into an order-preserving mapping
///
/// An empty block yields an empty mapping.
///
/// # Errors
/// [`BlockError::Syntax`] for invalid YAML, [`BlockError::NotAMapping`] for a
/// block whose top level is a list or scalar.
pub fn parse_block(block: &str) -> Result<Mapping, BlockError> {
    let value: Value =
        serde_yaml::from_str(block).map_err(|e| BlockError::Syntax(e.to_string()))?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        _ => Err(BlockError::NotAMapping),
    }
}

/// Look up the first present key among `keys`
#[must_use]
pub fn lookup<'a>(map: &'a Mapping, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_finds_block_and_body() {
        let text = "---\nid: S-001\n---\n# Body\n";
        let (block, body) = split(text).unwrap().unwrap();
        assert_eq!(block, "id: S-001\n");
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn split_handles_crlf_and_bom() {
        let text = "\u{feff}---\r\nid: S-001\r\n---\r\n";
        let (block, body) = split(text).unwrap().unwrap();
        assert_eq!(block, "id: S-001\r\n");
        assert_eq!(body, "");
    }

    #[test]
    fn split_without_fence_is_none() {
        assert_eq!(split("# Just a note\n").unwrap(), None);
        assert_eq!(split("").unwrap(), None);
    }

    #[test]
    fn split_unterminated_is_error() {
        assert_eq!(split("---\nid: S-001\n"), Err(BlockError::Unterminated));
    }

    #[test]
    fn parse_block_keeps_key_order() {
        let map = parse_block("zeta: 1\nalpha: 2\nid: X-1\n").unwrap();
        let keys: Vec<_> = map.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "id"]);
    }

    #[test]
    fn parse_block_rejects_bad_indentation() {
        let err = parse_block("id: S-001\n  type: story\n bad: [\n").unwrap_err();
        assert!(matches!(err, BlockError::Syntax(_)));
    }

    #[test]
    fn parse_block_rejects_lists() {
        assert_eq!(parse_block("- a\n- b\n"), Err(BlockError::NotAMapping));
        assert_eq!(parse_block(""), Ok(Mapping::new()));
    }

    #[test]
    fn block_errors_have_messages() {
        assert_eq!(BlockError::Unterminated.to_string(), "frontmatter block is not closed");
        assert_eq!(
            BlockError::Syntax("bad indent".into()).to_string(),
            "YAML parse error: bad indent"
        );
    }
}
