use std::fmt;

use serde::Serialize;

/// Verbatim whitespace and comments preceding a node.
///
/// The text is exactly the bytes between the previous consumption point and
/// the node's first token. It is never normalized, so printing it reproduces
/// the original formatting.
///
/// # Examples
///
/// ```rust
/// use toml_lst::tree::Space;
/// let space = Space::format("\n# owner\n  ");
/// assert_eq!(space.as_str(), "\n# owner\n  ");
/// assert_eq!(space.comments().collect::<Vec<_>>(), vec!["# owner"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Space {
    whitespace: String,
}

impl Space {
    pub const EMPTY: Space = Space {
        whitespace: String::new(),
    };

    pub fn format(text: impl Into<String>) -> Self {
        Self {
            whitespace: text.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.whitespace
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty()
    }

    /// Comments inside this space, without their line endings or trailing blanks.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.whitespace.lines().filter_map(|line| {
            let line = line.trim_start_matches([' ', '\t']);
            line.starts_with('#').then(|| line.trim_end())
        })
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(Space::EMPTY.is_empty());
        assert_eq!(Space::format(""), Space::EMPTY);
        assert_eq!(Space::EMPTY.comments().count(), 0);
    }

    #[test]
    fn test_verbatim_text_is_kept() {
        let text = " \t\r\n  # a \r\n\n#b";
        let space = Space::format(text);
        assert_eq!(space.to_string(), text);
        assert_eq!(space.comments().collect::<Vec<_>>(), vec!["# a", "#b"]);
    }
}
