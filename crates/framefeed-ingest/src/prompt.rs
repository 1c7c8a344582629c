//! Prompt lines from the archive's text files.

/// One description line. A line written as `prompt || negative` carries its
/// own negative prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLine {
    pub prompt: String,
    pub negative: Option<String>,
}

const SEPARATOR: &str = " || ";

impl PromptLine {
    pub fn parse(line: &str) -> Self {
        match line.split_once(SEPARATOR) {
            Some((prompt, negative)) => {
                let negative = negative.trim();
                Self {
                    prompt: prompt.trim().to_string(),
                    negative: (!negative.is_empty()).then(|| negative.to_string()),
                }
            }
            None => Self {
                prompt: line.trim().to_string(),
                negative: None,
            },
        }
    }

    /// The line's own negative prompt, else the shared one.
    pub fn negative_or<'a>(&'a self, shared: &'a str) -> &'a str {
        self.negative.as_deref().unwrap_or(shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line() {
        let line = PromptLine::parse("  a slow pan over the sea ");
        assert_eq!(line.prompt, "a slow pan over the sea");
        assert!(line.negative.is_none());
        assert_eq!(line.negative_or("blurry"), "blurry");
    }

    #[test]
    fn test_line_with_negative() {
        let line = PromptLine::parse("city at night || rain, people");
        assert_eq!(line.prompt, "city at night");
        assert_eq!(line.negative.as_deref(), Some("rain, people"));
        assert_eq!(line.negative_or("blurry"), "rain, people");
    }

    #[test]
    fn test_splits_on_first_separator_only() {
        let line = PromptLine::parse("a || b || c");
        assert_eq!(line.prompt, "a");
        assert_eq!(line.negative.as_deref(), Some("b || c"));
    }

    #[test]
    fn test_empty_negative_falls_back() {
        let line = PromptLine::parse("forest ||  ");
        assert_eq!(line.prompt, "forest");
        assert!(line.negative.is_none());
    }

    #[test]
    fn test_bare_pipes_are_not_a_separator() {
        let line = PromptLine::parse("a||b");
        assert_eq!(line.prompt, "a||b");
        assert!(line.negative.is_none());
    }
}
