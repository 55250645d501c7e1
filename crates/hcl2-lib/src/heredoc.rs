//! Heredoc token splitting and indent trimming.
//!
//! A heredoc token covers `<<TAG` (or `<<-TAG`), the content lines, and the
//! terminator line. The lexer guarantees the overall shape; this module
//! validates termination and extracts the content, stripping the minimum
//! common leading-space prefix for the trim form.

/// A heredoc token taken apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heredoc<'a> {
    pub tag: &'a str,
    pub trim: bool,
    /// Content lines joined, without the terminator line.
    pub content: &'a str,
}

/// Splits a heredoc token's text. `Err` carries a reason suitable for a
/// heredoc error: a missing terminator or empty content.
pub fn check(text: &str) -> Result<Heredoc<'_>, &'static str> {
    let (trim, rest) = match text.strip_prefix("<<-") {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix("<<").unwrap_or(text)),
    };
    let Some((tag, body)) = rest.split_once('\n') else {
        return Err("heredoc is missing its terminator");
    };
    let Some((content, terminator)) = body.rsplit_once('\n') else {
        // Single line after the tag: either the terminator with no content,
        // or an unterminated heredoc.
        return if body.trim() == tag {
            Err("heredoc content is empty")
        } else {
            Err("heredoc is missing its terminator")
        };
    };
    if terminator.trim() != tag {
        return Err("heredoc is missing its terminator");
    }
    Ok(Heredoc { tag, trim, content })
}

/// The value a heredoc contributes to the value tree: the raw content, with
/// the minimum common indent removed for the `<<-` form.
pub fn value(text: &str) -> Result<String, &'static str> {
    let heredoc = check(text)?;
    if !heredoc.trim {
        return Ok(heredoc.content.to_string());
    }
    Ok(strip_common_indent(heredoc.content))
}

/// Removes the smallest leading-space prefix shared by all non-empty lines.
/// Computed at emit time, matching the `<<-` semantics.
fn strip_common_indent(content: &str) -> String {
    let indent = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    content
        .lines()
        .map(|line| if line.len() >= indent { &line[indent..] } else { line.trim_start_matches([' ', '\t']) })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_heredoc_content() {
        let text = "<<EOF\nhello\nworld\nEOF";
        assert_eq!(value(text).unwrap(), "hello\nworld");
    }

    #[test]
    fn trim_heredoc_strips_common_indent() {
        let text = "<<-END\n    hello\n      world\n    END";
        assert_eq!(value(text).unwrap(), "hello\n  world");
    }

    #[test]
    fn trim_heredoc_ignores_blank_lines_for_indent() {
        let text = "<<-END\n  a\n\n  b\n  END";
        assert_eq!(value(text).unwrap(), "a\n\nb");
    }

    #[test]
    fn indented_terminator_accepted() {
        let text = "<<EOF\nhello\n  EOF";
        assert_eq!(value(text).unwrap(), "hello");
    }

    #[test]
    fn missing_terminator_rejected() {
        let text = "<<EOF\nhello\nworld";
        assert_eq!(check(text).unwrap_err(), "heredoc is missing its terminator");
    }

    #[test]
    fn empty_content_rejected() {
        assert_eq!(check("<<EOF\nEOF").unwrap_err(), "heredoc content is empty");
    }
}
