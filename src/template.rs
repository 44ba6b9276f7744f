use regex::Captures;
use thiserror::Error;

/// A command template with `\N` backreference placeholders, parsed once at
/// config load so malformed placeholders are caught before the server starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Group(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template ends with a bare backslash")]
    TrailingBackslash,
    #[error("invalid placeholder `\\{0}` (expected a digit or `\\\\`)")]
    InvalidPlaceholder(char),
    #[error("placeholder group index `{0}` is too large")]
    GroupIndexTooLarge(String),
}

impl Template {
    /// Parse a template string. `\N` (longest digit run) names capture group
    /// N, `\0` the whole match, and `\\` a literal backslash. Any other use
    /// of a backslash is rejected.
    pub fn parse(template: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '\\' {
                literal.push(c);
                continue;
            }
            match chars.peek().copied() {
                None => return Err(TemplateError::TrailingBackslash),
                Some('\\') => {
                    chars.next();
                    literal.push('\\');
                }
                Some(d) if d.is_ascii_digit() => {
                    let mut digits = String::new();
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        digits.push(d);
                        chars.next();
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| TemplateError::GroupIndexTooLarge(digits.clone()))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Group(index));
                }
                Some(other) => return Err(TemplateError::InvalidPlaceholder(other)),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Template { segments })
    }

    /// Expand the template against one match. A group that did not
    /// participate in the match (or does not exist in the pattern) expands
    /// to the empty string.
    pub fn expand(&self, caps: &Captures<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Group(index) => {
                    if let Some(m) = caps.get(*index) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
        out
    }

    /// Expand the template once per match, in match order, concatenated with
    /// no separator. Zero matches yields the empty string.
    pub fn expand_all<'t>(&self, matches: impl IntoIterator<Item = Captures<'t>>) -> String {
        let mut out = String::new();
        for caps in matches {
            out.push_str(&self.expand(&caps));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn captures_of<'t>(pattern: &str, subject: &'t str) -> Vec<Captures<'t>> {
        Regex::new(pattern).unwrap().captures_iter(subject).collect()
    }

    #[test]
    fn literal_template_passes_through() {
        let t = Template::parse("docker compose up -d").unwrap();
        let caps = captures_of("x", "x");
        assert_eq!(t.expand(&caps[0]), "docker compose up -d");
    }

    #[test]
    fn escaped_backslash_is_literal() {
        let t = Template::parse(r"echo C:\\tmp").unwrap();
        let caps = captures_of("x", "x");
        assert_eq!(t.expand(&caps[0]), r"echo C:\tmp");
    }

    #[test]
    fn trailing_backslash_is_rejected() {
        assert_eq!(
            Template::parse(r"deploy.sh \"),
            Err(TemplateError::TrailingBackslash)
        );
    }

    #[test]
    fn non_digit_placeholder_is_rejected() {
        assert_eq!(
            Template::parse(r"deploy.sh \n"),
            Err(TemplateError::InvalidPlaceholder('n'))
        );
    }

    #[test]
    fn single_match_expands_groups_verbatim() {
        let t = Template::parse(r"deploy.sh --branch=\1").unwrap();
        let caps = captures_of(r"^refs/heads/(main)$", "refs/heads/main");
        assert_eq!(caps.len(), 1);
        assert_eq!(t.expand(&caps[0]), "deploy.sh --branch=main");
    }

    #[test]
    fn group_zero_is_the_whole_match() {
        let t = Template::parse(r"got [\0]").unwrap();
        let caps = captures_of(r"v\d+", "release v12");
        assert_eq!(t.expand(&caps[0]), "got [v12]");
    }

    #[test]
    fn non_participating_group_expands_empty() {
        let t = Template::parse(r"a=\1 b=\2").unwrap();
        let caps = captures_of(r"(x)|(y)", "x");
        assert_eq!(t.expand(&caps[0]), "a=x b=");
    }

    #[test]
    fn out_of_range_group_expands_empty() {
        let t = Template::parse(r"a=\1 z=\12").unwrap();
        let caps = captures_of(r"(x)", "x");
        assert_eq!(t.expand(&caps[0]), "a=x z=");
    }

    #[test]
    fn zero_matches_yields_empty_output() {
        let t = Template::parse(r"deploy.sh --branch=\1").unwrap();
        let caps = captures_of(r"^refs/heads/(main)$", "refs/heads/dev");
        assert!(caps.is_empty());
        assert_eq!(t.expand_all(caps), "");
    }

    #[test]
    fn multiple_matches_concatenate_in_order() {
        let t = Template::parse(r"cp \1; ").unwrap();
        let caps = captures_of(r"(\w+)\.txt", "a.txt b.txt c.txt");
        assert_eq!(t.expand_all(caps), "cp a; cp b; cp c; ");
    }

    #[test]
    fn expansion_is_compositional_over_match_splits() {
        let t = Template::parse(r"<\0>").unwrap();
        let re = Regex::new(r"\d+").unwrap();
        let subject = "1 22 333 4444";
        let all = t.expand_all(re.captures_iter(subject));
        for k in 0..=re.find_iter(subject).count() {
            let head = t.expand_all(re.captures_iter(subject).take(k));
            let tail = t.expand_all(re.captures_iter(subject).skip(k));
            assert_eq!(format!("{head}{tail}"), all);
        }
    }
}
