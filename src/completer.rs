use reedline::{Completer, Span, Suggestion};

const COMMANDS: &[&str] = &[
    "list",
    "page",
    "rows",
    "sort",
    "find",
    "new",
    "edit",
    "set",
    "draft",
    "save",
    "cancel",
    "delete",
    "select",
    "deselect",
    "select-none",
    "delete-selected",
    "yes",
    "no",
    "names",
    "export",
    "logs",
    "help",
    "quit",
];

const FIELDS: &[&str] = &["type", "name", "path"];

/// Completes command words, then field names after `set` and `sort`
#[derive(Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }

    fn candidates(input: &str) -> (&'static [&'static str], &str) {
        let mut words = input.split_whitespace();
        let first = words.next().unwrap_or("");
        let partial = if input.ends_with(char::is_whitespace) {
            ""
        } else {
            input.rsplit(char::is_whitespace).next().unwrap_or("")
        };

        let typed_words = input.split_whitespace().count();
        let completing_first = typed_words == 0 || (typed_words == 1 && !partial.is_empty());
        if completing_first {
            return (COMMANDS, partial);
        }

        let completing_second =
            typed_words == 1 || (typed_words == 2 && !partial.is_empty());
        match first {
            "set" | "sort" if completing_second => (FIELDS, partial),
            _ => (&[], partial),
        }
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let input = &line[..pos];
        let (candidates, partial) = Self::candidates(input);
        let start_pos = pos.saturating_sub(partial.len());
        let partial = partial.to_lowercase();

        candidates
            .iter()
            .filter(|word| word.starts_with(&partial))
            .map(|word| Suggestion {
                value: word.to_string(),
                description: None,
                extra: None,
                span: Span {
                    start: start_pos,
                    end: pos,
                },
                style: None,
                append_whitespace: true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<String> {
        CommandCompleter::default()
            .complete(line, line.len())
            .into_iter()
            .map(|s| s.value)
            .collect()
    }

    #[test]
    fn test_completes_command_words() {
        assert_eq!(values("del"), vec!["delete", "delete-selected"]);
        assert_eq!(values("").len(), COMMANDS.len());
    }

    #[test]
    fn test_completes_fields_after_set() {
        assert_eq!(values("set "), vec!["type", "name", "path"]);
        assert_eq!(values("sort pa"), vec!["path"]);
        assert!(values("edit AA").is_empty());
    }
}
