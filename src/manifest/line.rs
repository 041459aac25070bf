//! Line tokenizer for the manifest grammar.

/// One manifest line, classified in a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Empty or whitespace-only.
    Blank,
    /// First non-blank character is `#`.
    Comment,
    /// `@import <dir>`.
    Import(String),
    /// `@shell <command…>` with its tokens rejoined by single spaces.
    Shell(String),
    /// Any other `@` directive, including an `@import` with no argument.
    Unknown(String),
    /// A link rule. `target` is `None` when the line has a single token.
    Rule {
        /// Path relative to the module root; may contain one `*`.
        source: String,
        /// Path relative to the project root.
        target: Option<String>,
    },
}

impl Line {
    /// Classify a raw manifest line. Whitespace runs separate tokens.
    ///
    /// ```
    /// use modlink_cli::manifest::line::Line;
    ///
    /// assert_eq!(Line::parse("# note"), Line::Comment);
    /// assert_eq!(
    ///     Line::parse("lib/Foo.php   Foo.php"),
    ///     Line::Rule { source: "lib/Foo.php".into(), target: Some("Foo.php".into()) }
    /// );
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tokens = raw.split_whitespace();
        let Some(first) = tokens.next() else {
            return Self::Blank;
        };

        if first.starts_with('#') {
            return Self::Comment;
        }

        match first {
            "@import" => tokens
                .next()
                .map_or_else(|| Self::Unknown(raw.trim().to_string()), |dir| {
                    Self::Import(dir.to_string())
                }),
            "@shell" => {
                let command = tokens.collect::<Vec<_>>().join(" ");
                if command.is_empty() {
                    Self::Unknown(raw.trim().to_string())
                } else {
                    Self::Shell(command)
                }
            }
            directive if directive.starts_with('@') => Self::Unknown(raw.trim().to_string()),
            source => Self::Rule {
                source: source.to_string(),
                target: tokens.next().map(str::to_string),
            },
        }
    }
}
