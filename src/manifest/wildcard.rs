//! Wildcard expansion for link rules whose source contains `*`.
use std::path::Path;

use glob::{MatchOptions, Pattern};

use super::paths::{normalize, relative_to};
use crate::logging::Log;

/// `*` stays inside one path segment and never matches a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand `source` against the files under `module_root`.
///
/// Returns `(source, target)` pairs in sorted match order, with both sides
/// relative and `/`-separated. The text matched by `*` is substituted into
/// the target:
///
/// - no target: the target is the matched path itself;
/// - target with `*`: target prefix + capture + target suffix;
/// - plain target: it replaces the source's literal prefix, so
///   `lib/* js` maps `lib/a` to `js/a`.
///
/// Only `*` is special; every other character in the module root and the
/// source is matched literally.
pub(super) fn expand(
    module_root: &Path,
    source: &str,
    target: Option<&str>,
    log: &dyn Log,
) -> Vec<(String, String)> {
    let source = normalize(source);
    let Some((prefix, suffix)) = source.split_once('*') else {
        return vec![(source.clone(), target.map_or(source, normalize))];
    };
    if suffix.contains('*') {
        log.warn(&format!(
            "only one '*' is supported per source, skipping: {source}"
        ));
        return Vec::new();
    }

    let pattern = format!(
        "{}/{}*{}",
        Pattern::escape(&module_root.to_string_lossy()),
        Pattern::escape(prefix),
        Pattern::escape(suffix),
    );

    let mut matches = match glob::glob_with(&pattern, MATCH_OPTIONS) {
        Ok(paths) => paths.flatten().collect::<Vec<_>>(),
        Err(e) => {
            log.warn(&format!("invalid wildcard {source}: {e}"));
            return Vec::new();
        }
    };
    matches.sort();

    if matches.is_empty() {
        log.debug(&format!("wildcard matched nothing: {source}"));
    }

    matches
        .iter()
        .filter_map(|path| {
            let rel = relative_to(path, module_root)?;
            let capture = rel.strip_prefix(prefix)?.strip_suffix(suffix)?;
            let built = build_target(target, &rel, prefix, capture, suffix);
            Some((rel.clone(), normalize(&built)))
        })
        .collect()
}

/// Build the target path for one wildcard match.
fn build_target(
    target: Option<&str>,
    matched: &str,
    source_prefix: &str,
    capture: &str,
    source_suffix: &str,
) -> String {
    match target {
        None => matched.to_string(),
        Some(t) => match t.split_once('*') {
            Some((t_prefix, t_suffix)) => format!("{t_prefix}{capture}{t_suffix}"),
            None => {
                let sep = if source_prefix.ends_with('/') && !t.ends_with('/') {
                    "/"
                } else {
                    ""
                };
                format!("{t}{sep}{capture}{source_suffix}")
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::MemoryLog;
    use std::fs;

    fn module(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    #[test]
    fn star_in_both_sides() {
        let dir = module(&["templates/b.phtml", "templates/a.phtml", "templates/c.txt"]);
        let log = MemoryLog::new();
        let rules = expand(
            dir.path(),
            "templates/*.phtml",
            Some("app/design/*.phtml"),
            &log,
        );
        assert_eq!(
            rules,
            vec![
                ("templates/a.phtml".into(), "app/design/a.phtml".into()),
                ("templates/b.phtml".into(), "app/design/b.phtml".into()),
            ]
        );
    }

    #[test]
    fn no_target_mirrors_match() {
        let dir = module(&["lib/a.js", "lib/b.js"]);
        let log = MemoryLog::new();
        let rules = expand(dir.path(), "lib/*", None, &log);
        assert_eq!(
            rules,
            vec![
                ("lib/a.js".into(), "lib/a.js".into()),
                ("lib/b.js".into(), "lib/b.js".into()),
            ]
        );
    }

    #[test]
    fn plain_target_replaces_prefix() {
        let dir = module(&["lib/a.js"]);
        let log = MemoryLog::new();
        let rules = expand(dir.path(), "lib/*", Some("js"), &log);
        assert_eq!(rules, vec![("lib/a.js".into(), "js/a.js".into())]);
    }

    #[test]
    fn plain_target_keeps_source_suffix() {
        let dir = module(&["skin/x.css"]);
        let log = MemoryLog::new();
        let rules = expand(dir.path(), "skin/*.css", Some("css/"), &log);
        assert_eq!(rules, vec![("skin/x.css".into(), "css/x.css".into())]);
    }

    #[test]
    fn star_does_not_cross_separators() {
        let dir = module(&["lib/a.js", "lib/deep/b.js"]);
        let log = MemoryLog::new();
        let rules = expand(dir.path(), "lib/*.js", None, &log);
        assert_eq!(rules, vec![("lib/a.js".into(), "lib/a.js".into())]);
    }

    #[test]
    fn star_skips_hidden_entries() {
        let dir = module(&["lib/.hidden", "lib/shown"]);
        let log = MemoryLog::new();
        let rules = expand(dir.path(), "lib/*", None, &log);
        assert_eq!(rules, vec![("lib/shown".into(), "lib/shown".into())]);
    }

    #[test]
    fn metacharacters_in_root_are_literal() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("mod[1]");
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::write(root.join("lib/a"), "").unwrap();
        let log = MemoryLog::new();
        let rules = expand(&root, "lib/*", None, &log);
        assert_eq!(rules, vec![("lib/a".into(), "lib/a".into())]);
    }

    #[test]
    fn no_matches_yields_nothing() {
        let dir = module(&["lib/a.js"]);
        let log = MemoryLog::new();
        assert!(expand(dir.path(), "missing/*", None, &log).is_empty());
    }

    #[test]
    fn two_stars_are_skipped_with_warning() {
        let dir = module(&["a/b/c"]);
        let log = MemoryLog::new();
        assert!(expand(dir.path(), "*/*/c", None, &log).is_empty());
        assert!(log.contains("warn", "only one '*'"));
    }

    #[test]
    fn directories_are_matched_too() {
        let dir = module(&["app/code/Foo/etc.xml", "app/code/Bar/etc.xml"]);
        let log = MemoryLog::new();
        let rules = expand(dir.path(), "app/code/*", None, &log);
        assert_eq!(
            rules,
            vec![
                ("app/code/Bar".into(), "app/code/Bar".into()),
                ("app/code/Foo".into(), "app/code/Foo".into()),
            ]
        );
    }
}
