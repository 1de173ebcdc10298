//! Path classification rules.
//!
//! Classification is a pure function of the path text. Rules live in a
//! fixed-priority table of (category, anchor pattern) pairs whose anchors
//! are disjoint, so a path matches at most one category. A path that
//! matches no rule is simply not of interest.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Category, Classified};

lazy_static! {
    /// Classification rules in priority order.
    static ref RULES: [(Category, Regex); 3] = [
        (
            Category::Config,
            Regex::new(r".*/etc/system/(.*\.conf)$").unwrap(),
        ),
        (
            Category::ApplicationMeta,
            Regex::new(r".*/etc/apps/(.*\.meta)$").unwrap(),
        ),
        (
            Category::UserHistory,
            Regex::new(r".*/users/([^/]+)/history/.*\.csv$").unwrap(),
        ),
    ];
}

/// Classify a file path, extracting the category-specific identifying name.
///
/// Returns `None` for paths of no interest; callers skip those without
/// logging an error.
pub fn classify(path: &Path) -> Option<Classified> {
    let text = path.to_string_lossy();
    for (category, pattern) in RULES.iter() {
        if let Some(caps) = pattern.captures(&text) {
            return extract(*category, &caps[1]);
        }
    }
    None
}

fn extract(category: Category, capture: &str) -> Option<Classified> {
    match category {
        Category::Config => Some(Classified::Config {
            name: capture.to_string(),
        }),
        Category::ApplicationMeta => {
            let segments: Vec<&str> = capture.split('/').collect();
            // Only the app/<dir>/<file>.meta layout participates; metadata
            // nested at any other depth is skipped entirely.
            if segments.len() != 3 {
                return None;
            }
            let component = segments[2].strip_suffix(".meta").unwrap_or(segments[2]);
            Some(Classified::AppMeta {
                app: segments[0].to_string(),
                component: component.to_string(),
            })
        }
        Category::UserHistory => Some(Classified::History {
            user: capture.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_conf_files_are_configs() {
        let classified = classify(Path::new("/opt/splunk/etc/system/local/indexes.conf")).unwrap();
        assert_eq!(
            classified,
            Classified::Config {
                name: "local/indexes.conf".to_string()
            }
        );
        assert_eq!(classified.source_name(), "local/indexes.conf");
    }

    #[test]
    fn bare_conf_name_is_preserved() {
        let classified = classify(Path::new("/diag/etc/system/app.conf")).unwrap();
        assert_eq!(classified.source_name(), "app.conf");
        assert_eq!(classified.category(), Category::Config);
    }

    #[test]
    fn three_segment_meta_paths_are_application_metadata() {
        let classified = classify(Path::new("/diag/etc/apps/myapp/local/app.meta")).unwrap();
        assert_eq!(
            classified,
            Classified::AppMeta {
                app: "myapp".to_string(),
                component: "app".to_string()
            }
        );
        assert_eq!(classified.source_name(), "myapp_app");
    }

    #[test]
    fn meta_paths_at_other_depths_are_skipped() {
        assert_eq!(classify(Path::new("/diag/etc/apps/myapp/app.meta")), None);
        assert_eq!(
            classify(Path::new("/diag/etc/apps/myapp/deep/nested/app.meta")),
            None
        );
    }

    #[test]
    fn history_csv_files_identify_the_user() {
        let classified = classify(Path::new("/diag/users/alice/history/search.csv")).unwrap();
        assert_eq!(
            classified,
            Classified::History {
                user: "alice".to_string()
            }
        );
        assert_eq!(classified.source_name(), "alice");
    }

    #[test]
    fn unmatched_paths_have_no_category() {
        assert_eq!(classify(Path::new("/diag/etc/other/readme.txt")), None);
        assert_eq!(classify(Path::new("/diag/etc/system/notes.txt")), None);
        assert_eq!(classify(Path::new("/diag/users/alice/history/search.log")), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let path = Path::new("/diag/etc/system/app.conf");
        assert_eq!(classify(path), classify(path));
    }
}
