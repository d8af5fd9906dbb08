use crate::domain::{BumpLevel, Change, ReleaseLabels, SemanticVersion};

/// Classifies merged changes into a version bump level from their labels
pub struct ChangeClassifier<'a> {
    labels: &'a ReleaseLabels,
}

impl<'a> ChangeClassifier<'a> {
    /// Create a new classifier for the given label configuration
    pub fn new(labels: &'a ReleaseLabels) -> Self {
        ChangeClassifier { labels }
    }

    /// Highest bump level contributed by any change; `None` for an empty list.
    ///
    /// A `major` label only yields `Major` once the package is stable
    /// (major >= 1); before that it is capped to `Minor`.
    pub fn classify(&self, changes: &[Change], current: Option<&SemanticVersion>) -> BumpLevel {
        let is_stable = current.is_some_and(SemanticVersion::is_stable);

        changes
            .iter()
            .map(|change| self.classify_change(change, is_stable))
            .max()
            .unwrap_or(BumpLevel::None)
    }

    /// Bump level contributed by a single change
    pub fn classify_change(&self, change: &Change, is_stable: bool) -> BumpLevel {
        let bump_labels: Vec<&str> = change
            .labels
            .iter()
            .map(String::as_str)
            .filter(|label| self.labels.is_classifying(label))
            .collect();
        let has_any = |set: &[String]| bump_labels.iter().any(|label| set.iter().any(|s| s == label));

        if has_any(&self.labels.ignore) {
            return BumpLevel::None;
        }

        if has_any(&self.labels.major) {
            return if is_stable {
                BumpLevel::Major
            } else {
                BumpLevel::Minor
            };
        }

        if has_any(&self.labels.minor) {
            return BumpLevel::Minor;
        }

        if has_any(&self.labels.patch) {
            return BumpLevel::Patch;
        }

        BumpLevel::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChangeState;

    fn labels() -> ReleaseLabels {
        ReleaseLabels {
            ignore: vec!["changelog-ignore".to_string()],
            patch: vec!["patch".to_string()],
            minor: vec!["minor".to_string()],
            major: vec!["major".to_string()],
            ..ReleaseLabels::default()
        }
    }

    fn change(labels: &[&str]) -> Change {
        Change::new(1, "change", ChangeState::Closed).with_labels(labels.iter().copied())
    }

    fn change_cases() -> Vec<Vec<Change>> {
        vec![
            vec![],
            vec![change(&["label"])],
            vec![change(&["patch"]), change(&["label"])],
            vec![
                change(&["patch"]),
                change(&["minor", "major", "changelog-ignore"]),
                change(&["minor"]),
                change(&["label"]),
            ],
            vec![
                change(&["patch"]),
                change(&["minor", "major"]),
                change(&["label"]),
            ],
        ]
    }

    fn check(version: Option<&str>, expected: [BumpLevel; 5]) {
        let labels = labels();
        let classifier = ChangeClassifier::new(&labels);
        let current = version.map(|v| SemanticVersion::parse(v).unwrap());

        for (index, (changes, expected)) in change_cases().iter().zip(expected).enumerate() {
            assert_eq!(
                classifier.classify(changes, current.as_ref()),
                expected,
                "version {:?}, case {}",
                version,
                index
            );
        }
    }

    #[test]
    fn test_classify_stable_version() {
        check(
            Some("1.0.0"),
            [
                BumpLevel::None,
                BumpLevel::None,
                BumpLevel::Patch,
                BumpLevel::Minor,
                BumpLevel::Major,
            ],
        );
    }

    #[test]
    fn test_classify_unstable_version_caps_major() {
        check(
            Some("0.10.0"),
            [
                BumpLevel::None,
                BumpLevel::None,
                BumpLevel::Patch,
                BumpLevel::Minor,
                BumpLevel::Minor,
            ],
        );
    }

    #[test]
    fn test_classify_without_version_caps_major() {
        check(
            None,
            [
                BumpLevel::None,
                BumpLevel::None,
                BumpLevel::Patch,
                BumpLevel::Minor,
                BumpLevel::Minor,
            ],
        );
    }

    #[test]
    fn test_ignore_dominates_all_labels() {
        let labels = labels();
        let classifier = ChangeClassifier::new(&labels);
        let current = SemanticVersion::new(3, 1, 0);
        let changes = vec![
            change(&["changelog-ignore", "major"]),
            change(&["changelog-ignore", "minor", "patch"]),
        ];

        assert_eq!(classifier.classify(&changes, Some(&current)), BumpLevel::None);
    }

    #[test]
    fn test_classify_is_order_independent_and_monotonic() {
        let labels = labels();
        let classifier = ChangeClassifier::new(&labels);
        let current = SemanticVersion::new(1, 0, 0);
        let mut changes = vec![change(&["patch"])];
        let mut previous = classifier.classify(&changes, Some(&current));

        for extra in [change(&["label"]), change(&["minor"]), change(&["changelog-ignore"]), change(&["patch"])] {
            changes.push(extra);
            let level = classifier.classify(&changes, Some(&current));
            assert!(level >= previous);
            previous = level;
        }

        let mut reversed = changes.clone();
        reversed.reverse();
        assert_eq!(
            classifier.classify(&reversed, Some(&current)),
            classifier.classify(&changes, Some(&current))
        );
    }
}
