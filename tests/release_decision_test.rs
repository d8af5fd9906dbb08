// tests/release_decision_test.rs
use chrono::Utc;
use release_pr::analyzer::{next_version, ChangeClassifier};
use release_pr::config::Config;
use release_pr::domain::{
    BumpLevel, Change, ChangeState, Disposition, PreReleaseChannel, SemanticVersion,
};
use release_pr::engine::ReleaseStateResolver;
use release_pr::hosting::{MockHost, ReleaseRepository};
use release_pr::inputs::RunInputs;
use release_pr::manifest::PackageJsonManifest;
use std::io::Write;

fn labelled(number: u64, labels: &[&str]) -> Change {
    Change::new(number, format!("change #{}", number), ChangeState::Closed)
        .with_labels(labels.iter().copied())
        .merged(Utc::now(), format!("sha-{}", number))
}

#[test]
fn test_fix_on_pre_release_resolves_to_patch_release() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"name": "app", "version": "1.2.3-alpha.4"}"#)
        .unwrap();
    file.flush().unwrap();

    let config = Config::default();
    let host = MockHost::new()
        .with_closed_page(vec![labelled(5, &["type: fix"])])
        .with_release_notes("header\n\n* fix: crash\n");
    let repository = ReleaseRepository::new(&host, &config, "head").unwrap();
    let manifest = PackageJsonManifest::new(file.path());
    let inputs = RunInputs {
        sha: "head".to_string(),
        actor: "octocat".to_string(),
        event_name: "push".to_string(),
        pre_release: None,
        release_as: None,
    };

    let current = SemanticVersion::parse("1.2.3-alpha.4").unwrap();
    let classifier = ChangeClassifier::new(&config.labels);
    assert_eq!(
        classifier.classify(&[labelled(5, &["type: fix"])], Some(&current)),
        BumpLevel::Patch
    );

    let resolution = ReleaseStateResolver::new(&repository, &manifest, &inputs)
        .resolve()
        .unwrap();

    assert_eq!(resolution.context.disposition(), Disposition::Prepare);
    assert_eq!(
        resolution.context.next_version.as_ref().map(|v| v.to_string()),
        Some("1.2.4".to_string())
    );
    assert_eq!(resolution.context.release_notes.as_deref(), Some("* fix: crash\n"));
}

#[test]
fn test_major_label_depends_on_stability() {
    let config = Config::default();
    let classifier = ChangeClassifier::new(&config.labels);
    let changes = [labelled(1, &["breaking"])];

    let stable = SemanticVersion::parse("1.0.0").unwrap();
    let level = classifier.classify(&changes, Some(&stable));
    assert_eq!(level, BumpLevel::Major);
    assert_eq!(
        next_version(Some(&stable), level, None).unwrap(),
        Some(SemanticVersion::new(2, 0, 0))
    );

    let unstable = SemanticVersion::parse("0.10.0").unwrap();
    let level = classifier.classify(&changes, Some(&unstable));
    assert_eq!(level, BumpLevel::Minor);
    assert_eq!(
        next_version(Some(&unstable), level, None).unwrap(),
        Some(SemanticVersion::new(0, 11, 0))
    );
}

#[test]
fn test_adding_changes_never_lowers_the_bump() {
    let config = Config::default();
    let classifier = ChangeClassifier::new(&config.labels);
    let current = SemanticVersion::new(1, 0, 0);
    let pool = [
        labelled(1, &["changelog-ignore", "breaking"]),
        labelled(2, &["type: fix"]),
        labelled(3, &[]),
        labelled(4, &["type: feature"]),
        labelled(5, &["breaking"]),
        labelled(6, &["changelog-ignore"]),
    ];

    let mut previous = BumpLevel::None;
    for end in 1..=pool.len() {
        let level = classifier.classify(&pool[..end], Some(&current));
        assert!(level >= previous, "bump lowered after change #{}", end);
        previous = level;
    }
    assert_eq!(previous, BumpLevel::Major);
}

#[test]
fn test_repeated_pre_releases_only_advance_the_counter() {
    let beta = PreReleaseChannel::parse("beta").unwrap();
    let first = next_version(Some(&SemanticVersion::new(1, 4, 0)), BumpLevel::Minor, Some(&beta))
        .unwrap()
        .unwrap();
    assert_eq!(first.to_string(), "1.5.0-beta.0");

    let second = next_version(Some(&first), BumpLevel::None, Some(&beta))
        .unwrap()
        .unwrap();
    let third = next_version(Some(&second), BumpLevel::None, Some(&beta))
        .unwrap()
        .unwrap();

    assert_eq!(second.to_string(), "1.5.0-beta.1");
    assert_eq!(third.to_string(), "1.5.0-beta.2");
    assert!(third > second);
}
