//! Unit tests for ruleset loading and pattern types.

use super::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const SAMPLE: &str = r#"{
    "both": ["mods/", "config/"],
    "client_only": ["resourcepacks/"],
    "server_only": ["server.properties"],
    "client_exclude": ["^mods/server-"],
    "server_exclude": ["config/.*\\.client\\.cfg$"],
    "to_format": {
        "instance.cfg": { "OUTPUT_VERSION": "{OUTPUT_VERSION}", "NAME": "Blightfall" }
    },
    "rename_map": { "flans": "world" },
    "toplevel_client_files": ["instance.cfg"]
}"#;

#[fixture]
fn version() -> OutputVersion {
    OutputVersion::try_from("1.2.3").expect("valid version")
}

#[fixture]
fn sample(version: OutputVersion) -> Ruleset {
    Ruleset::from_json_str(SAMPLE, &version).expect("sample ruleset parses")
}

#[rstest]
fn interpolation_replaces_every_placeholder(version: OutputVersion) {
    let raw = r#"{"a": "{OUTPUT_VERSION}", "b": "v{OUTPUT_VERSION}-{OUTPUT_VERSION}"}"#;
    assert_eq!(
        interpolate_version(raw, &version),
        r#"{"a": "1.2.3", "b": "v1.2.3-1.2.3"}"#
    );
}

#[test]
fn interpolation_with_empty_version_removes_placeholder() {
    let raw = "version={OUTPUT_VERSION}";
    assert_eq!(
        interpolate_version(raw, &OutputVersion::unversioned()),
        "version="
    );
}

#[rstest]
fn substitution_values_see_the_version(sample: Ruleset) {
    let tokens = sample.tokens_for("instance.cfg").expect("instance.cfg tokens");
    assert_eq!(tokens.get("OUTPUT_VERSION").map(String::as_str), Some("1.2.3"));
    assert_eq!(tokens.get("NAME").map(String::as_str), Some("Blightfall"));
    assert!(sample.tokens_for("other.cfg").is_none());
}

#[rstest]
fn toplevel_files_are_appended_to_client_only(sample: Ruleset) {
    assert!(sample.client_only().contains("instance.cfg"));
    assert!(sample.client_only().contains("resourcepacks/"));
    assert!(sample.is_toplevel_client_file("instance.cfg"));
    assert!(!sample.is_toplevel_client_file("resourcepacks/"));
}

#[test]
fn missing_keys_default_to_empty() {
    let ruleset =
        Ruleset::from_json_str("{}", &OutputVersion::unversioned()).expect("empty document");
    assert!(ruleset.both().patterns().is_empty());
    assert!(!ruleset.client_exclude().is_match("mods/anything.jar"));
    assert_eq!(ruleset.rename_map().apply("flans/x"), "flans/x");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = Ruleset::from_json_str(r#"{"bothh": []}"#, &OutputVersion::unversioned())
        .expect_err("unknown key rejected");
    assert!(matches!(err, PackagerError::RulesetParse { .. }));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Ruleset::from_json_str("{ not json", &OutputVersion::unversioned())
        .expect_err("malformed document rejected");
    assert!(matches!(err, PackagerError::RulesetParse { origin, .. } if origin == "<inline>"));
}

#[test]
fn invalid_exclusion_names_key_and_pattern() {
    let raw = r#"{"server_exclude": ["ok", "(unclosed"]}"#;
    let err = Ruleset::from_json_str(raw, &OutputVersion::unversioned())
        .expect_err("invalid regex rejected");
    match err {
        PackagerError::InvalidPattern { key, pattern, .. } => {
            assert_eq!(key, "server_exclude");
            assert_eq!(pattern, "(unclosed");
        }
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[rstest]
fn load_reads_from_disk(version: OutputVersion) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, SAMPLE).expect("write ruleset");
    let ruleset = Ruleset::load(&path, &version).expect("ruleset loads");
    assert!(ruleset.both().contains("mods/"));
}

#[rstest]
fn load_reports_missing_file(version: OutputVersion) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.json");
    let err = Ruleset::load(&path, &version).expect_err("missing ruleset rejected");
    assert!(matches!(err, PackagerError::RulesetRead { path: p, .. } if p == path));
}

#[rstest]
#[case::prefix("mods/jei.jar", "jei.jar", true)]
#[case::basename("deep/nested/options.txt", "options.txt", true)]
#[case::prefix_is_not_substring("config/mods/a.cfg", "a.cfg", false)]
#[case::basename_is_exact("old-options.txt", "old-options.txt", false)]
fn pattern_set_matches_prefix_or_basename(
    #[case] rel_path: &str,
    #[case] basename: &str,
    #[case] expected: bool,
) {
    let set = PatternSet::new(vec!["mods/".to_owned(), "options.txt".to_owned()]);
    assert_eq!(set.matches(rel_path, basename), expected);
}

#[rstest]
#[case::anywhere("config/a.client.cfg", true)]
#[case::anchored_prefix("mods/server-utils.jar", true)]
#[case::anchor_respected("mods/not-server-utils.jar", false)]
fn exclusions_search_unanchored(#[case] rel_path: &str, #[case] expected: bool) {
    let set = ExclusionSet::compile(
        "client_exclude",
        &["\\.client\\.".to_owned(), "^mods/server-".to_owned()],
    )
    .expect("patterns compile");
    assert_eq!(set.is_match(rel_path), expected);
}

#[rstest]
#[case::renamed("flans/worldname/x.txt", "world/worldname/x.txt")]
#[case::segment_must_end("flansmod/x.txt", "flansmod/x.txt")]
#[case::only_at_start("mods/flans/x.txt", "mods/flans/x.txt")]
#[case::once("flans/flans/x.txt", "world/flans/x.txt")]
fn rename_map_rewrites_leading_segment(#[case] name: &str, #[case] expected: &str) {
    let map = RenameMap::new(IndexMap::from([("flans".to_owned(), "world".to_owned())]));
    assert_eq!(map.apply(name), expected);
}

#[test]
fn rename_map_first_key_wins() {
    let map = RenameMap::new(IndexMap::from([
        ("minecraft/flans".to_owned(), "minecraft/world".to_owned()),
        ("minecraft".to_owned(), "game".to_owned()),
    ]));
    assert_eq!(map.apply("minecraft/flans/a"), "minecraft/world/a");
    assert_eq!(map.apply("minecraft/mods/a"), "game/mods/a");
}

#[rstest]
fn example_ruleset_parses(version: OutputVersion) {
    let ruleset = Ruleset::from_json_str(include_str!("../config.example.json"), &version)
        .expect("example ruleset parses");
    assert!(ruleset.is_toplevel_client_file("mmc-pack.json"));
    assert!(ruleset.server_exclude().is_match("mods/hud-client.jar"));
    assert_eq!(ruleset.rename_map().apply("flans/a.txt"), "world/a.txt");
}
