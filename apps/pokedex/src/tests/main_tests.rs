use super::*;

#[test]
fn rust_log_keeps_boot_filter() {
    assert!(configured_filter(Some("debug"), "warn").is_none());
}

#[test]
fn settings_filter_applies_without_rust_log() {
    let filter = configured_filter(None, "dex_core=debug").expect("filter");
    assert_eq!(filter.to_string(), "dex_core=debug");

    let filter = configured_filter(Some("  "), "warn").expect("blank RUST_LOG ignored");
    assert_eq!(filter.to_string(), "warn");
}

#[test]
fn name_index_only_needed_for_all_regions() {
    assert!(needs_name_index("all"));
    assert!(needs_name_index(" ALL "));
    assert!(!needs_name_index("kanto"));
}

#[test]
fn cli_parses_random_region() {
    let cli = Cli::try_parse_from(["pokedex", "random", "--region", "johto"]).expect("parse");
    match cli.command {
        Some(Command::Random { region }) => assert_eq!(region.as_deref(), Some("johto")),
        other => panic!("unexpected command: {other:?}"),
    }
}
