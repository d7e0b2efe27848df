use super::*;

#[test]
fn parses_verbs_and_arguments() {
    assert_eq!(
        parse_command("search  Mr Mime "),
        Ok(Some(ShellCommand::Search("Mr Mime".to_string())))
    );
    assert_eq!(parse_command("n"), Ok(Some(ShellCommand::Relative(1))));
    assert_eq!(parse_command("PREV"), Ok(Some(ShellCommand::Relative(-1))));
    assert_eq!(parse_command("browse"), Ok(Some(ShellCommand::Browse(None))));
    assert_eq!(
        parse_command("browse johto"),
        Ok(Some(ShellCommand::Browse(Some("johto".to_string()))))
    );
    assert_eq!(parse_command("   "), Ok(None));
}

#[test]
fn rejects_missing_arguments_and_unknown_verbs() {
    assert!(parse_command("search").is_err());
    assert!(parse_command("region").is_err());
    assert!(parse_command("dance").is_err());
}
