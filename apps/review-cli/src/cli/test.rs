use clap::Parser;
use review_core::model::list_query::StatusFilter;
use review_core::model::verification_request::RequestStatus;

use super::{Cli, Command};

#[test]
fn test_parse_list_with_filters() {
    let cli = Cli::try_parse_from([
        "review-cli",
        "list",
        "--status",
        "needs_more_info",
        "--company-id",
        "12",
        "--page",
        "3",
        "--search",
        "acme",
    ])
    .unwrap();

    let Command::List(args) = cli.command else {
        panic!("expected list command");
    };
    let query = args.query(25);
    assert_eq!(query.status, StatusFilter::Only(RequestStatus::NeedsMoreInfo));
    assert_eq!(query.company_id.map(i64::from), Some(12));
    assert_eq!(query.page, 3);
    assert_eq!(query.per_page, 25);
    assert_eq!(args.search.as_deref(), Some("acme"));
}

#[test]
fn test_parse_list_defaults() {
    let cli = Cli::try_parse_from(["review-cli", "list", "--page", "0"]).unwrap();

    let Command::List(args) = cli.command else {
        panic!("expected list command");
    };
    let query = args.query(20);
    assert_eq!(query.status, StatusFilter::All);
    assert_eq!(query.page, 1);
}

#[test]
fn test_parse_reject_requires_reason() {
    assert!(Cli::try_parse_from(["review-cli", "reject", "7"]).is_err());

    let cli = Cli::try_parse_from(["review-cli", "reject", "7", "--reason", "expired license"])
        .unwrap();
    let Command::Reject { id, reason, page } = cli.command else {
        panic!("expected reject command");
    };
    assert_eq!(i64::from(id), 7);
    assert_eq!(reason, "expired license");
    assert_eq!(page.query(20).page, 1);
}

#[test]
fn test_parse_rejects_unknown_status_filter() {
    assert!(Cli::try_parse_from(["review-cli", "list", "--status", "archived"]).is_err());
}

#[test]
fn test_parse_config_files() {
    let cli = Cli::try_parse_from([
        "review-cli",
        "-c",
        "local.yml",
        "--config",
        "secrets.json",
        "show",
        "9",
    ])
    .unwrap();

    assert_eq!(cli.config.map(|files| files.len()), Some(2));
    assert!(matches!(cli.command, Command::Show { .. }));
}
