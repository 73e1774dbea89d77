//! Tests for the clone command

use std::fs;

use clone_chat::archive::DUMP_FILE;
use clone_chat::commands::{build_plan, clone_run, Endpoint};
use clone_chat::{parse_from, Commands, Config, Error};
use tempfile::tempdir;

fn clone_args(argv: &[&str]) -> clone_chat::CloneArgs {
    let mut full = vec!["prog", "clone"];
    full.extend_from_slice(argv);
    match parse_from(full).unwrap().command {
        Some(Commands::Clone(args)) => args,
        other => panic!("expected clone, got {:?}", other),
    }
}

#[test]
fn test_plan_from_parsed_arguments() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("backup").display().to_string();

    let args = clone_args(&["-i", "@news", "-o", out.as_str(), "-rev"]);
    let plan = build_plan(&args).unwrap();

    assert!(plan.source.is_live());
    assert!(matches!(plan.destination, Endpoint::Archive { ref dump, .. } if dump.ends_with(DUMP_FILE)));
    assert!(plan.history.reverse);
}

#[tokio::test]
async fn test_dump_to_dump_clone() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join(DUMP_FILE), b"0123456789").unwrap();
    let dst = temp.path().join("dst");
    let input = src.display().to_string();
    let output = dst.display().to_string();

    let args = clone_args(&["--input", input.as_str(), "--output", output.as_str()]);
    let bytes = clone_run(&args, &Config::default()).await.unwrap();

    assert_eq!(bytes, 10);
    assert_eq!(fs::read(dst.join(DUMP_FILE)).unwrap(), b"0123456789");

    // A second run must not overwrite the fresh dump
    let err = clone_run(&args, &Config::default()).await.unwrap_err();
    assert!(matches!(err, Error::ArchiveExists(_)));
}
