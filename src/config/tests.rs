use std::path::Path;

use super::*;

#[test]
fn defaults_match_the_stock_deployment() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    let expected: SocketAddr = "0.0.0.0:5000".parse().expect("addr");
    assert_eq!(settings.server.addr, expected);
    assert_eq!(settings.storage.data_file, Path::new("data/post.json"));
    assert_eq!(settings.site.title, "Blog");
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.storage.data_file = Some(PathBuf::from("from-file.json"));

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        storage: StorageOverride {
            data_file: Some(PathBuf::from("/srv/posts.json")),
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.storage.data_file, Path::new("/srv/posts.json"));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);

    let err = Settings::from_raw(raw).expect_err("port zero");
    assert!(matches!(err, LoadError::Invalid { key: "server.port", .. }));
}

#[test]
fn unparsable_host_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.host = Some("not a host".to_string());

    let err = Settings::from_raw(raw).expect_err("bad host");
    assert!(matches!(err, LoadError::Invalid { key: "server.addr", .. }));
}

#[test]
fn empty_data_file_is_rejected() {
    let mut raw = RawSettings::default();
    raw.storage.data_file = Some(PathBuf::new());

    let err = Settings::from_raw(raw).expect_err("empty path");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "storage.data_file",
            ..
        }
    ));
}

#[test]
fn site_title_is_trimmed_and_must_not_be_blank() {
    let mut raw = RawSettings::default();
    raw.site.title = Some("  Field Notes ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.site.title, "Field Notes");

    let mut raw = RawSettings::default();
    raw.site.title = Some("   ".to_string());
    let err = Settings::from_raw(raw).expect_err("blank title");
    assert!(matches!(err, LoadError::Invalid { key: "site.title", .. }));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["postboard"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "postboard",
        "serve",
        "--server-host",
        "127.0.0.1",
        "--server-port",
        "8080",
        "--data-file",
        "/tmp/posts.json",
        "--log-json",
        "yes",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("127.0.0.1"));
            assert_eq!(serve.overrides.server_port, Some(8080));
            assert_eq!(
                serve.overrides.storage.data_file.as_deref(),
                Some(Path::new("/tmp/posts.json"))
            );
            assert_eq!(serve.overrides.log_json, Some(true));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_check_arguments() {
    let args = CliArgs::parse_from(["postboard", "check", "--data-file", "/tmp/posts.json"]);

    match args.command.expect("check command") {
        Command::Check(check) => {
            assert_eq!(
                check.storage.data_file.as_deref(),
                Some(Path::new("/tmp/posts.json"))
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn check_ignores_serve_only_settings() {
    let mut raw = RawSettings::default();
    raw.apply_storage_override(&StorageOverride {
        data_file: Some(PathBuf::from("elsewhere.json")),
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.storage.data_file, Path::new("elsewhere.json"));
    assert_eq!(settings.server.addr.port(), 5000);
}
