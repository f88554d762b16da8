use std::path::PathBuf;
use std::time::Duration;

use mike::cli::Args;
use mike::config::{load_config, Config, ConfigError, FileConfig};

fn make_args(port: Option<u16>, music: Option<PathBuf>) -> Args {
    Args {
        music,
        assets: None,
        port,
        config: None,
        localhost: false,
        session_tokens: vec![],
    }
}

#[test]
fn test_defaults_when_nothing_set() {
    let config = Config::resolve(None, &make_args(None, None)).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.music_path, PathBuf::from("/music"));
    assert_eq!(config.assets_path, PathBuf::from("assets"));
    assert_eq!(config.mount, "/music");
    assert_eq!(config.session_ttl, Duration::from_secs(3600));
    assert!(!config.localhost);
    assert!(config.session_tokens.is_empty());
}

#[test]
fn test_cli_overrides_toml() {
    let file = FileConfig {
        port: Some(7777),
        music_path: Some(PathBuf::from("/srv/music")),
        ..Default::default()
    };
    let args = make_args(Some(9000), Some(PathBuf::from("/mnt/nas")));
    let config = Config::resolve(Some(file), &args).unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.music_path, PathBuf::from("/mnt/nas"));
}

#[test]
fn test_toml_overrides_default() {
    let file = FileConfig {
        port: Some(7777),
        session_ttl_secs: Some(300),
        mount: Some("/songs".to_string()),
        ..Default::default()
    };
    let config = Config::resolve(Some(file), &make_args(None, None)).unwrap();
    assert_eq!(config.port, 7777);
    assert_eq!(config.session_ttl, Duration::from_secs(300));
    assert_eq!(config.mount, "/songs");
}

#[test]
fn test_session_tokens_are_merged() {
    let file = FileConfig {
        session_tokens: Some(vec!["from-file".to_string()]),
        ..Default::default()
    };
    let mut args = make_args(None, None);
    args.session_tokens = vec!["from-cli".to_string()];
    let config = Config::resolve(Some(file), &args).unwrap();
    assert_eq!(config.session_tokens, vec!["from-cli", "from-file"]);
}

#[test]
fn test_toml_parse() {
    let toml_str = "port = 9000\nmusic_path = \"/srv/music\"\nsession_tokens = [\"kitchen\"]\n";
    let parsed: FileConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(parsed.port, Some(9000));
    assert_eq!(parsed.music_path, Some(PathBuf::from("/srv/music")));
    assert_eq!(parsed.session_tokens, Some(vec!["kitchen".to_string()]));
}

#[test]
fn test_toml_unknown_fields_ignored() {
    let parsed: Result<FileConfig, _> =
        toml::from_str("port = 9000\nunknown_future_key = true\n");
    assert!(parsed.is_ok());
}

#[test]
fn test_load_config_reports_the_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("mike.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("mike.toml"), "{err}");
}

fn resolve_mount(mount: &str) -> Result<Config, ConfigError> {
    let file = FileConfig {
        mount: Some(mount.to_string()),
        ..Default::default()
    };
    Config::resolve(Some(file), &make_args(None, None))
}

#[test]
fn test_mount_is_normalized() {
    assert_eq!(resolve_mount("songs/").unwrap().mount, "/songs");
    assert_eq!(resolve_mount("/media/audio").unwrap().mount, "/media/audio");
}

#[test]
fn test_mount_cannot_be_the_site_root() {
    for mount in ["", "/", "//"] {
        let err = resolve_mount(mount).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMount { .. }), "{mount:?}: {err}");
    }
}

#[test]
fn test_mount_cannot_shadow_assets() {
    assert!(matches!(
        resolve_mount("assets"),
        Err(ConfigError::InvalidMount { .. })
    ));
    assert!(matches!(
        resolve_mount("/Assets/music"),
        Err(ConfigError::InvalidMount { .. })
    ));
}

#[test]
fn test_mount_cannot_shadow_the_folders_api() {
    for mount in ["api", "/api/folders", "api/folders/x"] {
        let err = resolve_mount(mount).unwrap_err();
        assert!(err.to_string().contains("clashes"), "{mount:?}: {err}");
    }
}

#[test]
fn test_mount_rejects_route_syntax_and_dot_segments() {
    for mount in ["{music}", "music/*", "my music", "music/../x", "a//b"] {
        assert!(resolve_mount(mount).is_err(), "{mount:?} should be rejected");
    }
}
