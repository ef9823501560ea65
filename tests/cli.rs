use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PAGE: &str = "<html><head><style>body{color:red}</style></head><body><script>alert(1)</script></body></html>";

fn assetsplit(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("assetsplit").unwrap();
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn create_game(root: &Path, name: &str, html: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.html"), html).unwrap();
}

#[test]
fn missing_argument_fails() {
    let temp_dir = TempDir::new().unwrap();

    assetsplit(temp_dir.path())
        .arg("separate")
        .assert()
        .failure();
}

#[test]
fn missing_games_directory_fails() {
    let temp_dir = TempDir::new().unwrap();

    assetsplit(temp_dir.path())
        .args(["validate", "no-such-games"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Directory does not exist"));
}

#[test]
fn startup_error_follows_output_format() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("games")).unwrap();

    assetsplit(temp_dir.path())
        .args(["--config", "absent.toml", "--output-format", "json", "validate", "games"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"level\":\"error\""))
        .stdout(predicate::str::contains("Configuration file not found"));
}

#[test]
fn separate_counts_missing_document_as_failure() {
    let temp_dir = TempDir::new().unwrap();
    let games = temp_dir.path().join("games");
    create_game(&games, "pacman", PAGE);
    fs::create_dir_all(games.join("half-finished")).unwrap();

    assetsplit(temp_dir.path())
        .args(["--output-format", "plain", "separate", "games"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Failed: 1"))
        .stderr(predicate::str::contains("half-finished: index.html does not exist"));
}

#[test]
fn separate_extracts_assets_and_keeps_backup() {
    let temp_dir = TempDir::new().unwrap();
    let games = temp_dir.path().join("games");
    create_game(&games, "snake-game", PAGE);

    assetsplit(temp_dir.path())
        .args(["--output-format", "plain", "separate", "games"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Succeeded: 1"));

    let game = games.join("snake-game");
    assert_eq!(fs::read_to_string(game.join("css/style.css")).unwrap(), "body{color:red}");
    assert_eq!(fs::read_to_string(game.join("js/game.js")).unwrap(), "alert(1)");
    assert_eq!(fs::read_to_string(game.join("index.html.backup")).unwrap(), PAGE);

    let html = fs::read_to_string(game.join("index.html")).unwrap();
    assert!(html.contains("    <link rel=\"stylesheet\" href=\"css/style.css\">\n</head>"));
    assert!(html.contains("    <script src=\"js/game.js\"></script>\n</body>"));
}

#[test]
fn dry_run_reports_json_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let games = temp_dir.path().join("games");
    create_game(&games, "pacman", PAGE);

    let output = assetsplit(temp_dir.path())
        .args(["-q", "--output-format", "json", "separate", "games", "--dry-run"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["units"][0]["status"], "planned");
    assert_eq!(fs::read_to_string(games.join("pacman/index.html")).unwrap(), PAGE);
    assert!(!games.join("pacman/index.html.backup").exists());
}

#[test]
fn validate_flags_broken_reference() {
    let temp_dir = TempDir::new().unwrap();
    let games = temp_dir.path().join("games");
    let html = "<html><head>    <link rel=\"stylesheet\" href=\"css/style.css\">\n</head><body></body></html>";
    create_game(&games, "tetris", html);
    fs::write(games.join("tetris/index.html.backup"), html).unwrap();

    assetsplit(temp_dir.path())
        .args(["--output-format", "plain", "validate", "games"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Errors: 1"))
        .stderr(predicate::str::contains("css/style.css does not exist"));
}

#[test]
fn validate_after_separate_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let games = temp_dir.path().join("games");
    create_game(&games, "breakout", PAGE);
    create_game(&games, "minesweeper", PAGE);

    assetsplit(temp_dir.path())
        .args(["-q", "separate", "games"])
        .assert()
        .success();

    assetsplit(temp_dir.path())
        .args(["--output-format", "plain", "validate", "games"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ok: 2"));
}

#[test]
fn cleanup_needs_yes() {
    let temp_dir = TempDir::new().unwrap();
    let games = temp_dir.path().join("games");
    create_game(&games, "pacman", PAGE);
    let backup = games.join("pacman/index.html.backup");
    fs::write(&backup, PAGE).unwrap();

    assetsplit(temp_dir.path())
        .args(["cleanup", "games"])
        .write_stdin("no\n")
        .assert()
        .success();
    assert!(backup.exists());

    assetsplit(temp_dir.path())
        .args(["--output-format", "plain", "cleanup", "games"])
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: 1"));
    assert!(!backup.exists());
}

#[test]
fn generate_config_writes_sample() {
    let temp_dir = TempDir::new().unwrap();

    assetsplit(temp_dir.path())
        .args(["generate-config", "custom.toml"])
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join("custom.toml")).unwrap();
    assert!(content.contains("[layout]"));
    assert!(content.contains("css/style.css"));
}

#[test]
fn config_file_selects_units() {
    let temp_dir = TempDir::new().unwrap();
    let games = temp_dir.path().join("games");
    create_game(&games, "pacman", PAGE);
    create_game(&games, "checkers", PAGE);
    fs::write(
        temp_dir.path().join("assetsplit.toml"),
        "[units]\nnames = [\"checkers\"]\n",
    )
    .unwrap();

    assetsplit(temp_dir.path())
        .args(["-q", "separate", "games"])
        .assert()
        .success();

    assert!(games.join("checkers/css/style.css").exists());
    assert!(!games.join("pacman/css/style.css").exists());
}
