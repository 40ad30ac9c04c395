//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEST_BANK: &str = r#"[bank]
id = "test"
name = "Test Bank"

[[questions]]
id = 1
prompt = "Residential zone limit?"
answers = ["20 km/h", "40 km/h"]
correct = 0

[[questions]]
id = 2
prompt = "Motorway limit?"
answers = ["110 km/h", "130 km/h"]
correct = 1
"#;

const TEST_CONFIG: &str = r#"
reveal_delay_ms = 0
default_bank = "bank.toml"
results_dir = "results"
"#;

fn roadquiz() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("roadquiz").unwrap()
}

/// A temp working directory with its own HOME and data dir.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("roadquiz.toml"), TEST_CONFIG).unwrap();
        std::fs::write(dir.path().join("bank.toml"), TEST_BANK).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = roadquiz();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env_remove("ROADQUIZ_DATA_DIR")
            .env_remove("ROADQUIZ_TIME_LIMIT")
            .env_remove("ROADQUIZ_THEME")
            .env_remove("COLORFGBG")
            .arg("--data-dir")
            .arg(self.path().join("data"));
        cmd
    }

    fn register(&self, username: &str) {
        self.cmd()
            .args(["register", "--username", username, "--accept-terms"])
            .args(["--password", "secret1"])
            .assert()
            .success();
    }

    fn result_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.path().join("results")) else {
            return Vec::new();
        };
        entries.map(|e| e.unwrap().path()).collect()
    }
}

#[test]
fn validate_bundled_bank() {
    roadquiz()
        .arg("validate")
        .arg("--bank")
        .arg("../../banks/speed.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Speed Limits (12 questions)"))
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn validate_nonexistent_file() {
    roadquiz()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_broken_bank_fails() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.path().join("broken.toml"),
        "[bank]\nid = \"b\"\nname = \"Broken\"\n\n[[questions]]\nid = 1\nprompt = \"?\"\nanswers = [\"A\", \"B\"]\ncorrect = 5\n",
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["validate", "--bank", "broken.toml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[#1] ERROR"))
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    roadquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created roadquiz.toml"))
        .stdout(predicate::str::contains("Created banks/speed.toml"));

    assert!(dir.path().join("roadquiz.toml").exists());

    roadquiz()
        .current_dir(dir.path())
        .args(["validate", "--bank", "banks/speed.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    roadquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    roadquiz()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn register_prompts_for_password() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["register", "--username", "driver", "--accept-terms"])
        .write_stdin("secret1\nsecret2\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("passwords do not match"));

    sandbox
        .cmd()
        .args(["register", "--username", "driver", "--accept-terms"])
        .write_stdin("secret1\nsecret1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered and logged in as driver"));
}

#[test]
fn register_requires_terms_and_unique_name() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["register", "--username", "driver", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("accept the terms"));

    sandbox.register("driver");

    sandbox
        .cmd()
        .args(["register", "--username", "Driver", "--accept-terms"])
        .args(["--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn login_logout_whoami() {
    let sandbox = Sandbox::new();
    sandbox.register("driver");

    sandbox
        .cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("[D] driver"));

    sandbox
        .cmd()
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    sandbox
        .cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));

    sandbox
        .cmd()
        .args(["login", "--username", "driver", "--password", "wrong1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid username or password"));

    sandbox
        .cmd()
        .args(["login", "--username", "DRIVER"])
        .write_stdin("secret1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as driver"));
}

#[test]
fn theme_set_show_toggle() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("theme")
        .env("ROADQUIZ_THEME", "dark")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark (system)"));

    sandbox
        .cmd()
        .args(["theme", "dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));

    sandbox
        .cmd()
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark (saved)"));

    sandbox
        .cmd()
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: light"));

    sandbox
        .cmd()
        .args(["theme", "sepia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown theme"));
}

#[test]
fn run_scripted_attempt_as_guest() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("run")
        .write_stdin("a\nn\na\nf\nr\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 2"))
        .stdout(predicate::str::contains("Question 2 of 2"))
        .stdout(predicate::str::contains("Score: 1 / 2 (50%)"))
        .stdout(predicate::str::contains("Your answer:    110 km/h"))
        .stdout(predicate::str::contains("Correct answer: 130 km/h"))
        .stderr(predicate::str::contains("Results saved to:"));

    let files = sandbox.result_files();
    assert_eq!(files.len(), 1);
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(report["outcome"]["percentage"], 50);
    assert_eq!(report["outcome"]["band"], "satisfactory");
    assert!(report["user"].is_null());

    sandbox
        .cmd()
        .arg("review")
        .arg(&files[0])
        .arg("--html")
        .arg("page.html")
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct answer: 130 km/h"));
    assert!(sandbox.path().join("page.html").exists());
}

#[test]
fn run_keeps_a_report_per_attempt() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("run")
        .write_stdin("a\nn\nb\nf\nrestart\na\nn\na\nf\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 2 / 2 (100%)"))
        .stdout(predicate::str::contains("Score: 1 / 2 (50%)"));

    let mut percentages: Vec<u64> = sandbox
        .result_files()
        .iter()
        .map(|path| {
            let report: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
            report["outcome"]["percentage"].as_u64().unwrap()
        })
        .collect();
    percentages.sort_unstable();
    assert_eq!(percentages, vec![50, 100]);
}

#[test]
fn run_rejects_early_finish() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("run")
        .write_stdin("n\nf\nq\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("answer required"))
        .stderr(predicate::str::contains("quiz incomplete: 0 of 2"));

    assert!(sandbox.result_files().is_empty());
}

#[test]
fn run_saves_history_for_logged_in_user() {
    let sandbox = Sandbox::new();
    sandbox.register("driver");

    sandbox
        .cmd()
        .args(["run", "--format", "none"])
        .write_stdin("a\nn\nb\nf\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 2 / 2 (100%)"));
    assert!(sandbox.result_files().is_empty());

    sandbox
        .cmd()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Bank"))
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("excellent"));
}

#[test]
fn history_requires_login() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("history")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn run_without_bank_fails() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.path().join("roadquiz.toml"), "reveal_delay_ms = 0\n").unwrap();

    sandbox
        .cmd()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question bank given"));
}

#[test]
fn help_output() {
    roadquiz()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timed driving-theory quiz"));
}

#[test]
fn version_output() {
    roadquiz()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("roadquiz"));
}
