use sitebook_core::{Database, Project, ProjectStatus, Worker};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("sitebook/data.db")
    }

    fn json_path(&self) -> PathBuf {
        self.xdg_data.join("sitebook/data.json")
    }

    fn write_config(&self, contents: &str) {
        let dir = self.xdg_config.join("sitebook");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), contents).expect("failed to write config");
    }
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("sitebook"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute sitebook: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "sitebook {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn run_json(env: &CliTestEnv, args: &[&str]) -> serde_json::Value {
    let output = run_bin(env, args);
    assert_success(args, &output);
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected JSON output: {e}\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// Seed the default SQLite store with one over-budget project and a worker on it.
fn seed_database(env: &CliTestEnv) {
    let db = Database::open(&env.db_path()).expect("failed to open db");
    db.migrate().expect("failed to migrate db");

    let project_id = db
        .insert_project(&Project {
            name: "Harbor Tower".to_string(),
            status: ProjectStatus::Active,
            budget: 1000.0,
            spent: 1200.0,
            progress_percent: 50.0,
            ..Default::default()
        })
        .expect("failed to insert project");
    let worker_id = db
        .insert_worker(&Worker {
            name: "Alice".to_string(),
            role: Some("Electrician".to_string()),
            hourly_rate: 20.0,
            ..Default::default()
        })
        .expect("failed to insert worker");
    db.assign_worker(project_id, worker_id, 45.0)
        .expect("failed to assign worker");
}

#[test]
fn json_backend_init_then_dashboard() {
    let env = CliTestEnv::new();

    let args = ["--backend", "json", "init"];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("sample project"));
    assert!(env.json_path().exists());

    let dashboard = run_json(&env, &["--backend", "json", "--format", "json", "dashboard"]);
    assert_eq!(dashboard["summary"]["totalProjects"], 1);
    assert_eq!(dashboard["summary"]["overallBudget"], 500000.0);
    assert_eq!(dashboard["alerts"]["resourceAlerts"], "No workers assigned");
    assert!(dashboard["alerts"]["budgetAlerts"].is_null());

    // A second init leaves the file alone
    let output = run_bin(&env, &args);
    assert_success(&args, &output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("already exists"));
}

#[test]
fn json_backend_without_file_reports_unavailable() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["--backend", "json", "dashboard"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("data unavailable"), "stderr was:\n{stderr}");
}

#[test]
fn config_file_selects_backend() {
    let env = CliTestEnv::new();
    env.write_config("[storage]\nbackend = \"json\"\n");

    let output = run_bin(&env, &["init"]);
    assert_success(&["init"], &output);
    assert!(env.json_path().exists());
    assert!(!env.db_path().exists());
}

#[test]
fn sqlite_queries_and_project_detail() {
    let env = CliTestEnv::new();
    seed_database(&env);

    let dashboard = run_json(&env, &["--format", "json", "dashboard"]);
    assert_eq!(dashboard["financial"]["budgetUtilization"], 120.0);
    assert_eq!(dashboard["financial"]["projectsOverBudget"], 1);
    assert_eq!(dashboard["performance"]["lowProgressProjects"], 0);

    let detail = run_json(&env, &["--format", "json", "project", "1"]);
    assert_eq!(detail["project"]["name"], "Harbor Tower");
    assert_eq!(detail["resources"]["totalWorkers"], 1);
    assert_eq!(detail["financial"]["laborCost"], 3600.0);
    assert_eq!(detail["progress"]["milestone"], "Halfway");

    let workers = run_json(&env, &["--format", "json", "workers"]);
    assert_eq!(workers["assignmentStats"][0]["utilization"], "fully_utilized");
    assert_eq!(workers["assignmentStats"][0]["monthlyCost"], 3600.0);

    let financial = run_json(&env, &["--format", "json", "financial"]);
    assert_eq!(financial["alerts"][0]["overBudget"], 200.0);

    let text = run_bin(&env, &["dashboard"]);
    assert_success(&["dashboard"], &text);
    let stdout = String::from_utf8_lossy(&text.stdout);
    assert!(stdout.contains("Portfolio Dashboard"));
    assert!(stdout.contains("1 projects over budget"));
}

#[test]
fn unknown_project_fails() {
    let env = CliTestEnv::new();
    seed_database(&env);

    let output = run_bin(&env, &["project", "99"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("project not found: 99"), "stderr was:\n{stderr}");
}

#[test]
fn worker_payments_are_recorded_and_listed() {
    let env = CliTestEnv::new();
    seed_database(&env);

    let args = [
        "pay-worker", "1", "--amount", "800", "--date", "2024-05-10", "--description", "week 19",
    ];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("$800"));

    let args = ["pay-worker", "1", "--amount", "400", "--date", "2024-05-17"];
    assert_success(&args, &run_bin(&env, &args));

    let payments = run_json(&env, &["--format", "json", "payments", "worker", "1"]);
    let payments = payments.as_array().expect("payments should be an array");
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["payment_date"], "2024-05-17");
    assert_eq!(payments[1]["description"], "week 19");

    let rejected = run_bin(&env, &["pay-worker", "1", "--amount", "-5"]);
    assert!(!rejected.status.success());

    let missing = run_bin(&env, &["pay-vendor", "3", "--amount", "10"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("vendor not found: 3"));
}

#[test]
fn runs_log_to_state_dir() {
    let env = CliTestEnv::new();
    seed_database(&env);

    let args = ["dashboard"];
    assert_success(&args, &run_bin(&env, &args));

    let log_dir = env.xdg_state.join("sitebook");
    let logs: Vec<_> = fs::read_dir(&log_dir)
        .expect("log dir should exist")
        .map(|entry| entry.expect("failed to read log dir entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "log"))
        .collect();
    assert_eq!(logs.len(), 1, "log files: {logs:?}");

    let contents = fs::read_to_string(&logs[0]).expect("failed to read log file");
    assert!(contents.contains("Logging initialized"), "log was:\n{contents}");
    assert!(contents.contains("dashboard"), "log was:\n{contents}");
}

#[test]
fn payments_require_sqlite_backend() {
    let env = CliTestEnv::new();
    assert_success(&["--backend", "json", "init"], &run_bin(&env, &["--backend", "json", "init"]));

    let output = run_bin(&env, &["--backend", "json", "pay-worker", "1", "--amount", "10"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("requires the sqlite backend"));
}
