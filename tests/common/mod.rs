use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub catalog: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let catalog = make_fixture_catalog(tmp.path());

        Self {
            _tmp: tmp,
            home,
            catalog,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("treadmark");
        cmd.env("HOME", &self.home);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .arg("--catalog")
            .arg(self.catalog.to_str().expect("catalog path utf8"))
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_builtin(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn store_path(&self, key: &str) -> PathBuf {
        self.home
            .join(".local/share/treadmark/store")
            .join(format!("{}.json", key))
    }
}

fn make_fixture_catalog(base: &Path) -> PathBuf {
    let path = base.join("catalog.json");
    let catalog = serde_json::json!({
        "name": "fixture-shop",
        "products": [
            {
                "id": "1",
                "name": "Northgrip Stud 5",
                "price": 5000,
                "image": "/images/products/1.png",
                "categories": ["winter", "studded", "northgrip"],
                "size": "205/55 R16"
            },
            {
                "id": "2",
                "name": "Sunline Touring 2",
                "price": 15000,
                "image": "/images/products/2.png",
                "categories": ["summer", "touring", "sunline"],
                "size": "225/45 R17"
            },
            {
                "id": "3",
                "name": "Northgrip FourSeason",
                "price": 10000,
                "image": "/images/products/3.png",
                "categories": ["allseason", "touring", "northgrip"],
                "size": "205/55 R16"
            }
        ]
    });
    fs::write(
        &path,
        serde_json::to_string_pretty(&catalog).expect("serialize catalog"),
    )
    .expect("write fixture catalog");
    path
}
