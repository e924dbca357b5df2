//! Binary-level tests for the CLI commands

use assert_cmd::Command;
use chrono::{Duration, Utc};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("albion-profit-analyzer").unwrap();
    cmd.env_remove("ALBION_DATA_URL")
        .env_remove("ALBION_MARKET")
        .env("RUST_LOG", "albion_profit_analyzer=warn");
    cmd
}

/// Serve the same history body for every request; returns the base URL.
fn serve_history(body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            // drain request head
            while reader.read_line(&mut line).map(|n| n > 2).unwrap_or(false) {
                line.clear();
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}")
}

#[test]
fn test_items_json() {
    let output = cli()
        .args([
            "items",
            "--names",
            "MAIN_SWORD",
            "--tiers",
            "T5",
            "--enchants",
            "0,1",
            "--format",
            "json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let ids: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ids, ["T5_MAIN_SWORD", "T5_MAIN_SWORD@1"]);
}

#[test]
fn test_items_rejects_bad_tier() {
    cli().args(["items", "--tiers", "TX"]).assert().failure();
}

#[test]
fn test_cost_human() {
    let output = cli().args(["cost", "t5_main_sword"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("T5_MAIN_SWORD"));
    assert!(stdout.contains("23445.504"));
}

#[test]
fn test_cost_respects_return_rate() {
    let output = cli()
        .args(["cost", "T5_MAIN_SWORD", "--return-rate", "0", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cost: rust_decimal::Decimal = value[0]["cost"].as_str().unwrap().parse().unwrap();
    assert_eq!(cost, rust_decimal::Decimal::from(27648));
}

#[test]
fn test_cost_price_override_file() {
    let dir = TempDir::new().unwrap();
    let prices = dir.path().join("prices.json");
    std::fs::write(&prices, r#"{"T5_BAR": 1000, "T5_LEATHER": 1000}"#).unwrap();

    let output = cli()
        .args(["cost", "T5_MAIN_SWORD", "--return-rate", "0", "--prices"])
        .arg(&prices)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("cost: 24000"));
}

#[test]
fn test_cost_rejects_malformed_id() {
    cli().args(["cost", "MAIN_SWORD@X"]).assert().failure();
}

#[test]
fn test_analyze_without_fresh_data_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.csv");

    cli()
        .args([
            "analyze",
            "--names",
            "BAG",
            "--tiers",
            "T4",
            "--enchants",
            "0",
            "--base-url",
            "http://127.0.0.1:9",
            "--max-retries",
            "0",
            "--timeout-secs",
            "2",
            "--no-wait",
            "--output",
        ])
        .arg(&report)
        .assert()
        .failure();

    assert!(!report.exists());
}

#[test]
fn test_analyze_end_to_end() {
    let ts = (Utc::now() - Duration::hours(6))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    let body = serde_json::json!([
        {"location": "Black Market", "item_id": "X", "quality": 1,
         "data": [{"item_count": 4, "avg_price": 30000, "timestamp": ts}]}
    ])
    .to_string();
    let base_url = serve_history(body);

    let dir = TempDir::new().unwrap();
    let report = dir.path().join("out").join("report.csv");

    cli()
        .args([
            "analyze",
            "--names",
            "MAIN_SWORD",
            "--tiers",
            "T5",
            "--enchants",
            "0,1",
            "--no-wait",
            "--base-url",
            base_url.as_str(),
            "--output",
        ])
        .arg(&report)
        .assert()
        .success();

    let mut reader = csv::Reader::from_path(&report).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| &r[4] == "30000" && &r[7] == "4"));
    // cheaper enchant 0 craft has the higher margin
    assert_eq!(&rows[0][0], "T5_MAIN_SWORD");
}
