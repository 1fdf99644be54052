use assert_cmd::Command;
use image::{ImageBuffer, ImageFormat, Rgb};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::io::{Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn write_config(dir: &Path, config: Value) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

fn base_config(base_url: &str) -> Value {
    json!({ "chart_base_url": base_url, "request_timeout_secs": 2 })
}

/// A local address that refuses connections.
fn closed_port_url() -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{}", port)
}

fn read_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
}

/// Answers every request with the same response until the test process exits.
fn chart_server(status_line: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            read_request(&mut stream);
            let header = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                content_type,
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
        }
    });

    format!("http://{}", addr)
}

/// A white chart with a dark block in the legend strip.
fn chart_png() -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(360, 40, |x, y| {
        if x > 320 && (10..30).contains(&y) {
            Rgb([20, 20, 20])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png).unwrap();
    cursor.into_inner()
}

/// Stand-in for Tesseract: prints nothing on its first call and a price
/// legend on every later call.
#[cfg(unix)]
fn fake_tesseract(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let marker = dir.join("ocr_calls");
    let script = dir.join("fake-tesseract");
    let body = format!(
        "#!/bin/sh\nif [ -f '{}' ]; then\n  printf '$24.99\\n$39.95\\n$19.49\\n'\nelse\n  touch '{}'\nfi\n",
        marker.display(),
        marker.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_second_chart_used_when_first_has_no_prices() {
    let dir = TempDir::new().unwrap();
    let debug_dir = dir.path().join("debug");
    let output = dir.path().join("result.json");

    let mut config = base_config(&chart_server("200 OK", "image/png", chart_png()));
    config["tesseract_path"] = json!(fake_tesseract(dir.path()));
    let config = write_config(dir.path(), config);

    let assert = Command::cargo_bin("price-chart-ocr")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--asin", "B000TEST03", "--config"])
        .arg(&config)
        .arg("--debug-dir")
        .arg(&debug_dir)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1);

    let record: Value = serde_json::from_str(stdout.trim()).unwrap();
    let obj = record.as_object().unwrap();
    assert_eq!(obj.len(), 6);
    assert_eq!(obj["asin"], "B000TEST03");
    assert_eq!(obj["highest"].as_f64(), Some(39.95));
    assert_eq!(obj["lowest"].as_f64(), Some(19.49));
    assert_eq!(obj["current"].as_f64(), Some(24.99));
    assert!((obj["average"].as_f64().unwrap() - 29.72).abs() < 1e-9);
    assert!(obj["fetched_at"].as_str().unwrap().ends_with('Z'));

    assert!(debug_dir.join("B000TEST03_chart1.png").exists());
    assert!(debug_dir.join("B000TEST03_chart2.png").exists());

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(saved, record);
}

#[test]
fn test_unreachable_charts_exit_with_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), base_config(&closed_port_url()));

    Command::cargo_bin("price-chart-ocr")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--asin", "B000TEST01", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("ERRO: Request failed: "))
        .stderr(predicate::str::contains("/us/B000TEST01/amazon.png"))
        .stderr(predicate::str::contains("Unable to extract values").not());
}

#[test]
fn test_rejected_charts_exit_with_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        base_config(&chart_server("404 Not Found", "text/html", Vec::new())),
    );

    Command::cargo_bin("price-chart-ocr")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--asin", "B000TEST02", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "ERRO: Unable to extract values for ASIN B000TEST02",
        ));
}

#[test]
fn test_missing_config_file_exits_with_error() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("price-chart-ocr")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--asin", "B000TEST01", "--config"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("ERRO: Failed to read config file"));
}

#[test]
fn test_asin_is_required() {
    Command::cargo_bin("price-chart-ocr")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--asin"));
}
