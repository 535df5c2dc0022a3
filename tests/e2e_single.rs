mod support_single;

use std::fs;
use std::process::Output;

use tempfile::tempdir;

use support_single::{refused_url, run_volley, spawn_http_server_or_skip};

fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn expect_success(output: &Output) -> Result<String, String> {
    if !output.status.success() {
        return Err(describe(output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn expect_line(stdout: &str, needle: &str) -> Result<(), String> {
    if stdout.contains(needle) {
        Ok(())
    } else {
        Err(format!("missing '{}' in:\n{}", needle, stdout))
    }
}

#[test]
fn e2e_single_cli_basic() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };

    let output = run_volley(["-u", url.as_str(), "-n", "12", "-c", "3", "-t", "2"])?;
    let stdout = expect_success(&output)?;

    expect_line(&stdout, "Starting load test against")?;
    expect_line(&stdout, "LOAD TEST REPORT")?;
    expect_line(&stdout, "• Total requests:       12")?;
    expect_line(&stdout, "• HTTP 200 (OK): 12 requests (100.00%)")?;
    expect_line(&stdout, "SUCCESS RATE: 100.00% (12 out of 12 requests)")?;
    if server.hits() != 12 {
        return Err(format!("server saw {} requests", server.hits()));
    }
    Ok(())
}

#[test]
fn e2e_single_json_output() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };

    let output = run_volley([
        "-u",
        url.as_str(),
        "-n",
        "5",
        "-c",
        "2",
        "--output-format",
        "json",
    ])?;
    let stdout = expect_success(&output)?;
    let report: serde_json::Value =
        serde_json::from_str(&stdout).map_err(|err| format!("invalid json ({}): {}", err, stdout))?;

    if report.get("total_requests").and_then(serde_json::Value::as_u64) != Some(5) {
        return Err(format!("unexpected report: {}", report));
    }
    let ok_count = report
        .get("status_codes")
        .and_then(|codes| codes.get("200"))
        .and_then(serde_json::Value::as_u64);
    if ok_count != Some(5) {
        return Err(format!("unexpected status codes: {}", report));
    }
    if report.get("workers").and_then(serde_json::Value::as_u64) != Some(2) {
        return Err(format!("unexpected worker count: {}", report));
    }
    Ok(())
}

#[test]
fn e2e_single_non_success_status() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };

    let target = format!("{}/missing", url);
    let output = run_volley(["-u", target.as_str(), "-n", "3", "-c", "3"])?;
    let stdout = expect_success(&output)?;

    expect_line(&stdout, "• HTTP 404 (Not Found): 3 requests (100.00%)")?;
    expect_line(&stdout, "• Total errors:         0")?;
    expect_line(&stdout, "SUCCESS RATE: 0.00% (0 out of 3 requests)")?;
    Ok(())
}

#[test]
fn e2e_single_refused_connection_reports_errors() -> Result<(), String> {
    let url = match refused_url() {
        Ok(url) => url,
        Err(err) if err.contains("Operation not permitted") => return Ok(()),
        Err(err) => return Err(err),
    };

    let output = run_volley(["-u", url.as_str(), "-n", "4", "-c", "2", "-t", "2", "-v"])?;
    let stdout = expect_success(&output)?;

    expect_line(&stdout, "• Total errors:         4")?;
    expect_line(&stdout, "• No response: 4 requests (100.00%)")?;
    expect_line(&stdout, "ERROR DETAILS:")?;
    expect_line(&stdout, "connection failed")?;
    Ok(())
}

#[test]
fn e2e_single_invalid_target_exits_without_report() -> Result<(), String> {
    let output = run_volley(["-u", "ftp://example.com/file", "-n", "2"])?;
    if output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stdout.contains("LOAD TEST REPORT") {
        return Err(format!("unexpected report: {}", stdout));
    }
    if !stderr.contains("Error:") || !stderr.contains("ftp") {
        return Err(format!("unexpected stderr: {}", stderr));
    }
    Ok(())
}

#[test]
fn e2e_single_config_file_with_cli_override() -> Result<(), String> {
    let Some((url, server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config_path = dir.path().join("volley.toml");
    fs::write(
        &config_path,
        format!(
            "url = \"{}\"\nrequests = 6\nconcurrency = 2\ntimeout = \"2s\"\nheaders = [\"X-Run: e2e\"]\n",
            url
        ),
    )
    .map_err(|err| format!("write config failed: {}", err))?;
    let config_arg = config_path.to_string_lossy().into_owned();

    let output = run_volley(["--config", config_arg.as_str()])?;
    let stdout = expect_success(&output)?;
    expect_line(&stdout, "• Total requests:       6")?;

    let output = run_volley(["--config", config_arg.as_str(), "-n", "2"])?;
    let stdout = expect_success(&output)?;
    expect_line(&stdout, "• Total requests:       2")?;

    if server.hits() != 8 {
        return Err(format!("server saw {} requests", server.hits()));
    }
    Ok(())
}
