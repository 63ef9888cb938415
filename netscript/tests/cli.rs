use std::{fs, path::PathBuf, process::Command};

fn script(name: &str, src: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("netscript-cli-tests");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, src).unwrap();
    path
}

fn netscript(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_netscript"))
        .args(args)
        .env_remove("NETSCRIPT_LOG")
        .output()
        .unwrap()
}

const SRC: &str = "\
def double(x) -> (y):
    y = x + x

def count(n) -> (i):
    i = 0
    while i < n:
        i += 1
";

#[test]
fn compile_prints_text_graphs() {
    let path = script("text.ns", SRC);
    let out = netscript(&["compile", path.to_str().unwrap(), "--verify"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("graph double(x) -> (y):"));
    assert!(stdout.contains("y = Add(x, x) {broadcast: 1}"));
    assert!(stdout.contains("cond_net:"));
}

#[test]
fn verify_accepts_names_written_in_branches() {
    let src = "\
def pick(c) -> (z):
    if c:
        y = 1
    else:
        y = 2
    z = y + 1
";
    let path = script("branches.ns", src);
    let out = netscript(&["compile", path.to_str().unwrap(), "--verify"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("z = Add(y, "));
}

#[test]
fn compile_single_function_as_json() {
    let path = script("json.ns", SRC);
    let out = netscript(&[
        "compile",
        path.to_str().unwrap(),
        "--function",
        "double",
        "--format",
        "json",
    ]);
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(json[0]["name"], "double");
    assert_eq!(json[0]["ops"][0]["op_type"], "Add");
}

#[test]
fn unknown_function_fails() {
    let path = script("missing.ns", SRC);
    let out = netscript(&["compile", path.to_str().unwrap(), "--function", "nope"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope"));
}

#[test]
fn check_reports_compile_errors() {
    let ok = script("ok.ns", SRC);
    let out = netscript(&["check", ok.to_str().unwrap()]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("2 function(s) ok"));

    let bad = script("bad.ns", "def f() -> (y):\n    y = ghost\n");
    let out = netscript(&["check", bad.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("ghost"));
}
