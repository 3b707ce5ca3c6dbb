//! Provenance sidecars: `<result>.provenance.json` records which build, which
//! operation and which operand files produced a result file.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What ran, with which flags, on which operand files.
pub struct Payload {
    pub op: &'static str,
    pub params: Value,
    pub inputs: Vec<PathBuf>,
    pub tag: Option<String>,
}

impl Payload {
    pub fn new(op: &'static str, params: Value) -> Self {
        Self {
            op,
            params,
            inputs: Vec::new(),
            tag: None,
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<PathBuf>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

/// Operand file as it was when read. `bytes` is `None` if it vanished since.
#[derive(Serialize)]
struct InputRecord {
    path: String,
    bytes: Option<u64>,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    linalg4: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    callsite: Option<Callsite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    op: Option<&'static str>,
    tag: Option<&'a str>,
    params: Value,
    inputs: Vec<InputRecord>,
    outputs: Vec<String>,
}

impl InputRecord {
    fn stat(path: &Path) -> Self {
        Self {
            path: path.to_string_lossy().into_owned(),
            bytes: fs::metadata(path).ok().map(|m| m.len()),
        }
    }
}

/// Write the sidecar for `artifact`, creating its directory if needed.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let target = provenance_path(artifact);
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("creating provenance dir {}", dir.display()))?,
        _ => {}
    }

    let caller = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        linalg4: linalg4::VERSION,
        callsite: Some(Callsite {
            file: caller.file(),
            line: caller.line(),
        }),
        op: Some(payload.op),
        tag: payload.tag.as_deref(),
        params: payload.params,
        inputs: payload.inputs.iter().map(|p| InputRecord::stat(p)).collect(),
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };
    fs::write(&target, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", target.display()))?;
    Ok(target)
}

/// Provenance block for `report`.
pub fn summary(tag: Option<&str>) -> Result<Value> {
    let doc = Sidecar {
        code_rev: current_git_rev(),
        linalg4: linalg4::VERSION,
        callsite: None,
        op: None,
        tag,
        params: Value::Object(Default::default()),
        inputs: Vec::new(),
        outputs: Vec::new(),
    };
    Ok(serde_json::to_value(doc)?)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "result".into(), |s| s.to_string_lossy().into_owned());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then runtime), else `git rev-parse HEAD`, else `"unknown"`.
pub fn current_git_rev() -> String {
    let baked = option_env!("GIT_COMMIT").map(str::to_owned);
    let runtime = std::env::var("GIT_COMMIT").ok();
    baked
        .into_iter()
        .chain(runtime)
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_name_drops_the_result_extension() {
        let derived = provenance_path(Path::new("/tmp/out/product.json"));
        assert_eq!(derived, Path::new("/tmp/out/product.provenance.json"));
    }

    #[test]
    fn sidecar_records_op_tag_inputs_and_output() {
        let dir = tempdir().unwrap();
        let lhs = dir.path().join("a.csv");
        fs::write(&lhs, "1,2,3,4\n").unwrap();
        let missing = dir.path().join("gone.csv");
        let artifact = dir.path().join("nested").join("m.json");

        let payload = Payload::new("mul", json!({"precision": "float64"}))
            .with_inputs(vec![lhs.clone(), missing])
            .with_tag(Some("run-7".into()));
        let sidecar = write_sidecar(&artifact, payload).unwrap();
        assert!(sidecar.exists());

        let parsed: Value = serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(parsed["op"], "mul");
        assert_eq!(parsed["tag"], "run-7");
        assert_eq!(parsed["linalg4"], linalg4::VERSION);
        assert_eq!(parsed["params"]["precision"], "float64");
        assert_eq!(parsed["inputs"][0]["path"], lhs.to_string_lossy().as_ref());
        assert_eq!(parsed["inputs"][0]["bytes"], 8);
        assert!(parsed["inputs"][1]["bytes"].is_null());
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert!(parsed["callsite"]["line"].is_u64());
    }

    #[test]
    fn summary_has_no_outputs_or_callsite() {
        let block = summary(None).unwrap();
        assert!(block["tag"].is_null());
        assert!(block.get("callsite").is_none());
        assert_eq!(block["outputs"], json!([]));
    }
}
