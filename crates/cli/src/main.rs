use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use linalg4::rand4::{Sampler4, UniformCfg};
use linalg4::{AnyMatrix4, DType, Layout};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use io::{load_matrix, load_vector, matrix_value, vector_value, Value4};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "4x4 matrix and vector operations on CSV/JSON operands")]
struct Cmd {
    /// Optional run tag; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    /// Precision the operands are imported at
    #[arg(long, value_enum, default_value_t = Precision::F64)]
    precision: Precision,

    /// Whether matrix files and results list rows or columns
    #[arg(long, value_enum, default_value_t = Order::Row)]
    layout: Order,

    /// Result file; stdout when omitted. A provenance sidecar is written next to it.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Precision {
    F32,
    F64,
}

impl From<Precision> for DType {
    fn from(p: Precision) -> Self {
        match p {
            Precision::F32 => DType::Float32,
            Precision::F64 => DType::Float64,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Order {
    Row,
    Col,
}

impl From<Order> for Layout {
    fn from(o: Order) -> Self {
        match o {
            Order::Row => Layout::RowMajor,
            Order::Col => Layout::ColumnMajor,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Matrix-matrix product `lhs * rhs`
    Mul {
        #[arg(long)]
        lhs: PathBuf,
        #[arg(long)]
        rhs: PathBuf,
    },
    /// Matrix-vector product `matrix * vector`
    Apply {
        #[arg(long)]
        matrix: PathBuf,
        /// File or inline `x,y,z,w`
        #[arg(long)]
        vector: String,
    },
    /// Entrywise sum
    Add {
        #[arg(long)]
        lhs: PathBuf,
        #[arg(long)]
        rhs: PathBuf,
    },
    /// Entrywise difference
    Sub {
        #[arg(long)]
        lhs: PathBuf,
        #[arg(long)]
        rhs: PathBuf,
    },
    /// Scalar product `factor * matrix`
    Scale {
        #[arg(long)]
        matrix: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        factor: f64,
    },
    Transpose {
        #[arg(long)]
        matrix: PathBuf,
    },
    /// Determinant, widened to f64
    Det {
        #[arg(long)]
        matrix: PathBuf,
    },
    /// Inverse; fails on a singular matrix
    Inverse {
        #[arg(long)]
        matrix: PathBuf,
    },
    /// Uniform random matrix, reproducible from its seed
    Random {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
        low: f64,
        #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
        high: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Mul { .. } => "mul",
            Action::Apply { .. } => "apply",
            Action::Add { .. } => "add",
            Action::Sub { .. } => "sub",
            Action::Scale { .. } => "scale",
            Action::Transpose { .. } => "transpose",
            Action::Det { .. } => "det",
            Action::Inverse { .. } => "inverse",
            Action::Random { .. } => "random",
            Action::Report => "report",
        }
    }

    /// Operand files, for the provenance sidecar. Inline vectors are skipped.
    fn inputs(&self) -> Vec<PathBuf> {
        match self {
            Action::Mul { lhs, rhs } | Action::Add { lhs, rhs } | Action::Sub { lhs, rhs } => {
                vec![lhs.clone(), rhs.clone()]
            }
            Action::Apply { matrix, vector } => {
                let mut files = vec![matrix.clone()];
                if Path::new(vector).exists() {
                    files.push(PathBuf::from(vector));
                }
                files
            }
            Action::Scale { matrix, .. }
            | Action::Transpose { matrix }
            | Action::Det { matrix }
            | Action::Inverse { matrix } => vec![matrix.clone()],
            Action::Random { .. } | Action::Report => Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    op: &'static str,
    precision: String,
    layout: &'static str,
    result: Value4,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    if let Action::Report = cmd.action {
        return report(cmd.tag.as_deref());
    }
    let out = execute(&cmd)?;
    emit(&cmd, &out)
}

/// Run one operation; no I/O besides reading operands.
fn execute(cmd: &Cmd) -> Result<Output> {
    let dtype = DType::from(cmd.precision);
    let layout = Layout::from(cmd.layout);
    let op = cmd.action.name();
    tracing::info!(op, precision = %dtype, layout = ?layout, tag = ?cmd.tag, "execute");

    let load = |path: &Path| load_matrix(path, dtype, layout);
    let result = match &cmd.action {
        Action::Mul { lhs, rhs } => matrix_value(&load(lhs)?.matmul(&load(rhs)?)?, layout),
        Action::Add { lhs, rhs } => matrix_value(&load(lhs)?.add(&load(rhs)?)?, layout),
        Action::Sub { lhs, rhs } => matrix_value(&load(lhs)?.sub(&load(rhs)?)?, layout),
        Action::Apply { matrix, vector } => {
            let v = load_vector(vector, dtype)?;
            vector_value(&load(matrix)?.mul_vec(&v)?)
        }
        Action::Scale { matrix, factor } => matrix_value(&load(matrix)?.scale(*factor), layout),
        Action::Transpose { matrix } => matrix_value(&load(matrix)?.transpose(), layout),
        Action::Det { matrix } => Value4::Scalar(load(matrix)?.determinant()),
        Action::Inverse { matrix } => {
            let m = load(matrix)?;
            let inv = m
                .inverse()
                .with_context(|| format!("{} is singular", matrix.display()))?;
            matrix_value(&inv, layout)
        }
        Action::Random { seed, low, high } => {
            let mut sampler = Sampler4::new(UniformCfg { low: *low, high: *high }, *seed)?;
            let m = match dtype {
                DType::Float32 => AnyMatrix4::F32(sampler.next_matrix().0),
                _ => AnyMatrix4::F64(sampler.next_matrix().0),
            };
            matrix_value(&m, layout)
        }
        Action::Report => anyhow::bail!("report produces no result"),
    };
    tracing::debug!(op, "done");

    Ok(Output {
        op,
        precision: dtype.to_string(),
        layout: match layout {
            Layout::RowMajor => "row",
            Layout::ColumnMajor => "col",
        },
        result,
    })
}

fn emit(cmd: &Cmd, out: &Output) -> Result<()> {
    let body = serde_json::to_vec_pretty(out)?;
    let Some(path) = &cmd.out else {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, &body).with_context(|| format!("writing {}", path.display()))?;

    let payload = provenance::Payload::new(out.op, params(cmd))
        .with_inputs(cmd.action.inputs())
        .with_tag(cmd.tag.clone());
    let sidecar = provenance::write_sidecar(path, payload)?;
    tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

fn params(cmd: &Cmd) -> serde_json::Value {
    let base = json!({
        "precision": DType::from(cmd.precision).name(),
        "layout": format!("{:?}", Layout::from(cmd.layout)),
    });
    let inputs = match &cmd.action {
        Action::Mul { lhs, rhs } | Action::Add { lhs, rhs } | Action::Sub { lhs, rhs } => {
            json!({"lhs": lhs, "rhs": rhs})
        }
        Action::Apply { matrix, vector } => json!({"matrix": matrix, "vector": vector}),
        Action::Scale { matrix, factor } => json!({"matrix": matrix, "factor": factor}),
        Action::Transpose { matrix } | Action::Det { matrix } | Action::Inverse { matrix } => {
            json!({"matrix": matrix})
        }
        Action::Random { seed, low, high } => json!({"seed": seed, "low": low, "high": high}),
        Action::Report => json!({}),
    };
    json!({"common": base, "inputs": inputs})
}

fn report(tag: Option<&str>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&provenance::summary(tag)?)?);
    Ok(())
}
