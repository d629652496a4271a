use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nalgebra::DMatrix;

use cholad_core::cholesky::{ForcePdConfig, Inertia, Ldl, Llt, PivotStrategy};
use cholad_core::io::{read_dense_csv, read_triplets_csv};
use cholad_core::matrix::{
    frobenius_norm, ldl_product, llt_product, lower_factor, symmetric_values, unpack_ldl,
    DenseMatrix, Matrix, SparseMatrix,
};
use cholad_core::types::{DenseF64, SparseF64};
use cholad_core::FactorError;

#[derive(Parser)]
#[command(name = "cholad")]
#[command(version)]
#[command(about = "Cholesky, LDL and forced positive-definite LDL factorization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Factorize a symmetric matrix and report the factor
    Factor {
        /// Path to the matrix CSV file
        #[arg(short, long)]
        input: String,

        /// Input is sparse triplets with header row,col,value
        /// (default: headerless dense rows)
        #[arg(long)]
        triplets: bool,

        /// Factorization: "llt" (default), "ldl" or "force-ldl"
        #[arg(short, long, default_value = "llt")]
        method: String,

        /// Smallest pivot allowed by force-ldl
        #[arg(long, default_value = "1e-10")]
        epsilon: f64,

        /// Pivot modification for force-ldl: "clamp" (default) or "gill-murray"
        #[arg(long, default_value = "clamp")]
        strategy: String,

        /// Storage backend: "dense" or "sparse" (default: follows the input)
        #[arg(long)]
        storage: Option<String>,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the log-determinant of a symmetric positive-definite matrix
    Logdet {
        /// Path to the matrix CSV file
        #[arg(short, long)]
        input: String,

        /// Input is sparse triplets with header row,col,value
        #[arg(long)]
        triplets: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Factor {
            input,
            triplets,
            method,
            epsilon,
            strategy,
            storage,
            format,
        } => cmd_factor(
            &input,
            triplets,
            &method,
            epsilon,
            &strategy,
            storage.as_deref(),
            &format,
        ),
        Commands::Logdet { input, triplets } => cmd_logdet(&input, triplets),
    }
}

enum Input {
    Dense(DenseF64),
    Sparse(SparseF64),
}

impl Input {
    fn load(path: &str, triplets: bool) -> Result<Self> {
        let input = if triplets {
            let m = read_triplets_csv(path)
                .with_context(|| format!("Failed to load triplets from '{}'", path))?;
            eprintln!(
                "Loaded {0}x{0} sparse matrix ({1} stored entries) from '{2}'",
                m.dim(),
                m.nnz(),
                path
            );
            Input::Sparse(m)
        } else {
            let m = read_dense_csv(path)
                .with_context(|| format!("Failed to load matrix from '{}'", path))?;
            eprintln!("Loaded {0}x{0} dense matrix from '{1}'", m.dim(), path);
            Input::Dense(m)
        };
        Ok(input)
    }

    fn into_storage(self, storage: Option<&str>) -> Result<Self> {
        let converted = match (self, storage.map(str::to_lowercase).as_deref()) {
            (input, None) => input,
            (Input::Dense(m), Some("dense")) => Input::Dense(m),
            (Input::Sparse(m), Some("sparse")) => Input::Sparse(m),
            (Input::Sparse(m), Some("dense")) => {
                Input::Dense(DenseMatrix::from_dmatrix(symmetric_values(&m)))
            }
            (Input::Dense(m), Some("sparse")) => {
                let n = m.dim();
                let mut sparse = SparseMatrix::new(n);
                for i in 0..n {
                    for j in 0..=i {
                        sparse.set(i, j, *m.const_at(i, j));
                    }
                }
                Input::Sparse(sparse)
            }
            (_, Some(other)) => {
                anyhow::bail!("Unknown storage '{}'. Use 'dense' or 'sparse'.", other);
            }
        };
        Ok(converted)
    }
}

#[derive(Clone, Copy)]
enum Method {
    Llt,
    Ldl,
    ForceLdl,
}

fn parse_method(method: &str) -> Result<Method> {
    match method.to_lowercase().as_str() {
        "llt" | "cholesky" => Ok(Method::Llt),
        "ldl" => Ok(Method::Ldl),
        "force-ldl" | "force" => Ok(Method::ForceLdl),
        other => anyhow::bail!(
            "Unknown method '{}'. Use 'llt' (default), 'ldl' or 'force-ldl'.",
            other
        ),
    }
}

fn parse_strategy(strategy: &str) -> Result<PivotStrategy> {
    match strategy.to_lowercase().as_str() {
        "clamp" => Ok(PivotStrategy::Clamp),
        "gill-murray" | "gmw" => Ok(PivotStrategy::GillMurray),
        other => anyhow::bail!(
            "Unknown strategy '{}'. Use 'clamp' (default) or 'gill-murray'.",
            other
        ),
    }
}

/// Everything printed by `cholad factor`.
struct Report {
    method: &'static str,
    l: DMatrix<f64>,
    d: Option<Vec<f64>>,
    residual: f64,
    log_determinant: Option<f64>,
    inertia: Option<Inertia>,
}

/// Attach a hint for the failures force-ldl can work around.
fn factor_error(err: FactorError, what: &str) -> anyhow::Error {
    let hint = match err {
        FactorError::NotPositiveDefinite { .. } => {
            "; the matrix is not positive definite, try --method force-ldl"
        }
        FactorError::SingularPivot { .. } => {
            "; LDL hit a zero pivot that a later row divides by, try --method force-ldl"
        }
        _ => "",
    };
    anyhow::Error::new(err).context(format!("{} failed{}", what, hint))
}

fn factorize<M: Matrix<Elem = f64>>(a: M, method: Method, config: &ForcePdConfig) -> Result<Report> {
    let reference = symmetric_values(&a);

    let report = match method {
        Method::Llt => {
            let llt = Llt::new(a).map_err(|e| factor_error(e, "Cholesky factorization"))?;
            let l = lower_factor(llt.factor());
            Report {
                method: "llt",
                residual: frobenius_norm(&(&reference - llt_product(&l))),
                l,
                d: None,
                log_determinant: Some(llt.log_determinant()),
                inertia: None,
            }
        }
        Method::Ldl | Method::ForceLdl => {
            let (ldl, name) = if let Method::Ldl = method {
                let ldl = Ldl::new(a).map_err(|e| factor_error(e, "LDL factorization"))?;
                (ldl, "ldl")
            } else {
                let ldl = Ldl::force(a, config).context("Forced LDL factorization failed")?;
                (ldl, "force-ldl")
            };
            let (l, d) = unpack_ldl(ldl.factor());
            let log_determinant = ldl
                .is_positive_definite()
                .then(|| d.iter().map(|v| v.ln()).sum::<f64>());
            Report {
                method: name,
                residual: frobenius_norm(&(&reference - ldl_product(&l, &d))),
                l,
                d: Some(d),
                log_determinant,
                inertia: Some(ldl.inertia()),
            }
        }
    };
    Ok(report)
}

fn cmd_factor(
    input_path: &str,
    triplets: bool,
    method: &str,
    epsilon: f64,
    strategy: &str,
    storage: Option<&str>,
    output_format: &str,
) -> Result<()> {
    let method = parse_method(method)?;
    let config = ForcePdConfig::new(epsilon)
        .context("Invalid --epsilon")?
        .with_strategy(parse_strategy(strategy)?);

    let input = Input::load(input_path, triplets)?.into_storage(storage)?;
    let report = match input {
        Input::Dense(m) => factorize(m, method, &config)?,
        Input::Sparse(m) => factorize(m, method, &config)?,
    };
    log::info!("{}: reconstruction residual {:e}", report.method, report.residual);

    match output_format.to_lowercase().as_str() {
        "json" => print_json(&report)?,
        _ => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    let n = report.l.nrows();
    println!("Method: {}", report.method);
    println!("\nL ({0}x{0}):", n);
    for i in 0..n {
        let row: Vec<String> = (0..=i).map(|j| format!("{:>12.6}", report.l[(i, j)])).collect();
        println!("  {}", row.join(" "));
    }
    if let Some(d) = &report.d {
        let row: Vec<String> = d.iter().map(|v| format!("{:.6}", v)).collect();
        println!("\nD: [{}]", row.join(", "));
    }
    if let Some(inertia) = &report.inertia {
        println!(
            "Inertia: {} positive, {} negative, {} zero",
            inertia.positive, inertia.negative, inertia.zero
        );
    }
    println!("\nResidual ||A - L D L^T||_F: {:.3e}", report.residual);
    match report.log_determinant {
        Some(v) => println!("log|A|: {:.10}", v),
        None => println!("log|A|: undefined (factor is not positive definite)"),
    }
}

fn print_json(report: &Report) -> Result<()> {
    let mut map = serde_json::Map::new();

    map.insert("method".to_string(), serde_json::json!(report.method));
    map.insert("dim".to_string(), serde_json::json!(report.l.nrows()));

    let rows: Vec<Vec<f64>> = (0..report.l.nrows())
        .map(|i| (0..=i).map(|j| report.l[(i, j)]).collect())
        .collect();
    map.insert("l".to_string(), serde_json::json!(rows));
    map.insert("d".to_string(), serde_json::json!(report.d));
    map.insert("inertia".to_string(), serde_json::json!(report.inertia));
    map.insert("residual".to_string(), serde_json::json!(report.residual));
    map.insert(
        "log_determinant".to_string(),
        serde_json::json!(report.log_determinant),
    );

    let json_str = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;
    println!("{}", json_str);
    Ok(())
}

fn cmd_logdet(input_path: &str, triplets: bool) -> Result<()> {
    let logdet = match Input::load(input_path, triplets)? {
        Input::Dense(m) => Llt::new(m)
            .map_err(|e| factor_error(e, "Cholesky factorization"))?
            .log_determinant(),
        Input::Sparse(m) => Llt::new(m)
            .map_err(|e| factor_error(e, "Cholesky factorization"))?
            .log_determinant(),
    };
    println!("{:.10}", logdet);
    Ok(())
}
