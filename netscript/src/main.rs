#![forbid(unsafe_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, NamedSource};
use netscript_core::{CompilationUnit, CompileError};
use netscript_graph::{format_graph, verify_graph, Graph};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NETSCRIPT_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "netscript",
    version,
    about = "Compile netscript functions into dataflow operator graphs"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compile a script and print the resulting graphs.
    Compile {
        path: PathBuf,

        /// Only print this function.
        #[arg(long)]
        function: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Run the well-formedness checker on every printed graph.
        #[arg(long, default_value_t = false)]
        verify: bool,
    },
    /// Compile and verify a script without printing anything on success
    /// beyond a summary line.
    Check { path: PathBuf },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load(path: &Path) -> miette::Result<CompilationUnit> {
    let src = fs::read_to_string(path).into_diagnostic()?;
    let source = NamedSource::new(path.display().to_string(), src.clone());

    let mut unit = CompilationUnit::new();
    unit.define(&src)
        .map_err(|e| miette::Report::new(e).with_source_code(source))?;
    Ok(unit)
}

fn select<'u>(unit: &'u CompilationUnit, function: Option<&str>) -> miette::Result<Vec<&'u Graph>> {
    match function {
        Some(name) => {
            let graph = unit.get(name).ok_or_else(|| CompileError::UndefinedFunction {
                name: name.to_string(),
                span: None,
            })?;
            Ok(vec![graph])
        }
        None => Ok(unit.graphs().collect()),
    }
}

fn main() -> miette::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Compile {
            path,
            function,
            format,
            verify,
        } => {
            let unit = load(&path)?;
            let graphs = select(&unit, function.as_deref())?;
            if verify {
                for graph in &graphs {
                    verify_graph(graph)?;
                }
            }
            match format {
                Format::Text => {
                    let text: Vec<String> = graphs.iter().map(|g| format_graph(g)).collect();
                    print!("{}", text.join("\n"));
                }
                Format::Json => {
                    let json = serde_json::to_string_pretty(&graphs).into_diagnostic()?;
                    println!("{json}");
                }
            }
            Ok(())
        }
        Cmd::Check { path } => {
            let unit = load(&path)?;
            for graph in unit.graphs() {
                verify_graph(graph)?;
                debug!(function = %graph.name, "verified");
            }
            println!("{}: {} function(s) ok", path.display(), unit.len());
            Ok(())
        }
    }
}
