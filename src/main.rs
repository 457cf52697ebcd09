use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use stencil::math::{DEFAULT_PRECISION, format_fixed, parse_expression, sanitize};
use stencil::{
    Engine, StencilError, apply_override, eval_math_formatted, load_condition, load_dataset,
    load_template,
};

/// Resolve document templates against JSON data.
#[derive(Parser, Debug)]
#[command(name = "stencil", version, about)]
struct Cli {
    /// Log per-element decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a template against a dataset and print the resolved document
    Render {
        template: PathBuf,
        data: PathBuf,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
        /// Decimals in {math:...} results
        #[arg(long)]
        precision: Option<usize>,
        /// Vertical gap between loop-generated elements
        #[arg(long)]
        gap: Option<f64>,
        /// Add `date` and `time` fields for the current local time
        #[arg(long)]
        system_fields: bool,
        /// Override a dataset field (repeatable); dotted keys create nested objects
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Evaluate an arithmetic expression
    Math {
        expr: String,
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: usize,
        /// Fail on malformed input instead of printing 0
        #[arg(long)]
        strict: bool,
    },
    /// Evaluate a rule or rule group against a dataset and print true/false
    Check { condition: PathBuf, data: PathBuf },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<(), StencilError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Render {
            template,
            data,
            output,
            pretty,
            precision,
            gap,
            system_fields,
            overrides,
        } => {
            let template = load_template(&template)?;
            let mut dataset = load_dataset(&data)?;
            for assignment in &overrides {
                apply_override(&mut dataset, assignment)?;
            }
            if system_fields {
                dataset = dataset.with_system_fields(chrono::Local::now().naive_local());
            }

            let mut builder = Engine::builder();
            if let Some(precision) = precision {
                builder = builder.with_math_precision(precision);
            }
            if let Some(gap) = gap {
                builder = builder.with_stack_gap(gap);
            }
            let assembly = builder.build().assemble_with_report(&template, &dataset);
            if !assembly.warnings.is_empty() {
                eprintln!("{} warning(s) during assembly", assembly.warnings.len());
            }

            let json = if pretty {
                serde_json::to_string_pretty(&assembly.document)?
            } else {
                serde_json::to_string(&assembly.document)?
            };
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    log::info!("Wrote {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Math {
            expr,
            precision,
            strict,
        } => {
            if strict {
                let ast = parse_expression(&sanitize(&expr))?;
                println!("{}", format_fixed(stencil::math::evaluate(&ast), precision));
            } else {
                println!("{}", eval_math_formatted(&expr, precision));
            }
        }
        Command::Check { condition, data } => {
            let condition = load_condition(&condition)?;
            let dataset = load_dataset(&data)?;
            println!("{}", Engine::new().check(&condition, &dataset));
        }
    }
    Ok(())
}
