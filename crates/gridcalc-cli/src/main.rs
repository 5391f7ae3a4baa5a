//! gridcalc CLI - evaluate formulas and edit grid files

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gridcalc::prelude::*;
use gridcalc::{evaluate, EvaluationContext};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(author, version, about = "Integer formula grid calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single expression
    Eval {
        /// Expression to evaluate (without a leading '=')
        expr: String,

        /// Parser to use
        #[arg(short, long, value_enum, default_value = "rd")]
        parser: ParserArg,

        /// Set a variable (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, i64)>,
    },

    /// Show the evaluated grid
    Show {
        /// Grid file (csv)
        input: PathBuf,

        /// Show the formulas instead of their values
        #[arg(short, long)]
        formulas: bool,
    },

    /// Print the value of one cell
    Get {
        /// Grid file (csv)
        input: PathBuf,

        /// Cell address (e.g. B12)
        cell: CellAddress,
    },

    /// Change the content of one cell and save the grid
    Set {
        /// Grid file (csv)
        input: PathBuf,

        /// Cell address (e.g. B12)
        cell: CellAddress,

        /// New content: empty, an integer or '=' followed by a formula
        content: String,

        /// Output file (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ParserArg {
    /// Recursive descent
    Rd,
    /// Shunting-yard
    Shunting,
}

impl From<ParserArg> for ParserKind {
    fn from(arg: ParserArg) -> Self {
        match arg {
            ParserArg::Rd => ParserKind::RecursiveDescent,
            ParserArg::Shunting => ParserKind::ShuntingYard,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { expr, parser, vars } => eval_expr(&expr, parser.into(), vars),
        Commands::Show { input, formulas } => show_grid(&input, formulas),
        Commands::Get { input, cell } => get_cell(&input, cell),
        Commands::Set {
            input,
            cell,
            content,
            output,
        } => set_cell(&input, cell, &content, output.as_deref()),
    }
}

fn parse_var(s: &str) -> std::result::Result<(String, i64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn open_grid(input: &Path) -> Result<Grid> {
    Grid::open(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn eval_expr(expr: &str, parser: ParserKind, vars: Vec<(String, i64)>) -> Result<()> {
    let mut ctx = EvaluationContext::calculator();
    for (name, value) in vars {
        ctx.set_variable(name, value);
    }

    let ast = parser
        .parse(expr, &ctx)
        .with_context(|| format!("Failed to parse '{}'", expr))?;
    let value = evaluate(&ast, &ctx).with_context(|| format!("Failed to evaluate '{}'", ast))?;

    println!("{}", value);
    Ok(())
}

fn show_grid(input: &Path, formulas: bool) -> Result<()> {
    let grid = open_grid(input)?;

    if formulas {
        for addr in CellAddress::all() {
            if let Some(text) = grid.cell_text(addr) {
                println!("{}\t{}", addr, text);
            }
        }
        return Ok(());
    }

    let errors: Vec<_> = grid
        .evaluate_all()
        .into_iter()
        .filter_map(|(addr, result)| result.err().map(|e| (addr, e)))
        .collect();

    println!("{}", grid.render());

    for (addr, e) in &errors {
        eprintln!("{}: ### {}", addr, e);
    }
    Ok(())
}

fn get_cell(input: &Path, cell: CellAddress) -> Result<()> {
    let grid = open_grid(input)?;
    let value = grid
        .eval(cell)
        .with_context(|| format!("Failed to evaluate {}", cell))?;

    println!("{}", value);
    Ok(())
}

fn set_cell(input: &Path, cell: CellAddress, content: &str, output: Option<&Path>) -> Result<()> {
    let mut grid = open_grid(input)?;
    grid.set_cell(cell, content)
        .with_context(|| format!("Invalid content for {}: '{}'", cell, content))?;

    let output = output.unwrap_or(input);
    grid.save(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!("Wrote '{}'", output.display());

    println!("{} = {}", cell, grid.display_value(cell).trim());
    Ok(())
}
