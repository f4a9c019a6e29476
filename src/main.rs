use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use pizzac::compiler::Compiler;
use pizzac::semantic::{Assignment, Instruction};
use pizzac::source::SourceId;

#[derive(ClapParser)]
#[command(name = "pizzac")]
#[command(about = "Compiler for the pizza recipe language", long_about = None)]
struct Cli {
    /// Log every compilation stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize the input file and print tokens
    Lex {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Parse the input file and print the AST
    Parse {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Compile the input file and its includes, and print the pizzas to make
    Compile {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory searched for included units
        #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,

        /// Directory searched for ingredient images
        #[arg(short, long = "assets", value_name = "DIR")]
        assets: Vec<PathBuf>,

        /// Also print the tokens and AST of the input file
        #[arg(short, long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match cli.command {
        Commands::Lex { file } => lex_file(&file)?,
        Commands::Parse { file } => parse_file(&file)?,
        Commands::Compile {
            file,
            include_dirs,
            assets,
            show,
        } => compile_file(&file, include_dirs, assets, show)?,
    }

    Ok(())
}

fn read(path: &Path) -> Result<(SourceId, String)> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read file '{}'", path.display()))?;
    Ok((SourceId::new(path), input))
}

fn lex_file(path: &Path) -> Result<()> {
    let (id, input) = read(path)?;
    let compiler = Compiler::filesystem(Vec::new(), Vec::new());

    let tokens = compiler
        .tokens(id, &input)
        .with_context(|| format!("failed to tokenize '{}'", path.display()))?;

    println!("Tokens:");
    println!("-------");
    for token in &tokens {
        println!(
            "{}:{}:{} {:?} {}",
            path.display(),
            token.pos.line,
            token.pos.column,
            token.lexeme,
            token.text
        );
    }

    println!("\nTotal tokens: {}", tokens.len());

    Ok(())
}

fn parse_file(path: &Path) -> Result<()> {
    let (id, input) = read(path)?;
    let compiler = Compiler::filesystem(Vec::new(), Vec::new());

    let ast = compiler
        .syntax_tree(id, &input)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    println!("Program AST:");
    println!("============\n");
    print!("{ast}");

    println!("\nParsing completed successfully!");

    Ok(())
}

fn compile_file(path: &Path, include_dirs: Vec<PathBuf>, assets: Vec<PathBuf>, show: bool) -> Result<()> {
    let compiler = Compiler::filesystem(include_dirs, assets);

    let (id, input) = compiler
        .read(path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;

    if show {
        let tokens = compiler
            .tokens(id.clone(), &input)
            .with_context(|| format!("failed to tokenize '{}'", path.display()))?;
        println!("Tokens:");
        for token in &tokens {
            println!("  {token}");
        }

        let ast = compiler
            .syntax_tree(id.clone(), &input)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        println!("\nProgram AST:");
        print!("{ast}");
        println!();
    }

    let ir = compiler
        .compile_source(id, &input)
        .with_context(|| format!("failed to compile '{}'", path.display()))?;

    println!("Pizzas:");
    for (index, instruction) in ir.instructions.iter().enumerate() {
        match instruction {
            Instruction::Make(make) => println!(
                "  [{}] {} from {}",
                make.pizza.output_name_or(index),
                make.pizza,
                make.declared_at
            ),
        }
    }

    println!("\nSymbols:");
    for assignment in ir.symbols.iter() {
        match assignment {
            Assignment::Ingredient(ingredient) => println!(
                "  ingredient {} '{}' drawn at {} (image {})",
                ingredient.name, ingredient.reference, ingredient.size, ingredient.intrinsic
            ),
            Assignment::Specialty(specialty) => {
                let portions: Vec<String> = specialty
                    .portions
                    .iter()
                    .map(|(name, portion)| format!("{}({})", name, portion.quantity))
                    .collect();
                println!("  specialty {} {{ {} }}", specialty.name, portions.join(", "));
            }
        }
    }

    println!("\nCompiled {} pizzas from '{}'", ir.instructions.len(), path.display());

    Ok(())
}
