use anyhow::{Context, Result};
use brainfuck_llvm::config::{CompileOptions, DEFAULT_CELL_SIZE, DEFAULT_STORAGE_SIZE};
use brainfuck_llvm::driver::{Driver, DEFAULT_MODULE_NAME};
use brainfuck_llvm::lexer::tokenize;
use clap::{Args, Parser as ClapParser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(ClapParser)]
#[command(name = "brainfuck-llvm")]
#[command(about = "Brainfuck compiler targeting LLVM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the significant symbols of the input
    Lex {
        /// Input file path (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Parse the input and print the AST
    Parse {
        /// Input file path (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Compile the input to LLVM IR
    Compile {
        /// Input file path (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output file path (defaults to stdout)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Print IR to stdout even when writing to file
        #[arg(short, long)]
        print: bool,

        #[command(flatten)]
        options: OptionArgs,
    },
    /// Compile the input and run it through the JIT
    Run {
        /// Input file path (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Optimization level (0-3)
    #[arg(
        short = 'O',
        long = "optimize",
        value_name = "LEVEL",
        default_value = "0",
        value_parser = clap::value_parser!(u8).range(0..=3)
    )]
    opt_level: u8,

    /// Cell width in bits (8, 16, 32 or 64)
    #[arg(long, value_name = "BITS", default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Number of cells on the tape
    #[arg(long, value_name = "CELLS", default_value_t = DEFAULT_STORAGE_SIZE)]
    storage_size: usize,
}

impl From<&OptionArgs> for CompileOptions {
    fn from(args: &OptionArgs) -> Self {
        CompileOptions::default()
            .with_cell_size(args.cell_size)
            .with_storage_size(args.storage_size)
            .with_opt_level(args.opt_level)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lex { file } => lex_file(file.as_deref())?,
        Commands::Parse { file } => parse_file(file.as_deref())?,
        Commands::Compile {
            file,
            output,
            print,
            options,
        } => compile_file(file.as_deref(), output.as_deref(), print, &options)?,
        Commands::Run { file, options } => run_file(file.as_deref(), &options)?,
    }

    Ok(())
}

fn display_name(path: Option<&Path>) -> String {
    path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

fn module_name(path: Option<&Path>) -> &str {
    path.and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_MODULE_NAME)
}

/// Read source bytes. Invalid UTF-8 only ever occurs in commentary, so it is
/// replaced and then discarded by the filter.
fn read_source(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read file '{}'", path.display()))?
        }
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("failed to read standard input")?;
            input
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn lex_file(path: Option<&Path>) -> Result<()> {
    let input = read_source(path)?;
    let name = display_name(path);

    let mut total = 0;
    for token in tokenize(&input) {
        println!(
            "{}:{}:{} {:?} {}",
            name, token.pos.line, token.pos.column, token.symbol, token.symbol
        );
        total += 1;
    }

    println!("\nTotal symbols: {total}");

    Ok(())
}

fn parse_file(path: Option<&Path>) -> Result<()> {
    let input = read_source(path)?;
    let name = display_name(path);

    let program = Driver::default()
        .parse(&input)
        .with_context(|| format!("failed to parse '{name}'"))?;

    println!("{program}");
    println!();
    println!("Top-level commands: {}", program.commands.len());
    println!("Loops: {}", program.loop_count());
    println!("Max nesting depth: {}", program.max_depth());

    Ok(())
}

fn compile_file(path: Option<&Path>, output: Option<&Path>, print: bool, options: &OptionArgs) -> Result<()> {
    let input = read_source(path)?;
    let name = display_name(path);
    let driver = Driver::new(options.into());

    if let Some(output_path) = output {
        driver
            .emit_to_file(&input, module_name(path), output_path)
            .with_context(|| format!("failed to compile '{name}' to '{}'", output_path.display()))?;
        if print {
            let ir = fs::read_to_string(output_path)
                .with_context(|| format!("failed to read back '{}'", output_path.display()))?;
            print!("{ir}");
        } else {
            println!("LLVM IR written to: {}", output_path.display());
        }
    } else {
        let stdout = io::stdout();
        driver
            .emit(&input, module_name(path), &mut stdout.lock())
            .with_context(|| format!("failed to compile '{name}'"))?;
    }

    Ok(())
}

fn run_file(path: Option<&Path>, options: &OptionArgs) -> Result<()> {
    let input = read_source(path)?;
    let name = display_name(path);
    let driver = Driver::new(options.into());

    // SAFETY: running the program is what the user asked for; keeping the
    // data pointer on the tape is the program's own responsibility.
    unsafe { driver.execute(&input) }.with_context(|| format!("failed to run '{name}'"))?;

    Ok(())
}
