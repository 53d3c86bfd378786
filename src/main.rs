use breeze_lang::{Datum, FunctionRegistry, find, parse};
use clap::Parser as ClapParser;
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "breeze")]
#[command(about = "Breeze - a pipeline query language for filtering, sorting, grouping, and transforming JSON")]
#[command(version)]
struct Cli {
    /// The breeze query to execute, e.g. 'filter a > 1 | sort a desc'
    query: String,

    /// JSON input (reads from stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,

    /// Only validate syntax, don't execute
    #[arg(long)]
    syntax_only: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.syntax_only {
        let registry = FunctionRegistry::new();
        parse(&cli.query, &registry)?;
        println!("Syntax is valid");
        return Ok(());
    }

    let input = match cli.input {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => {
            return Err("No input provided. Use --input or pipe JSON to stdin.".into());
        }
    };

    let datums = read_datums(&input)?;
    let results = find(&cli.query, datums)?;

    let output = serde_json::Value::Array(
        results.into_iter().map(serde_json::Value::Object).collect(),
    );
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}

/// Accepts either a JSON array of objects or one JSON object per line.
fn read_datums(input: &str) -> Result<Vec<Datum>, Box<dyn std::error::Error>> {
    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(input) {
        let mut datums = Vec::with_capacity(items.len());
        for item in items {
            match item {
                serde_json::Value::Object(map) => datums.push(map),
                other => return Err(format!("expected JSON objects, got: {}", other).into()),
            }
        }
        return Ok(datums);
    }

    let mut datums = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line)? {
            serde_json::Value::Object(map) => datums.push(map),
            other => return Err(format!("expected JSON objects, got: {}", other).into()),
        }
    }
    Ok(datums)
}
