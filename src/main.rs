use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use afd_eval::conf::parse_conf;

#[derive(Parser, Debug)]
#[command(
    name = "afd-eval",
    about = "Evaluates candidate strings against a DFA read from a configuration file",
)]
struct Cli {
    #[arg(value_name = "CONF")]
    conf: String,

    #[arg(value_name = "STRINGS")]
    strings: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let conf_text = fs::read_to_string(&cli.conf)
        .with_context(|| format!("could not read {}", cli.conf))?;
    let dfa = parse_conf(&conf_text)?;

    let strings_text = fs::read_to_string(&cli.strings)
        .with_context(|| format!("could not read {}", cli.strings))?;

    // one candidate per line, blank lines skipped, verdicts in input order
    for cad in strings_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let verdict = if dfa.accept(cad) { "ACEPTA" } else { "NO ACEPTA" };
        println!("{}: {}", cad, verdict);
    }

    Ok(())
}
