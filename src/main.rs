use std::env;
use std::io;

use anyhow::{bail, Result};
use thompson_regex::shell::Shell;

const USAGE: &str = "usage: thompson-regex [-E <pattern>] [--dump]";

/// Command-line settings for the interactive shell.
#[derive(Debug, Default, PartialEq, Eq)]
struct Config {
    pattern: Option<String>,
    dump: bool,
}

impl Config {
    fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut config = Config::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-E" => match args.next() {
                    Some(pattern) => config.pattern = Some(pattern),
                    None => bail!("expected a pattern after '-E'\n{USAGE}"),
                },
                "--dump" => config.dump = true,
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                other => bail!("unexpected argument '{other}'\n{USAGE}"),
            }
        }
        Ok(config)
    }
}

// Usage: your_program.sh [-E <pattern>] [--dump], then one input per line
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_args(env::args().skip(1))?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(stdin.lock(), stdout.lock())
        .dump(config.dump)
        .run(config.pattern.as_deref())
}
