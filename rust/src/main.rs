//! Command-line entry point. Prints the hash on stdout, logs to stderr, and
//! exits with a status that tells hashing failures apart from file failures.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use pwdcrypt::app::{self, AppError};
use pwdcrypt::config::{load_config, HasherConfig};
use pwdcrypt::crypto::passwords::verify_password;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(version, about = "Hash a password with bcrypt and append it to an env file")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    hash: HashArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Hash a password and append it to the env file (default)
    Hash(HashArgs),
    /// Check a password against a stored hash
    Verify {
        /// bcrypt hash to check against
        hash: String,

        /// Password to check; read from stdin when omitted. Stdin input is
        /// not hidden and is echoed on a terminal
        #[arg(env = "PWDCRYPT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Args)]
struct HashArgs {
    /// Password to hash; read from stdin when omitted. Stdin input is not
    /// hidden and is echoed on a terminal
    #[arg(env = "PWDCRYPT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// bcrypt cost (4-31)
    #[arg(long, env = "PWDCRYPT_COST")]
    cost: Option<u32>,

    /// File the hash line is appended to
    #[arg(long, env = "PWDCRYPT_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Variable name written in front of the hash
    #[arg(long, env = "PWDCRYPT_KEY")]
    key: Option<String>,

    /// JSON config file with cost, envFile and key
    #[arg(long, env = "PWDCRYPT_CONFIG")]
    config: Option<PathBuf>,

    /// Print the hash without writing any file
    #[arg(long)]
    no_store: bool,
}

impl HashArgs {
    fn resolve_config(&self) -> Result<HasherConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => HasherConfig::default(),
        };
        if let Some(cost) = self.cost {
            config.cost = cost;
        }
        if let Some(env_file) = &self.env_file {
            config.env_file = env_file.clone();
        }
        if let Some(key) = &self.key {
            config.key = key.clone();
        }
        Ok(config)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "pwdcrypt=info".into()),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .init();
}

/// Takes the password from the argument or env var, else one line of `input`.
fn read_password<R: BufRead>(
    given: Option<String>,
    mut input: R,
) -> Result<Zeroizing<String>, AppError> {
    if let Some(password) = given {
        return Ok(Zeroizing::new(password));
    }

    let mut line = Zeroizing::new(String::new());
    let read = input
        .read_line(&mut line)
        .map_err(|e| AppError::Input(format!("unable to read password from stdin: {e}")))?;
    if read == 0 {
        return Err(AppError::Input("no password given on the command line or stdin".into()));
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

fn run_hash<R: BufRead, W: Write>(
    args: HashArgs,
    input: R,
    out: &mut W,
) -> Result<i32, AppError> {
    let config = args.resolve_config()?;
    let password = read_password(args.password, input)?;

    if args.no_store {
        app::hash_only(&password, config.cost, out)?;
    } else {
        tracing::info!(cost = config.cost, env_file = %config.env_file.display(), "hashing password");
        app::hash_and_store(&password, &config, out)?;
    }
    out.flush().map_err(AppError::Output)?;
    Ok(0)
}

fn run_verify<R: BufRead, W: Write>(
    hash: &str,
    password: Option<String>,
    input: R,
    out: &mut W,
) -> Result<i32, AppError> {
    let password = read_password(password, input)?;
    let matches = verify_password(&password, hash);
    writeln!(out, "{}", if matches { "match" } else { "no-match" }).map_err(AppError::Output)?;
    Ok(if matches { 0 } else { 1 })
}

fn run(cli: Cli) -> Result<i32, AppError> {
    let stdin = io::stdin();
    let needs_prompt = stdin.is_terminal()
        && match &cli.command {
            Some(Command::Hash(args)) => args.password.is_none(),
            Some(Command::Verify { password, .. }) => password.is_none(),
            None => cli.hash.password.is_none(),
        };
    if needs_prompt {
        eprint!("Password (input is echoed): ");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Some(Command::Hash(args)) => run_hash(args, stdin.lock(), &mut out),
        Some(Command::Verify { hash, password }) => {
            run_verify(&hash, password, stdin.lock(), &mut out)
        }
        None => run_hash(cli.hash, stdin.lock(), &mut out),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            err.exit_code()
        }
    };
    process::exit(code);
}
