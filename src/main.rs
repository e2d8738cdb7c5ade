//! docs-uri CLI
//!
//! Usage:
//!   docs-uri [OPTIONS] [CANDIDATE]...
//!
//! Options:
//!   -t, --template <URI>       Template to match against
//!   -p, --param <NAME=TYPE>    Declare a parameter type (repeatable)
//!   -c, --config <FILE>        Template registry (TOML format)
//!   -n, --name <NAME>          Use a named template from the registry
//!   -l, --list                 List registry templates
//!   --raw                      Print raw values without type checks
//!   -v, --verbose              Debug logging
//!   -h, --help                 Print help

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use docs_uri::{ParameterType, ResourceError, ResourceTemplate, TemplateRegistry};

#[derive(Parser)]
#[command(name = "docs-uri")]
#[command(about = "Match docs:// identifiers against templates and extract parameters")]
struct Cli {
    /// Candidate identifiers (read one per line from stdin if not provided)
    candidates: Vec<String>,

    /// Template to match against, e.g. docs://guides/{section}
    #[arg(short, long, conflicts_with = "name")]
    template: Option<String>,

    /// Declared parameter type as NAME=TYPE (string, integer, float, boolean)
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, ParameterType)>,

    /// Template registry file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the named template from the registry
    #[arg(short, long, requires = "config")]
    name: Option<String>,

    /// List templates in the registry
    #[arg(short, long, requires = "config")]
    list: bool,

    /// Print raw extracted values without coercion or type checks
    #[arg(long)]
    raw: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_param(s: &str) -> Result<(String, ParameterType), String> {
    let (name, ty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TYPE, got '{}'", s))?;
    let ty = ty.parse::<ParameterType>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), ty))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // No template source and an interactive terminal: show intro help
    if cli.template.is_none() && cli.config.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load registry
    let registry = match &cli.config {
        Some(path) => match TemplateRegistry::from_file(path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error loading registry '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => TemplateRegistry::new(),
    };

    if cli.list {
        print_registry(&registry);
        return;
    }

    let template = match select_template(&cli, &registry) {
        Ok(t) => t,
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    // Read candidates
    let candidates = if cli.candidates.is_empty() {
        match read_stdin_candidates() {
            Ok(lines) => lines,
            Err(e) => {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        cli.candidates.clone()
    };
    debug!(count = candidates.len(), template = %template, "matching candidates");

    let mut failed = false;
    for candidate in &candidates {
        match match_candidate(&template, candidate, cli.raw) {
            Ok(lines) => {
                println!("{}", candidate);
                for line in lines {
                    println!("  {}", line);
                }
            }
            Err(e) => {
                warn!(candidate = %candidate, "candidate rejected");
                eprint!("{}", e.format(template.uri_template(), candidate));
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Pick the template from `--template`/`--param` or from `--name` in the registry
fn select_template(cli: &Cli, registry: &TemplateRegistry) -> Result<ResourceTemplate, String> {
    if let Some(uri) = &cli.template {
        return ResourceTemplate::new(uri.as_str(), cli.params.iter().cloned()).map_err(|e| {
            e.format(uri, "").trim_end().to_string()
        });
    }

    if let Some(name) = &cli.name {
        if !cli.params.is_empty() {
            warn!("--param is ignored for registry templates");
        }
        return registry
            .template(name)
            .cloned()
            .map_err(|e| e.to_string());
    }

    // A registry with a single template needs no --name
    match registry.definitions().collect::<Vec<_>>().as_slice() {
        [only] => Ok(only.template.clone()),
        [] => Err("no template given; use --template or --config with --name".to_string()),
        _ => Err(format!(
            "registry has several templates ({}); choose one with --name",
            registry.names().join(", ")
        )),
    }
}

/// Output lines for one candidate, sorted by parameter name
fn match_candidate(
    template: &ResourceTemplate,
    candidate: &str,
    raw: bool,
) -> Result<Vec<String>, ResourceError> {
    if raw {
        let params = template.parse_uri(candidate)?.parameters;
        return Ok(params
            .iter()
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect());
    }

    let params = template.resolve(candidate)?;
    Ok(params
        .iter()
        .map(|(name, value)| format!("{} = {} ({})", name, value, value.parameter_type()))
        .collect())
}

fn read_stdin_candidates() -> io::Result<Vec<String>> {
    let mut candidates = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            candidates.push(line.to_string());
        }
    }
    Ok(candidates)
}

fn print_registry(registry: &TemplateRegistry) {
    for def in registry.definitions() {
        println!("{}  {}", def.name, def.template);
        if let Some(description) = &def.description {
            println!("    {}", description);
        }
        for (param, ty) in def.template.parameter_types() {
            println!("    {}: {}", param, ty);
        }
    }
}

fn print_intro() {
    println!(
        r#"docs-uri - Match docs:// identifiers against templates

USAGE:
    docs-uri --template <URI> [--param NAME=TYPE]... [CANDIDATE]...
    docs-uri --config <FILE> [--name <NAME>] [CANDIDATE]...
    echo '<candidate>' | docs-uri --template <URI>

OPTIONS:
    -t, --template     Template such as docs://guides/{{section}}/{{page}}
    -p, --param        Declared parameter type (string, integer, float, boolean)
    -c, --config       Template registry (TOML file)
    -n, --name         Named template from the registry
    -l, --list         List registry templates
    --raw              Print raw values without type checks
    -v, --verbose      Debug logging (or set RUST_LOG)
    -h, --help         Print help

TEMPLATES:
    Segments are separated by '/'. A segment written as {{name}} is a
    parameter; names use letters and digits only. Empty segments are ignored.

QUICK START:
    docs-uri -t 'docs://guides/{{section}}/{{page}}' -p section=string -p page=integer \
        docs://guides/install/3"#
    );
}
