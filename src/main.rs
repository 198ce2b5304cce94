use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::process::{Command, ExitCode, Stdio};
use tracing::Level;
use vclock_hasse::{build, parse};

const USAGE: &str = "\
Usage: drawvclocks [-v] [--order] [--format FMT] <input | ->
  Reads vector clocks from input, writing dot (graphviz) format to stdout
  Input format: One clock per line: (optional label) n1, n2, ...

  --format FMT  run dot with this output format (-T flag)
  --order       print one topological order of the clocks instead
  -v            debug logging on stderr
";

#[derive(Debug, Default)]
struct Args {
    format: Option<String>,
    order: bool,
    verbose: bool,
    input: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut out = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => out.format = Some(args.next().context("--format needs a value")?),
            "--order" => out.order = true,
            "-v" => out.verbose = true,
            s if s.starts_with('-') && s != "-" => bail!("unknown option {s}"),
            _ if out.input.is_some() => bail!("more than one input given"),
            _ => out.input = Some(arg.clone()),
        }
    }
    Ok(out)
}

fn run_dot(format: &str, dot: &str) -> Result<ExitCode> {
    let mut child = Command::new("dot")
        .arg(format!("-T{format}"))
        .stdin(Stdio::piped())
        .spawn()
        .context("starting dot")?;
    {
        let mut stdin = child.stdin.take().context("dot stdin")?;
        stdin.write_all(dot.as_bytes()).context("writing to dot")?;
    }
    let status = child.wait().context("waiting for dot")?;
    if status.success() {
        return Ok(ExitCode::SUCCESS);
    }
    eprintln!("Error from dot: {status}");
    // use dot's own exit code; 1 if it died from a signal
    Ok(status.code().and_then(|c| u8::try_from(c).ok()).map(ExitCode::from).unwrap_or(ExitCode::FAILURE))
}

fn main() -> Result<ExitCode> {
    let args = parse_args(std::env::args().skip(1))?;
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    let Some(input) = args.input.as_deref() else {
        eprint!("Error: Missing input argument\n{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let set = if input == "-" {
        parse::parse(io::stdin().lock())
    } else {
        parse::parse(File::open(input).with_context(|| format!("opening {input}"))?)
    }
    .context("parsing vector clocks")?;

    let mut graph = build(&set.clocks).context("building graph")?;
    set.apply_labels(&mut graph);

    if args.order {
        let order = match graph.topological_order() {
            Ok(order) => order,
            Err(id) => bail!("cycle through {:?}", graph.node(id).key()),
        };
        let mut out = io::stdout().lock();
        for id in order {
            writeln!(out, "{}", graph.node(id).key().replace('\n', " "))?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let dot = graph.to_dot();
    match &args.format {
        Some(format) => run_dot(format, &dot),
        None => {
            io::stdout().lock().write_all(dot.as_bytes()).context("writing output")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
