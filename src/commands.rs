// tubundle/src/commands.rs

use anyhow::{
    Result,
    Context,
    anyhow
};
use std::{
    env,
    fs,
    io::{
        self,
        Read,
        Write
    },
    path::{
        Path,
        PathBuf
    }
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use crate::{
    bundle::{
        bundle_to_single_unit,
        BundleOptions
    },
    report,
    request,
    scan,
    source_file::{
        Lang,
        SourceFile
    },
    util
};


pub fn run_cli() -> Result<()> {
    run(env::args().skip(1).collect())
}

/// Dispatch one command line (program name already stripped).
pub fn run(args: Vec<String>) -> Result<()> {
    let parsed = ParsedArgs::parse(&args)?;
    init_logging(parsed.verbose);

    let cmd = parsed.positional.first().map(|s| s.as_str()).unwrap_or("help");
    let rest = parsed.positional.get(1..).unwrap_or(&[]);

    match cmd {
        "request" => prepare_request(rest, &parsed)?,
        "dir"     => bundle_dir(rest, &parsed)?,
        "files"   => bundle_files(rest, &parsed)?,
        "help" | _ => print_help(),
    }
    Ok(())
}

/// `--key=value` flags plus positionals, in the order given.
#[derive(Debug, Default)]
struct ParsedArgs {
    positional: Vec<String>,
    lang: Option<String>,
    out: Option<PathBuf>,
    report: Option<PathBuf>,
    max_depth: Option<usize>,
    verbose: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut p = ParsedArgs::default();
        for a in args {
            let s = a.trim();
            if s == "-v" || s == "--verbose" {
                p.verbose = true;
            } else if let Some(rest) = s.strip_prefix("--lang=") {
                p.lang = Some(rest.to_string());
            } else if let Some(rest) = s.strip_prefix("--out=") {
                p.out = Some(PathBuf::from(rest));
            } else if let Some(rest) = s.strip_prefix("--report=") {
                p.report = Some(PathBuf::from(rest));
            } else if let Some(rest) = s.strip_prefix("--max-depth=") {
                let n = rest.parse::<usize>()
                    .with_context(|| format!("invalid --max-depth value: {rest}"))?;
                p.max_depth = Some(n);
            } else if s.starts_with("--") {
                return Err(anyhow!("unknown flag: {s}"));
            } else {
                p.positional.push(a.clone());
            }
        }
        Ok(p)
    }

    fn options(&self) -> BundleOptions {
        let mut opts = BundleOptions::default();
        if let Some(d) = self.max_depth {
            opts.max_depth = d;
        }
        opts
    }
}

/// Logs go to stderr so stdout carries only bundle output. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Support: `tubundle request body.json` or `tubundle request -` (stdin)
fn prepare_request(rest: &[String], p: &ParsedArgs) -> Result<()> {
    let src = rest.first().map(|s| s.as_str()).unwrap_or("-");
    let body = read_input(src)?;
    let req = request::parse_request(&body)
        .with_context(|| format!("parsing run request from {src}"))?;
    let prepared = request::prepare_payload(req, &p.options());

    let json = serde_json::to_string_pretty(&prepared.payload)
        .context("serializing run payload")?;
    write_output(p.out.as_deref(), &format!("{json}\n"))?;

    if let (Some(path), Some(stats)) = (p.report.as_deref(), prepared.stats.as_ref()) {
        write_json(path, &serde_json::to_value(stats)?)?;
    }
    Ok(())
}

fn bundle_dir(rest: &[String], p: &ParsedArgs) -> Result<()> {
    let root = rest.first().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let files = scan::collect_project(&root)
        .with_context(|| format!("scanning {}", root.display()))?;
    if files.is_empty() {
        return Err(anyhow!("no C/C++ files found under {}", root.display()));
    }
    let lang = match &p.lang {
        Some(l) => parse_lang(l)?,
        None => scan::infer_lang(&files),
    };
    info!(root = %root.display(), files = files.len(), lang = %lang, "collected project");
    emit_bundle(lang, &files, p)
}

/// Support: `tubundle files cpp a.cpp b.h ...`
fn bundle_files(rest: &[String], p: &ParsedArgs) -> Result<()> {
    let (lang_arg, paths) = rest
        .split_first()
        .ok_or_else(|| anyhow!("usage: tubundle files <LANG> <FILE>..."))?;
    let lang = parse_lang(lang_arg)?;
    if paths.is_empty() {
        return Err(anyhow!("no input files given"));
    }
    let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
    let files = scan::load_files(&paths)?;
    emit_bundle(lang, &files, p)
}

fn emit_bundle(lang: Lang, files: &[SourceFile], p: &ParsedArgs) -> Result<()> {
    let bundle = bundle_to_single_unit(lang, files, &p.options());
    write_output(p.out.as_deref(), &bundle.output.content)?;
    if let Some(path) = p.report.as_deref() {
        write_json(path, &report::bundle_report(&bundle, files))?;
    }
    Ok(())
}

fn parse_lang(s: &str) -> Result<Lang> {
    Lang::from_normalized(&util::normalize_lang(s))
        .ok_or_else(|| anyhow!("unsupported language `{s}` (expected c or cpp)"))
}

fn read_input(src: &str) -> Result<String> {
    if src == "-" {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s).context("reading stdin")?;
        return Ok(s);
    }
    fs::read_to_string(src).with_context(|| format!("reading {src}"))
}

fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Bundle written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes()).context("writing stdout")?;
            stdout.flush().context("flushing stdout")?;
        }
    }
    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let mut f = fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut f, value)
        .with_context(|| format!("writing {}", path.display()))?;
    eprintln!("Report written to {}", path.display());
    Ok(())
}

fn print_help() {
    println!(
r#"
tubundle: fold a multi-file C/C++ project into one translation unit

USAGE:
    tubundle request [FILE|-]           # Read a run request (JSON), print the payload to forward
    tubundle dir [ROOT]                 # Bundle every C/C++ file under ROOT (gitignore-aware)
    tubundle files <LANG> <FILE>...     # Bundle an explicit file list (LANG: c, cpp, c++, cc, cxx)
    tubundle help                       # Show this message

FLAGS:
    --lang=c|cpp          # dir: override the inferred language
    --out=PATH            # write output to PATH instead of stdout
    --report=PATH         # write a JSON bundle report to PATH
    --max-depth=N         # include nesting ceiling (default 32)
    -v, --verbose         # debug logging on stderr (RUST_LOG overrides)

Quoted includes ("...") are inlined once per bundle; <...> includes pass through.
"#    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_and_positionals() {
        let p = ParsedArgs::parse(&args(&["dir", "proj", "--lang=c", "--max-depth=4", "-v", "--out=x.c"])).unwrap();
        assert_eq!(p.positional, vec!["dir", "proj"]);
        assert_eq!(p.lang.as_deref(), Some("c"));
        assert_eq!(p.options().max_depth, 4);
        assert_eq!(p.out, Some(PathBuf::from("x.c")));
        assert!(p.verbose);
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(ParsedArgs::parse(&args(&["dir", "--max-depth=deep"])).is_err());
        assert!(ParsedArgs::parse(&args(&["dir", "--frobnicate"])).is_err());
    }

    #[test]
    fn default_options_use_default_depth() {
        let p = ParsedArgs::parse(&args(&["files"])).unwrap();
        assert_eq!(p.options(), BundleOptions::default());
    }

    #[test]
    fn lang_parsing_accepts_aliases_only_for_c_family() {
        assert_eq!(parse_lang("C++").unwrap(), Lang::Cpp);
        assert_eq!(parse_lang("c").unwrap(), Lang::C);
        assert!(parse_lang("rust").is_err());
    }

    #[test]
    fn files_command_writes_bundle_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let h = dir.path().join("lib.h");
        let m = dir.path().join("main.c");
        fs::write(&h, "#pragma once\nint lib(void);\n").unwrap();
        fs::write(&m, "#include \"lib.h\"\nint main(void) { return lib(); }\n").unwrap();
        let out = dir.path().join("out/main.c");
        let rep = dir.path().join("report.json");

        run(vec![
            "files".into(),
            "c".into(),
            h.to_string_lossy().into_owned(),
            m.to_string_lossy().into_owned(),
            format!("--out={}", out.display()),
            format!("--report={}", rep.display()),
        ])
        .unwrap();

        let bundled = fs::read_to_string(&out).unwrap();
        assert!(bundled.contains("int lib(void);"));
        assert!(!bundled.contains("#pragma once"));
        let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&rep).unwrap()).unwrap();
        assert_eq!(report["summary"]["inlined"], 1);
    }
}
