use crate::{Analysis, BounceMessage, BounceReason, BounceType, analyze};
use clap::Parser;
use log::LevelFilter;
use mail_parser::MimeHeaders;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Classifies the bounce stored in `filename`.
///
/// With `raw`, the file is taken as an already decoded body without headers.
pub fn classify_file(filename: &Path, raw: bool) -> Result<Analysis, Box<dyn Error>> {
    let mail_buffer = fs::read(filename)?;
    if raw {
        let no_headers: HashMap<String, Vec<String>> = HashMap::new();
        return Ok(analyze(&no_headers, &mail_buffer));
    }
    let msg = BounceMessage::parse(&mail_buffer).ok_or("parse error")?;
    Ok(msg.analyze())
}

fn cmd_classify(filename: &Path, raw: bool) -> Result<(), Box<dyn Error>> {
    let analysis = classify_file(filename, raw)?;
    println!("{analysis}");
    Ok(())
}

fn cmd_codes(filter: Option<BounceType>) {
    for reason in BounceReason::ALL {
        if filter.is_some_and(|t| t != reason.bounce_type()) {
            continue;
        }
        println!(
            "{:<6} {:<5} {:<8} {}",
            reason.as_str(),
            reason.bounce_type(),
            if reason.is_specific() { "enhanced" } else { "basic" },
            reason.description()
        );
    }
}

fn cmd_lookup(code: &str) -> Result<(), Box<dyn Error>> {
    let reason: BounceReason = code.parse()?;
    println!("{reason}");
    println!("type: {}", reason.bounce_type());
    println!("specific: {}", reason.is_specific());
    Ok(())
}

fn cmd_dump(dump_args: &DumpArgs) -> Result<(), Box<dyn Error>> {
    let (dump_header, dump_body) = match (dump_args.header, dump_args.body) {
        (false, false) => (true, true),
        (dump_header, dump_body) => (dump_header, dump_body),
    };
    let mail_buffer = fs::read(&dump_args.filename)?;
    let msg = BounceMessage::parse(&mail_buffer).ok_or("parse error")?;
    if dump_header && let Some(part) = msg.get_message().parts.first() {
        for h in &part.headers {
            println!("{}: {:?}", h.name, &h.value);
        }
    }
    if dump_body {
        // numbered as in the debug log of the reason finder
        println!("==================================== text");
        for (i, line) in msg.get_text().split('\n').enumerate() {
            println!("{:>5} {}", i + 1, line.trim_end());
        }
    }
    if dump_args.dump_html {
        for part in &msg.get_message().parts {
            if part.is_content_type("text", "html")
                && let Some(text) = part.text_contents()
            {
                println!("==================================== text/html");
                println!("{}", html2md::rewrite_html(text, false));
            }
        }
    }
    Ok(())
}

#[derive(clap::Parser)]
#[command(version, about = "Classify email bounce notifications")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct DumpArgs {
    filename: PathBuf,
    #[arg(short = 'H', long)]
    header: bool,
    #[arg(short, long)]
    body: bool,
    #[arg(long = "html")]
    dump_html: bool,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Classify a bounce message
    Classify {
        filename: PathBuf,
        /// The file is a plain text body without headers
        #[arg(long)]
        raw: bool,
    },
    /// List the known status codes
    Codes {
        #[arg(long, conflicts_with = "hard")]
        soft: bool,
        #[arg(long)]
        hard: bool,
    },
    /// Show a single status code
    Lookup { code: String },
    /// Show the headers and the text the classifier sees
    Dump(DumpArgs),
}

/// Level forced on top of `RUST_LOG`, `None` keeps what `RUST_LOG` says.
fn log_level(verbose: bool, rust_log_set: bool) -> Option<LevelFilter> {
    match (verbose, rust_log_set) {
        (true, _) => Some(LevelFilter::Debug),
        (false, false) => Some(LevelFilter::Warn),
        (false, true) => None,
    }
}

pub fn xmain() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = log_level(cli.verbose, std::env::var_os("RUST_LOG").is_some()) {
        builder.filter_level(level);
    }
    builder.init();

    match cli.command {
        Command::Classify { filename, raw } => cmd_classify(&filename, raw),
        Command::Codes { soft, hard } => {
            let filter = match (soft, hard) {
                (true, _) => Some(BounceType::Soft),
                (_, true) => Some(BounceType::Hard),
                _ => None,
            };
            cmd_codes(filter);
            Ok(())
        }
        Command::Lookup { code } => cmd_lookup(&code),
        Command::Dump(dump_args) => cmd_dump(&dump_args),
    }
}

#[test]
fn test_log_level() {
    assert_eq!(log_level(true, false), Some(LevelFilter::Debug));
    assert_eq!(log_level(true, true), Some(LevelFilter::Debug));
    assert_eq!(log_level(false, false), Some(LevelFilter::Warn));
    assert_eq!(log_level(false, true), None);
}
