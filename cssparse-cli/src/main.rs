use anyhow::{Context, Result};
use clap::Parser;
use cssparse::{CssKeyArray, CssKeyType, CssString};
use path_clean::PathClean;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// A single source file to parse.
    #[clap(short, long = "file", value_parser)]
    file: Option<PathBuf>,

    /// A directory whose entries are each parsed in turn.
    #[clap(short, long = "dir", value_parser)]
    dir: Option<String>,

    /// Look up a class selector by name after parsing.
    #[clap(long = "class")]
    class: Option<String>,

    /// Look up an id selector by name after parsing.
    #[clap(long = "id")]
    id: Option<String>,

    /// Raise the log level (-v for info, -vv for debug). Overrides `RUST_LOG`.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Some(dir_path) = &args.dir {
        let dir = std::fs::read_dir(dir_path).with_context(|| format!("reading directory {}", dir_path))?;
        for entry in dir {
            let entry = entry?;
            let file_path = entry.path().clean();
            describe(&file_path, args.class.as_deref(), args.id.as_deref())?;
        }
    } else if let Some(file_path) = &args.file {
        describe(file_path, args.class.as_deref(), args.id.as_deref())?;
    } else {
        println!("No file or directory specified.");
    }

    Ok(())
}

fn describe(file_path: &Path, class: Option<&str>, id: Option<&str>) -> Result<()> {
    log::info!("parsing {}", file_path.display());
    let data = std::fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;

    let buffer = CssString::new_from_bytes(&data).with_context(|| format!("{}: input too large", file_path.display()))?;
    let table = CssKeyArray::parse(&buffer).with_context(|| format!("{}: parse failed", file_path.display()))?;
    log::info!("parsed {} entries from {}", table.used(), file_path.display());

    println!("---- {} ----", file_path.display());
    println!("{}", table.print());

    println!("entries:");
    for i in 0..table.size() {
        let node = table.node_at(i).expect("index in range");
        println!(
            "  [{:4}] type={:?} offset={:<7} length={:<3} flags={:<24} link={}",
            i,
            node.ty(),
            node.offset(),
            node.length(),
            cssparse::flags_to_text(node.flags()),
            node.link().map(|l| l.to_string()).unwrap_or_else(|| "-".to_string()),
        );
    }

    if let Some(name) = class {
        let hits = table.query_class(CssKeyType::Class, name);
        println!("class '.{}' matches: {:?}", name, hits);
    }
    if let Some(name) = id {
        let hits = table.query_class(CssKeyType::Id, name);
        println!("id '#{}' matches: {:?}", name, hits);
    }

    Ok(())
}
