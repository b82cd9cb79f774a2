//! CLI tool for inserting infoslides and normalizing song presentations.

use anyhow::{bail, Context, Result};
use clap::Parser;
use songpro_core::{
    Book, ClutterRules, Error as CoreError, GroupEditor, InteractionGateway, Normalizer, SongId,
    SongMetadata,
};
use songpro_store::Store;
use std::path::{Path, PathBuf};

mod gateway;
use gateway::{prompt_line, TerminalGateway};

/// Insert infoslides and normalize song slide documents.
#[derive(Parser, Debug)]
#[command(name = "songpro")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input library directory with song documents
    input_library: PathBuf,

    /// Output library directory
    output_library: PathBuf,

    /// Songbook (e.g. DDS)
    #[arg(long)]
    book: Book,

    /// Song number (omit to process a range)
    #[arg(long)]
    song: Option<u32>,

    /// First song number of the range
    #[arg(long, default_value = "1")]
    start: u32,

    /// Last song number (default: highest number in the input library)
    #[arg(long)]
    end: Option<u32>,

    /// Metadata store path
    #[arg(long, default_value = "songs.json")]
    store: PathBuf,

    /// Clutter rules file (built-in rules if omitted)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Infoslide template file (standard template if omitted)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    if !args.input_library.is_dir() {
        bail!("input library not found: {}", args.input_library.display());
    }
    std::fs::create_dir_all(&args.output_library).with_context(|| {
        format!(
            "failed to create output library: {}",
            args.output_library.display()
        )
    })?;

    let rules = match &args.rules {
        Some(path) => songpro_doc::load_clutter_rules(path)
            .with_context(|| format!("failed to load clutter rules: {}", path.display()))?,
        None => ClutterRules::default(),
    };
    let normalizer = Normalizer::from_rules(&rules)?;

    let template = match &args.template {
        Some(path) => songpro_doc::load_template(path)
            .with_context(|| format!("failed to load template: {}", path.display()))?,
        None => songpro_doc::builtin_template(),
    };

    let mut store = Store::open(&args.store)?;
    let gateway = TerminalGateway::new();
    let editor = GroupEditor::new(&normalizer, &template, &gateway);

    let (start, end) = song_range(args)?;
    log::info!("processing {} songs {} through {}", args.book, start, end);

    let mut processed: Vec<SongId> = Vec::new();
    let mut skipped: Vec<(SongId, String)> = Vec::new();

    for number in start..=end {
        let song = SongId::new(args.book, number);
        println!();
        match process_song(args, song, &editor, &gateway, &mut store) {
            Ok(Some(path)) => {
                println!("[*] {} updated\n    Path: {}", song, path.display());
                processed.push(song);
            }
            Ok(None) => {
                skipped.push((song, "document not found".to_string()));
            }
            Err(e) => {
                if is_batch_fatal(&e) {
                    return Err(e).with_context(|| format!("aborting batch run at {}", song));
                }
                log::warn!("{} - skipped: {:#}", song, e);
                skipped.push((song, format!("{:#}", e)));
            }
        }
    }

    print_summary(&processed, &skipped);
    Ok(())
}

/// A missing decision means no one can answer; guessing the rest of the
/// batch silently would be worse than stopping.
fn is_batch_fatal(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<CoreError>(),
        Some(CoreError::DecisionUnavailable { .. })
    )
}

fn song_range(args: &Args) -> Result<(u32, u32)> {
    if let Some(song) = args.song {
        return Ok((song, song));
    }
    if args.start < 1 {
        bail!("song numbers start at 1");
    }
    let end = match args.end {
        Some(end) => end,
        None => songpro_doc::max_song_number(&args.input_library, args.book)?.with_context(
            || format!("no {} documents found in the input library", args.book),
        )?,
    };
    if end < args.start {
        bail!("end number must not be less than start number");
    }
    Ok((args.start, end))
}

/// Process a single song. `Ok(None)` means no document matched the song.
fn process_song(
    args: &Args,
    song: SongId,
    editor: &GroupEditor,
    gateway: &TerminalGateway,
    store: &mut Store,
) -> Result<Option<PathBuf>> {
    let matches = songpro_doc::find_song_documents(&args.input_library, &song)?;
    if matches.is_empty() {
        log::warn!("{} - document not found", song);
        return Ok(None);
    }

    let path = if matches.len() > 1 {
        let options: Vec<String> = matches.iter().map(|p| p.display().to_string()).collect();
        let index = gateway.choose_candidate(&song, &options)?;
        matches[index].clone()
    } else {
        matches[0].clone()
    };

    let mut document = songpro_doc::load_document(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    if document.groups.len() != 1 {
        return Err(CoreError::StructuralAnomaly {
            song,
            reason: format!("expected one slide group, found {}", document.groups.len()),
        }
        .into());
    }

    let metadata = match store.lookup(&song) {
        Some(metadata) => metadata.clone(),
        None => {
            log::warn!("{}", CoreError::NotFound { song });
            let entered = enter_metadata(&song, &path)?;
            store.save(entered.clone())?;
            entered
        }
    };

    let font = editor.apply(&mut document.groups[0], &metadata)?;
    if let Some(font) = font {
        log::debug!("{} - font size {} ({:?})", song, font.size, font.source);
    }
    document.name = format!("{} - {}", song, metadata.title);

    let out = args.output_library.join(songpro_doc::output_filename(&metadata));
    songpro_doc::save_document(&document, &out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(Some(out))
}

/// Manual metadata entry for a song the store does not know. The entered
/// record is handed back to the store so the next run finds it.
fn enter_metadata(song: &SongId, path: &Path) -> Result<SongMetadata> {
    let default_title =
        songpro_doc::title_from_filename(path).unwrap_or_else(|| song.to_string());

    println!("{} - metadata not in store, enter manually:", song);
    let title = prompt_required(&format!("Title (default: \"{}\"):", default_title))?;
    let title = if title.is_empty() { default_title } else { title };
    let authors = prompt_required("Authors (comma-separated, blank for none):")?;
    let melody = prompt_required("Melody (blank for none):")?;

    let mut metadata = SongMetadata::new(song.book, song.number, title);
    metadata.authors = authors
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    metadata.melody = (!melody.is_empty()).then_some(melody);
    Ok(metadata)
}

fn prompt_required(text: &str) -> Result<String> {
    prompt_line(text)?.context("input stream closed during metadata entry")
}

fn print_summary(processed: &[SongId], skipped: &[(SongId, String)]) {
    println!();
    println!(
        "Done: {} songs updated, {} skipped",
        processed.len(),
        skipped.len()
    );
    for (song, reason) in skipped {
        println!("    {} - {}", song, reason);
    }
}
