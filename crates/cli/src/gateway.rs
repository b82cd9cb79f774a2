//! Terminal-backed interaction gateway.
//!
//! Blocks on stdin for every decision. A closed input stream surfaces as
//! `DecisionUnavailable` so a non-interactive invocation fails loudly
//! instead of guessing.

use songpro_core::{
    DecisionKind, Error, InfoslideChoice, InteractionGateway, Result, SlideChoice, SongId,
};
use std::io::{self, BufRead, Write};

/// Gateway that prompts a person at the terminal.
#[derive(Debug, Default)]
pub struct TerminalGateway;

impl TerminalGateway {
    pub fn new() -> Self {
        Self
    }
}

/// Print a prompt and read one trimmed line. `None` means the input stream
/// is closed and no further decisions can be made.
pub fn prompt_line(text: &str) -> Result<Option<String>> {
    print!("{} ", text);
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Numbered-choice prompt, re-asked until the answer is valid.
fn choose(question: &str, options: &[String]) -> Result<Option<usize>> {
    println!("{}", question);
    for (i, option) in options.iter().enumerate() {
        println!("    [{}]: {}", i + 1, option);
    }
    loop {
        let Some(answer) = prompt_line(">")? else {
            return Ok(None);
        };
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("Invalid choice, try again"),
        }
    }
}

fn unavailable(song: &SongId, kind: DecisionKind) -> Error {
    Error::DecisionUnavailable { song: *song, kind }
}

impl InteractionGateway for TerminalGateway {
    fn confirm_replace_infoslide(&self, song: &SongId) -> Result<InfoslideChoice> {
        let question = format!("{} already has an infoslide - replace it? [y/N]", song);
        let answer = prompt_line(&question)?
            .ok_or_else(|| unavailable(song, DecisionKind::ReplaceInfoslide))?;
        if answer.to_lowercase().starts_with('y') {
            Ok(InfoslideChoice::Replace)
        } else {
            Ok(InfoslideChoice::Keep)
        }
    }

    fn confirm_remove_single_line(&self, song: &SongId, line: &str) -> Result<SlideChoice> {
        println!("{} - slide has only one line:\n    \"{}\"", song, line);
        let answer = prompt_line("Remove this slide? [Y/n]")?
            .ok_or_else(|| unavailable(song, DecisionKind::RemoveSlide))?;
        if answer.to_lowercase().starts_with('n') {
            Ok(SlideChoice::Keep)
        } else {
            Ok(SlideChoice::Remove)
        }
    }

    fn choose_font_size(&self, song: &SongId, candidates: &[u32]) -> Result<u32> {
        println!("{} - slides disagree on font size", song);
        let options: Vec<String> = candidates.iter().map(u32::to_string).collect();
        let index = choose("Choose size:", &options)?
            .ok_or_else(|| unavailable(song, DecisionKind::FontSize))?;
        Ok(candidates[index])
    }

    fn choose_candidate(&self, song: &SongId, options: &[String]) -> Result<usize> {
        println!("{} - several documents match", song);
        choose("Choose document:", options)?
            .ok_or_else(|| unavailable(song, DecisionKind::CandidateChoice))
    }
}
