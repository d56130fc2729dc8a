use std::io::{self, BufRead, Write};

use kartei_core::AudioCard;
use kartei_lang_german::GermanCard;

/// What to do with a previewed card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewChoice {
    Save,
    /// Generate again, optionally with a new context
    Regenerate { context: Option<String> },
    Cancel,
}

/// User interaction used by the generate loop
pub trait Prompter {
    /// Ask for one line of input. `None` when input is closed.
    fn ask(&mut self, label: &str, default: Option<&str>) -> anyhow::Result<Option<String>>;

    fn preview(&mut self, card: &GermanCard) -> anyhow::Result<PreviewChoice>;

    fn info(&mut self, message: &str);

    fn warn(&mut self, message: &str);
}

/// Line-based prompter over any reader and writer
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, label: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
        match default {
            Some(default) => write!(self.output, "{label} [{default}]: ")?,
            None => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };

        if answer.is_empty() {
            return Ok(Some(default.unwrap_or_default().to_string()));
        }
        Ok(Some(answer))
    }

    fn preview(&mut self, card: &GermanCard) -> anyhow::Result<PreviewChoice> {
        writeln!(self.output)?;
        write!(self.output, "{}", render_preview(card))?;

        loop {
            write!(self.output, "[s]ave / [r]egenerate / [c]ancel: ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(PreviewChoice::Cancel);
            };

            match answer.to_lowercase().as_str() {
                "" | "s" | "save" => return Ok(PreviewChoice::Save),
                "c" | "cancel" | "q" => return Ok(PreviewChoice::Cancel),
                "r" | "regenerate" => {
                    let context = self
                        .ask("New context (empty keeps current)", None)?
                        .filter(|c| !c.is_empty());
                    return Ok(PreviewChoice::Regenerate { context });
                }
                other => writeln!(self.output, "Unknown choice: {other}")?,
            }
        }
    }

    fn info(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }

    fn warn(&mut self, message: &str) {
        let _ = writeln!(self.output, "warning: {message}");
    }
}

/// Human readable summary of a card
pub fn render_preview(card: &GermanCard) -> String {
    let audio = match card.audio_filename() {
        "" => "(none)",
        name => name,
    };

    let mut out = String::new();
    let rows = [
        ("Term", card.term()),
        ("Translation", card.term_translation()),
        ("Sentence", card.sentence()),
        ("Sentence translation", card.sentence_translation()),
        ("Context", card.context()),
        ("Audio", audio),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{:<22}{}\n", format!("{label}:"), value));
    }
    out
}
