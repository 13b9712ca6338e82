use std::path::Path;
use std::process;

use tracing::info;
use unicode_width::UnicodeWidthStr;

use kiri_core::lattice::DumpAnalyzer;
use kiri_core::segmenter::{Mode, Segmenter, SegmenterOptions};
use kiri_core::token::{TokenAttributes, TokenType};

use super::config_ops::load_settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub struct TokenizeOptions<'a> {
    pub config: Option<&'a str>,
    pub mode: Option<Mode>,
    pub keep_punctuation: bool,
    pub json: bool,
}

/// Segment every sentence of a lattice dump file.
pub fn tokenize(dump_file: &str, opts: &TokenizeOptions) {
    let settings = die!(load_settings(opts.config), "Error loading settings: {}");
    let mut options = SegmenterOptions::from(&settings);
    if let Some(mode) = opts.mode {
        options.mode = mode;
    }
    if opts.keep_punctuation {
        options.discard_punctuation = false;
    }

    let analyzer = die!(
        DumpAnalyzer::open(Path::new(dump_file)),
        "Error opening lattice dump: {}"
    );
    let sentences = analyzer.sentences().to_vec();
    info!(sentences = sentences.len(), mode = %options.mode, "segmenting lattice dump");
    let mut segmenter = Segmenter::new(analyzer, options);

    for sentence in &sentences {
        let queue = die!(segmenter.segment(sentence), "Error segmenting {sentence:?}: {}");
        if opts.json {
            for token in queue.into_stream() {
                println!("{}", die!(serde_json::to_string(&token), "Error: {}"));
            }
        } else {
            println!("# {sentence} (mode={})", options.mode);
            for token in queue.into_stream() {
                println!("{}", format_token(&token));
            }
        }
    }
}

/// Pad `s` with spaces to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w < width {
        format!("{s}{}", " ".repeat(width - w))
    } else {
        s.to_string()
    }
}

pub fn format_token(t: &TokenAttributes) -> String {
    let marker = if t.position_increment == 0 { "^" } else { " " };
    let kind = match t.token_type {
        TokenType::Known => "",
        TokenType::Unknown => " unk",
    };
    format!(
        "{marker}{} [{},{}) +{}/{}{}  {} {} {}",
        pad(&t.term, 16),
        t.start_offset,
        t.end_offset,
        t.position_increment,
        t.position_length,
        kind,
        pad(&t.word.part_of_speech, 24),
        pad(&t.word.reading, 12),
        t.word.base_form,
    )
}
