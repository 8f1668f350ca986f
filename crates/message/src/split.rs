//! Long-message splitting.
//!
//! Text is cut into lines on the separator and lines are packed greedily
//! into chunks. Every chunk is wrapped in the configured `prepend` and
//! `append`, and all lengths are counted in characters, not bytes.

use {
    courier_config::{LineMode, SplitDefaults},
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    options::SplitOptions,
};

/// Fully resolved split settings for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub max_length: usize,
    pub separator: String,
    pub prepend: String,
    pub append: String,
    pub line_mode: LineMode,
}

impl SplitPlan {
    /// Fill the knobs a send left unset from the configured defaults.
    #[must_use]
    pub fn resolve(options: &SplitOptions, defaults: &SplitDefaults) -> Self {
        Self {
            max_length: options.max_length.unwrap_or(defaults.max_length),
            separator: options
                .separator
                .clone()
                .unwrap_or_else(|| defaults.separator.clone()),
            prepend: options.prepend.clone().unwrap_or_default(),
            append: options.append.clone().unwrap_or_default(),
            line_mode: options.line_mode.unwrap_or(defaults.line_mode),
        }
    }

    fn frame_len(&self) -> usize {
        char_len(&self.prepend) + char_len(&self.append)
    }
}

/// Split `text` into chunks of at most `plan.max_length` characters.
pub fn split_message(text: &str, plan: &SplitPlan) -> Result<Vec<String>> {
    split_with_lead(text, "", plan)
}

/// Like [`split_message`], with `lead` placed in front of the first chunk
/// (outside its prepend) and counted against that chunk's limit.
pub(crate) fn split_with_lead(text: &str, lead: &str, plan: &SplitPlan) -> Result<Vec<String>> {
    let lines: Vec<&str> = if plan.separator.is_empty() {
        vec![text]
    } else {
        text.split(plan.separator.as_str()).collect()
    };
    let separator_len = char_len(&plan.separator);

    let mut chunks = Chunks::new(plan, lead);
    for line in lines {
        let line_len = char_len(line);
        if chunks.started {
            if chunks.fits(separator_len + line_len) {
                chunks.body.push_str(&plan.separator);
                chunks.push_line(line, separator_len + line_len);
                continue;
            }
            chunks.flush();
        }

        if chunks.fits(line_len) {
            chunks.push_line(line, line_len);
            continue;
        }

        match plan.line_mode {
            LineMode::Whole => {
                return Err(Error::MessageTooLong {
                    length: line_len,
                    max_length: plan.max_length,
                });
            },
            LineMode::Break => chunks.break_line(line, line_len)?,
        }
    }
    chunks.flush();

    debug!(
        chunks = chunks.done.len(),
        max_length = plan.max_length,
        "split message"
    );
    Ok(chunks.done)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the first `n` characters of `s`.
fn char_boundary(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

struct Chunks<'a> {
    plan: &'a SplitPlan,
    lead: &'a str,
    done: Vec<String>,
    body: String,
    body_len: usize,
    /// Whether the open chunk holds at least one line (possibly empty).
    started: bool,
}

impl<'a> Chunks<'a> {
    fn new(plan: &'a SplitPlan, lead: &'a str) -> Self {
        Self {
            plan,
            lead,
            done: Vec::new(),
            body: String::new(),
            body_len: 0,
            started: false,
        }
    }

    /// Characters the open chunk spends outside its body.
    fn overhead(&self) -> usize {
        let lead = if self.done.is_empty() {
            char_len(self.lead)
        } else {
            0
        };
        lead + self.plan.frame_len()
    }

    fn fits(&self, extra: usize) -> bool {
        self.overhead() + self.body_len + extra <= self.plan.max_length
    }

    fn push_line(&mut self, line: &str, len: usize) {
        self.body.push_str(line);
        self.body_len += len;
        self.started = true;
    }

    /// Hard-break an oversized line into the open (empty) chunk and as many
    /// fresh chunks as it needs.
    fn break_line(&mut self, line: &str, line_len: usize) -> Result<()> {
        let mut rest = line;
        let mut rest_len = line_len;
        loop {
            let room = self.plan.max_length.saturating_sub(self.overhead());
            if room == 0 {
                return Err(Error::MessageTooLong {
                    length: line_len,
                    max_length: self.plan.max_length,
                });
            }
            if rest_len <= room {
                self.push_line(rest, rest_len);
                return Ok(());
            }
            let cut = char_boundary(rest, room);
            self.push_line(&rest[..cut], room);
            self.flush();
            rest = &rest[cut..];
            rest_len -= room;
        }
    }

    fn flush(&mut self) {
        if !self.started && !self.done.is_empty() {
            return;
        }
        let lead = if self.done.is_empty() { self.lead } else { "" };
        let body = std::mem::take(&mut self.body);
        self.done.push(format!(
            "{lead}{}{body}{}",
            self.plan.prepend, self.plan.append
        ));
        self.body_len = 0;
        self.started = false;
    }
}
