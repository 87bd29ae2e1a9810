//! Match consumption policies.
//!
//! Every time a matcher completes a mapping it hands it to a
//! [`MatchDelegate`], whose return value decides whether the search stops
//! (`true`) or goes on enumerating matches (`false`).

use std::io;

use itertools::Itertools;

use crate::{mapping::PartialMapping, Match};

/// A policy invoked on every match found.
pub trait MatchDelegate {
    /// Consume a complete mapping. Return `true` to stop the search.
    fn handle_match(&mut self, mapping: &PartialMapping<'_>) -> bool;
}

impl<D: MatchDelegate + ?Sized> MatchDelegate for &mut D {
    fn handle_match(&mut self, mapping: &PartialMapping<'_>) -> bool {
        (**self).handle_match(mapping)
    }
}

/// Stop at the first match. The default policy of [`crate::Matcher::search`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StopAtFirst;

impl MatchDelegate for StopAtFirst {
    fn handle_match(&mut self, _: &PartialMapping<'_>) -> bool {
        true
    }
}

/// Record every match and keep searching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectAll {
    matches: Vec<Match>,
}

impl CollectAll {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The matches recorded so far, in the order they were found.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Number of matches recorded.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether no match was recorded.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The recorded matches.
    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }
}

impl MatchDelegate for CollectAll {
    fn handle_match(&mut self, mapping: &PartialMapping<'_>) -> bool {
        self.matches.push(mapping.pairs());
        false
    }
}

/// Write every match as a line of `pattern->host` pairs and keep searching.
///
/// The search stops on the first write error, which is kept for the caller.
#[derive(Debug)]
pub struct PrintMatches<W> {
    writer: W,
    count: usize,
    error: Option<io::Error>,
}

impl<W: io::Write> PrintMatches<W> {
    /// Print matches to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            count: 0,
            error: None,
        }
    }

    /// Number of matches printed.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The writer, or the first write error.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.writer),
        }
    }
}

impl PrintMatches<io::Stdout> {
    /// Print matches to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: io::Write> MatchDelegate for PrintMatches<W> {
    fn handle_match(&mut self, mapping: &PartialMapping<'_>) -> bool {
        let line = mapping
            .pairs()
            .iter()
            .map(|(p, h)| format!("{}->{}", p.index(), h.index()))
            .join(" ");
        match writeln!(self.writer, "{line}") {
            Ok(()) => {
                self.count += 1;
                false
            }
            Err(err) => {
                tracing::warn!(%err, "failed to print match, stopping search");
                self.error = Some(err);
                true
            }
        }
    }
}

/// A delegate calling a closure, see [`from_fn`].
#[derive(Clone, Debug)]
pub struct FnDelegate<F>(F);

/// A delegate from a closure returning whether to stop the search.
pub fn from_fn<F>(f: F) -> FnDelegate<F>
where
    F: FnMut(&PartialMapping<'_>) -> bool,
{
    FnDelegate(f)
}

impl<F> MatchDelegate for FnDelegate<F>
where
    F: FnMut(&PartialMapping<'_>) -> bool,
{
    fn handle_match(&mut self, mapping: &PartialMapping<'_>) -> bool {
        (self.0)(mapping)
    }
}
