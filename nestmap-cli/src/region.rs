use anyhow::{Context, Result, bail};

use nestmap_core::models::{Interval, Orientation};

///
/// Parse a region given on the command line.
///
/// Accepts `seq:start-end`, optionally followed by a strand as `(+)`, `(-)`, `:+` or `:-`.
/// Commas in the coordinates are ignored.
///
pub fn parse_region(text: &str) -> Result<Interval> {
    let (body, orientation) = split_strand(text.trim())?;

    let (seq_id, range) = body
        .rsplit_once(':')
        .with_context(|| format!("Region {} is not of the form seq:start-end", text))?;
    let (start, end) = range
        .split_once('-')
        .with_context(|| format!("Region {} has no end coordinate", text))?;

    if seq_id.is_empty() {
        bail!("Region {} has no sequence id", text);
    }
    let start: u64 = start
        .replace(',', "")
        .parse()
        .with_context(|| format!("Bad start coordinate in {}", text))?;
    let end: u64 = end
        .replace(',', "")
        .parse()
        .with_context(|| format!("Bad end coordinate in {}", text))?;

    Ok(Interval::new(seq_id, start, end, orientation)?)
}

fn split_strand(text: &str) -> Result<(&str, Orientation)> {
    if let Some(body) = text.strip_suffix(')') {
        let (body, strand) = body
            .rsplit_once('(')
            .with_context(|| format!("Unbalanced strand in {}", text))?;
        return Ok((body, strand.parse()?));
    }
    for (suffix, orientation) in [(":+", Orientation::Forward), (":-", Orientation::Reverse)] {
        if let Some(body) = text.strip_suffix(suffix) {
            return Ok((body, orientation));
        }
    }
    Ok((text, Orientation::Forward))
}
