//! Parsing of `--select` specs such as `1,3-5`.

use anyhow::{Result, bail};

/// Parses a 1-based selection spec into sorted, de-duplicated zero-based indices.
///
/// Entries are single numbers or inclusive ranges separated by commas. Every
/// number must fall within `1..=total`.
pub fn parse_selection(spec: &str, total: usize) -> Result<Vec<usize>> {
    let mut selected = Vec::new();
    for part in spec.split(',').map(str::trim) {
        if part.is_empty() {
            continue;
        }
        let (start, end) = match part.split_once('-') {
            Some((lo, hi)) => (parse_position(lo, total)?, parse_position(hi, total)?),
            None => {
                let position = parse_position(part, total)?;
                (position, position)
            }
        };
        if start > end {
            bail!("Invalid selection range '{part}': start is after end");
        }
        selected.extend((start..=end).map(|position| position - 1));
    }
    if selected.is_empty() {
        bail!("Selection '{spec}' does not name any item");
    }
    selected.sort_unstable();
    selected.dedup();
    Ok(selected)
}

fn parse_position(raw: &str, total: usize) -> Result<usize> {
    let raw = raw.trim();
    let Ok(position) = raw.parse::<usize>() else {
        bail!("Invalid selection entry '{raw}': expected a number");
    };
    if position == 0 || position > total {
        bail!("Selection entry {position} is out of range (1..={total})");
    }
    Ok(position)
}

/// Picks `items` at `indices`, preserving index order.
pub fn apply_selection<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices
        .iter()
        .filter_map(|&index| items.get(index).cloned())
        .collect()
}
