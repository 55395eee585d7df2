use crate::model::{StatsEntry, StatsMap, TOTAL_KEY};
use crate::producer::parse_stats;
use crate::report::{output_json, write_report};
use anyhow::Context;
use std::fs;
use std::path::PathBuf;

/// Merge per-repository stats into one map keyed by contributor.
///
/// The `total` entry of each input is ignored and recomputed from the
/// contributor entries, so a stale or wrong upstream total can never leak into
/// the aggregate.
pub fn aggregate<'a, I>(maps: I) -> StatsMap
where
    I: IntoIterator<Item = &'a StatsMap>,
{
    let mut total = StatsEntry::default();
    let mut agg = StatsMap::new();

    for map in maps {
        for (contributor, stats) in map {
            if contributor == TOTAL_KEY {
                continue;
            }
            agg.entry(contributor.clone()).or_default().add(stats);
            total.add(stats);
        }
    }

    agg.insert(TOTAL_KEY.to_string(), total);
    agg
}

pub fn exec(files: Vec<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let mut maps = Vec::with_capacity(files.len());
    for file in &files {
        let text = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
        maps.push(parse_stats(&file.display().to_string(), &text)?);
    }

    let agg = aggregate(&maps);
    match output {
        Some(path) => write_report(&path, &agg).with_context(|| format!("Failed to write {}", path.display()))?,
        None => output_json(&agg)?,
    }
    Ok(())
}
