//! Available/reserved icon lists: two newline-delimited text files that are
//! the only durable state the tool keeps. An icon lives in exactly one of
//! the two files; a run moves the picked name from available to reserved.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PickMode {
    /// Legacy index range: a lone entry is always picked, but with two or
    /// more entries the upper bound is `len - 1`, so the last entry is
    /// never eligible. Kept as the default on purpose.
    #[default]
    Legacy,
    /// Every entry eligible with equal probability.
    Uniform,
}

/// Picks an index into `names`, or `None` when the list is empty.
pub fn pick<R: Rng>(names: &[String], rng: &mut R, mode: PickMode) -> Option<usize> {
    if names.is_empty() {
        return None;
    }
    let stop = match mode {
        PickMode::Legacy => {
            if names.len() == 1 {
                1
            } else {
                names.len() - 1
            }
        }
        PickMode::Uniform => names.len(),
    };
    Some(rng.gen_range(0..stop))
}

pub struct IconRoster {
    available: PathBuf,
    reserved: PathBuf,
}

impl IconRoster {
    pub fn new(available: PathBuf, reserved: PathBuf) -> Self {
        Self {
            available,
            reserved,
        }
    }

    /// Reads the available list, one icon name per line. Blank lines are
    /// skipped.
    pub fn load_available(&self) -> Result<Vec<String>> {
        let data = fs::read_to_string(&self.available)?;
        Ok(data
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Moves `name` out of the available list and appends it to the
    /// reserved list.
    ///
    /// The available file is replaced through a temp file and rename, so a
    /// crash mid-run cannot leave it half written. The reserved append that
    /// follows is a second, separate write; a crash between the two still
    /// drops the name from both lists, which matches the legacy tool.
    pub fn reserve(&self, names: &[String], name: &str) -> Result<()> {
        let mut remaining = names.to_vec();
        if let Some(pos) = remaining.iter().position(|n| n == name) {
            remaining.remove(pos);
        }

        let mut body = remaining.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        let tmp = self.available.with_extension("txt.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.available)?;

        let mut reserved = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.reserved)?;
        writeln!(reserved, "{name}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_empty_list() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick(&[], &mut rng, PickMode::Legacy), None);
    }

    #[test]
    fn test_pick_single_entry_always_chosen() {
        let list = names(&["only"]);
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(pick(&list, &mut rng, PickMode::Legacy), Some(0));
        }
    }

    #[test]
    fn test_legacy_pick_excludes_last_entry() {
        let list = names(&["a", "b", "c"]);
        for seed in 0..256 {
            let mut rng = StdRng::seed_from_u64(seed);
            let index = pick(&list, &mut rng, PickMode::Legacy).unwrap();
            assert!(index < 2, "legacy mode must never pick the last entry");
        }
    }

    #[test]
    fn test_uniform_pick_covers_all_entries() {
        let list = names(&["a", "b", "c"]);
        let mut seen = [false; 3];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..256 {
            seen[pick(&list, &mut rng, PickMode::Uniform).unwrap()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_reserve_moves_name_between_files() {
        let dir = tempfile::tempdir().unwrap();
        let available = dir.path().join("available.txt");
        let reserved = dir.path().join("reserved.txt");
        fs::write(&available, "a\nb\nc\n").unwrap();

        let roster = IconRoster::new(available.clone(), reserved.clone());
        let list = roster.load_available().unwrap();
        assert_eq!(list, names(&["a", "b", "c"]));

        roster.reserve(&list, "b").unwrap();
        assert_eq!(fs::read_to_string(&available).unwrap(), "a\nc\n");
        assert_eq!(fs::read_to_string(&reserved).unwrap(), "b\n");

        // A second run appends to the reserved list.
        let list = roster.load_available().unwrap();
        roster.reserve(&list, "a").unwrap();
        assert_eq!(fs::read_to_string(&available).unwrap(), "c\n");
        assert_eq!(fs::read_to_string(&reserved).unwrap(), "b\na\n");
    }

    #[test]
    fn test_reserve_last_name_leaves_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let available = dir.path().join("available.txt");
        let reserved = dir.path().join("reserved.txt");
        fs::write(&available, "only\n").unwrap();

        let roster = IconRoster::new(available.clone(), reserved);
        let list = roster.load_available().unwrap();
        roster.reserve(&list, "only").unwrap();
        assert_eq!(fs::read_to_string(&available).unwrap(), "");
    }

    #[test]
    fn test_load_available_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let available = dir.path().join("available.txt");
        fs::write(&available, "a\n\nb\n  \nc\n").unwrap();

        let roster = IconRoster::new(available, dir.path().join("reserved.txt"));
        assert_eq!(roster.load_available().unwrap(), names(&["a", "b", "c"]));
    }
}
