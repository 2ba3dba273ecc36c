use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use wizard_arena_core::rng::clamp_seed;

/// Host seeds are 64-bit and may be negative; hex input is read as raw bits.
pub fn parse_seed(seed: &str) -> Result<i64> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map(|bits| bits as i64)
            .with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<i64>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

/// Hex of the value the generator actually receives after clamping.
pub fn seed_to_hex(seed: i64) -> String {
    format!("0x{:08x}", clamp_seed(seed) as u32)
}

/// Consecutive host seeds from `start`, wrapping within the i32 range.
pub fn seed_sweep(start: i64, count: u32) -> Vec<i64> {
    let base = clamp_seed(start);
    (0..count)
        .map(|offset| i64::from(base.wrapping_add(offset as i32)))
        .collect()
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<i64>> {
    let mut seeds = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        seeds.push(parse_seed(token)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

pub fn parse_seed_file(path: &Path) -> Result<Vec<i64>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    let mut seeds = Vec::new();
    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        seeds.push(parse_seed(trimmed)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("seed file {} had no seeds", path.display()));
    }
    Ok(seeds)
}

pub fn parse_path_csv(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Every `*.json` file directly inside `dir`, sorted by name.
pub fn list_scenario_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed listing {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed listing {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_in_decimal_hex_and_negative_forms() -> Result<()> {
        assert_eq!(parse_seed("42")?, 42);
        assert_eq!(parse_seed(" -7 ")?, -7);
        assert_eq!(parse_seed("0xA57E0001")?, 0xA57E_0001);
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xZZ").is_err());
        Ok(())
    }

    #[test]
    fn hex_rendering_reflects_the_clamped_seed() {
        assert_eq!(seed_to_hex(1), "0x00000001");
        assert_eq!(seed_to_hex(i64::MAX), "0x7fffffff");
        assert_eq!(seed_to_hex(-1), "0xffffffff");
    }

    #[test]
    fn sweep_wraps_inside_the_host_range() {
        assert_eq!(seed_sweep(5, 3), vec![5, 6, 7]);
        assert_eq!(
            seed_sweep(i64::from(i32::MAX), 2),
            vec![i64::from(i32::MAX), i64::from(i32::MIN)]
        );
        assert_eq!(seed_sweep(i64::MAX, 1), vec![i64::from(i32::MAX)]);
        assert!(seed_sweep(1, 0).is_empty());
    }

    #[test]
    fn csv_skips_blanks() -> Result<()> {
        assert_eq!(parse_seed_csv("1, ,2,0x10")?, vec![1, 2, 16]);
        assert!(parse_seed_csv(" , ").is_err());
        assert_eq!(
            parse_path_csv("a.json, b.json,,"),
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        Ok(())
    }

    #[test]
    fn seed_file_ignores_comments() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("seeds.txt");
        fs::write(&path, "# smoke seeds\n7\n\n0x20\n")?;
        assert_eq!(parse_seed_file(&path)?, vec![7, 32]);
        Ok(())
    }
}
