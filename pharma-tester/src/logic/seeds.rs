use anyhow::{Context, Result, bail, ensure};
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_LEN: u64 = 10_000;

/// Resolve a list of CLI seed arguments into concrete seeds.
///
/// Supports decimal integers (negative values use their magnitude), `0x`
/// hex literals, and half-open ranges such as `100..110`. Duplicates are
/// dropped keeping first-seen order; an empty list falls back to 1337.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        for seed in parse_token(token)? {
            if seen.insert(seed) {
                seeds.push(seed);
            }
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_token(token: &str) -> Result<Vec<u64>> {
    if let Some((start, end)) = token.split_once("..") {
        let start = parse_seed(start)?;
        let end = parse_seed(end)?;
        ensure!(start < end, "empty seed range: {token}");
        ensure!(
            end - start <= MAX_RANGE_LEN,
            "seed range {token} exceeds {MAX_RANGE_LEN} seeds"
        );
        return Ok((start..end).collect());
    }
    Ok(vec![parse_seed(token)?])
}

fn parse_seed(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if let Some(hex) = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).with_context(|| format!("bad hex seed: {raw}"));
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    bail!("Unrecognized seed token: {raw}")
}
