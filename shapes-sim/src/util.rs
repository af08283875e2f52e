use anyhow::{anyhow, Context, Result};

/// Accepts decimal or `0x`-prefixed hex.
pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let seeds = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// `count` consecutive seeds from `start`, wrapping at `u32::MAX`.
pub fn seed_range(start: u32, count: u32) -> Result<Vec<u32>> {
    if count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }
    Ok((0..count).map(|offset| start.wrapping_add(offset)).collect())
}
