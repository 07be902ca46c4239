use anyhow::{anyhow, Result};

/// RFC 3339 timestamp in the configured timezone.
pub fn local_timestamp(tz: &str) -> Result<String> {
    let tz: chrono_tz::Tz = tz.parse().map_err(|_| anyhow!("invalid tz: {tz}"))?;
    Ok(chrono::Utc::now().with_timezone(&tz).to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_timezone() {
        assert!(local_timestamp("UTC").unwrap().ends_with("+00:00"));
        assert!(local_timestamp("Asia/Kolkata").unwrap().ends_with("+05:30"));
        assert!(local_timestamp("Nowhere/City").is_err());
    }
}
