//! Function alias ARN parsing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while interpreting an alias ARN
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    #[error("Malformed function alias ARN: {0}")]
    Malformed(String),

    #[error("Alias ARN {arn} is in region {found}, expected {expected}")]
    RegionMismatch {
        arn: String,
        expected: String,
        found: String,
    },
}

/// A qualified function ARN of the shape
/// `arn:<partition>:<service>:<region>:<account>:function:<name>:<qualifier>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasArn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub function_name: String,
    pub qualifier: String,
}

fn alias_arn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^arn:([a-z0-9-]+):([a-z0-9-]+):([a-z0-9-]+):([0-9]+):function:([a-zA-Z0-9_-]+):([a-zA-Z0-9$_-]+)$",
        )
        .expect("alias ARN pattern is valid")
    })
}

impl AliasArn {
    /// Parse an alias ARN, failing fast on anything not of the documented shape
    pub fn parse(arn: &str) -> Result<Self, ArnError> {
        let captures = alias_arn_pattern()
            .captures(arn)
            .ok_or_else(|| ArnError::Malformed(arn.to_string()))?;

        Ok(Self {
            partition: captures[1].to_string(),
            service: captures[2].to_string(),
            region: captures[3].to_string(),
            account_id: captures[4].to_string(),
            function_name: captures[5].to_string(),
            qualifier: captures[6].to_string(),
        })
    }

    /// Parse an alias ARN and require it to live in `region`
    pub fn parse_in_region(arn: &str, region: &str) -> Result<Self, ArnError> {
        let parsed = Self::parse(arn)?;
        if parsed.region != region {
            return Err(ArnError::RegionMismatch {
                arn: arn.to_string(),
                expected: region.to_string(),
                found: parsed.region,
            });
        }
        Ok(parsed)
    }
}

impl fmt::Display for AliasArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:function:{}:{}",
            self.partition,
            self.service,
            self.region,
            self.account_id,
            self.function_name,
            self.qualifier
        )
    }
}
