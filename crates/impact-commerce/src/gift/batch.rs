//! Batch upload and generation of gift codes.

use crate::gift::GiftCode;
use crate::ids::BatchId;
use crate::ImpactError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

const MIN_CODE_LEN: usize = 6;
const MAX_CODE_LEN: usize = 32;
const GENERATED_LEN: usize = 10;

/// Characters used for generated codes. Lookalikes (`0/O`, `1/I`) are left out.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// A line of a batch that could not be turned into a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRejection {
    /// 1-based line number in the upload.
    pub line: usize,
    pub input: String,
    pub reason: String,
}

/// Result of parsing an uploaded batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpload {
    pub batch_id: BatchId,
    pub codes: Vec<GiftCode>,
    pub rejected: Vec<BatchRejection>,
}

impl BatchUpload {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Trim, upper-case and validate a gift code.
pub fn normalize_code(raw: &str) -> Result<String, ImpactError> {
    let code = raw.trim().to_uppercase();
    let invalid = |reason: &str| ImpactError::InvalidGiftCode {
        code: code.clone(),
        reason: reason.to_string(),
    };

    if code.len() < MIN_CODE_LEN || code.len() > MAX_CODE_LEN {
        return Err(invalid(&format!(
            "must be {}-{} characters",
            MIN_CODE_LEN, MAX_CODE_LEN
        )));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid("only letters, digits and '-' are allowed"));
    }
    Ok(code)
}

/// Parse an uploaded batch.
///
/// One code per line, optionally followed by `,SKU`. Lines without a SKU
/// column use `default_sku`. Blank lines and `#` comments are skipped, as is
/// a leading `code,sku` header. Bad lines and repeats within the batch are
/// reported in [`BatchUpload::rejected`].
pub fn parse_batch(
    input: &str,
    default_sku: Option<&str>,
    batch_id: BatchId,
    now: i64,
) -> BatchUpload {
    let mut codes = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();
    let mut first_row = true;

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut columns = line.splitn(2, ',').map(str::trim);
        let code_col = columns.next().unwrap_or_default();
        let sku_col = columns.next().filter(|s| !s.is_empty());

        if std::mem::take(&mut first_row) && code_col.eq_ignore_ascii_case("code") {
            debug!("skipping batch header");
            continue;
        }

        let reject = |reason: String| BatchRejection {
            line: idx + 1,
            input: line.to_string(),
            reason,
        };

        let code = match normalize_code(code_col) {
            Ok(code) => code,
            Err(e) => {
                rejected.push(reject(e.to_string()));
                continue;
            }
        };

        let Some(sku) = sku_col.or(default_sku) else {
            rejected.push(reject("missing SKU".to_string()));
            continue;
        };

        if !seen.insert(code.clone()) {
            rejected.push(reject(format!("duplicate code {} in batch", code)));
            continue;
        }

        codes.push(GiftCode::new(code, sku.trim(), now).with_batch(batch_id.clone()));
    }

    debug!(
        batch = %batch_id,
        accepted = codes.len(),
        rejected = rejected.len(),
        "parsed gift code batch"
    );

    BatchUpload {
        batch_id,
        codes,
        rejected,
    }
}

/// Generate `count` distinct random codes of the form `PREFIX-XXXXXXXXXX`.
///
/// An empty prefix yields bare ten-character codes.
pub fn generate_codes(prefix: &str, count: usize) -> Result<Vec<String>, ImpactError> {
    let prefix = prefix.trim().to_uppercase();
    if !prefix.is_empty() {
        // Validate the prefix as part of a full-length code.
        normalize_code(&format!("{}-{}", prefix, "A".repeat(GENERATED_LEN)))?;
    }

    let mut rng = rand::thread_rng();
    let mut seen = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);

    while codes.len() < count {
        let suffix: String = (0..GENERATED_LEN)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        let code = if prefix.is_empty() {
            suffix
        } else {
            format!("{}-{}", prefix, suffix)
        };
        if seen.insert(code.clone()) {
            codes.push(code);
        }
    }

    Ok(codes)
}
