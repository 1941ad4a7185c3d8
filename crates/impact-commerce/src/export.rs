//! Certification registry export.
//!
//! Certificates are exported as CSV for the external impact registry.

use crate::wallet::Certificate;
use chrono::{DateTime, SecondsFormat};

/// Column order of the registry file.
pub const REGISTRY_HEADER: [&str; 6] = [
    "certificate_id",
    "user_id",
    "certified_at",
    "amount_eur",
    "impact_kg",
    "transaction_count",
];

/// Render certificates as registry CSV, header included.
pub fn registry_csv<'a>(certificates: impl IntoIterator<Item = &'a Certificate>) -> String {
    let mut out = String::new();
    push_row(&mut out, REGISTRY_HEADER.iter().map(|s| s.to_string()));

    for certificate in certificates {
        push_row(
            &mut out,
            [
                certificate.id.to_string(),
                certificate.user_id.to_string(),
                rfc3339(certificate.certified_at),
                format!("{:.2}", certificate.amount),
                format!("{:.3}", certificate.impact_kg),
                certificate.transaction_ids.len().to_string(),
            ],
        );
    }
    out
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push('\n');
}

/// Quote a field when it contains a separator, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn rfc3339(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CertificateId, TransactionId, UserId};

    fn certificate(user: &str) -> Certificate {
        Certificate {
            id: CertificateId::new("crt-1"),
            user_id: UserId::new(user),
            amount: 11.0,
            impact_kg: 100.0,
            transaction_ids: vec![TransactionId::new("txn-1"), TransactionId::new("txn-2")],
            certified_at: 1_710_028_800,
        }
    }

    #[test]
    fn test_registry_csv() {
        let csv = registry_csv(&[certificate("usr-1")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "certificate_id,user_id,certified_at,amount_eur,impact_kg,transaction_count"
        );
        assert_eq!(lines[1], "crt-1,usr-1,2024-03-10T00:00:00Z,11.00,100.000,2");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_fields_are_quoted() {
        let csv = registry_csv(&[certificate("Doe, \"Jay\"")]);
        assert!(csv.contains(",\"Doe, \"\"Jay\"\"\","));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let none: Vec<Certificate> = Vec::new();
        assert_eq!(registry_csv(&none).lines().count(), 1);
    }
}
