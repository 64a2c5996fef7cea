//! Reconciliation of many CSV fragments into one master table
//!
//! The longest fragment supplies the master header. Every fragment whose
//! header matches it (under the configured [`HeaderPolicy`]) contributes the
//! rows that parse to the master's field count; everything else is dropped.

use crate::cleaner::{field_count, parse_fields};
use crate::config::HeaderPolicy;
use crate::error::FragmentError;
use crate::types::{Reconciliation, RejectedFragment};
use std::cmp::Ordering;
use tabscrape_domain::{strip_bom, CsvFragment, MasterTable};
use tracing::{debug, warn};

impl HeaderPolicy {
    /// Whether `candidate` matches the master header under this policy
    pub fn matches(&self, master: &str, candidate: &str) -> bool {
        match self {
            HeaderPolicy::Exact => master == candidate,
            HeaderPolicy::Normalized => match (normalize(master), normalize(candidate)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Header fields trimmed, case-folded and with inner whitespace collapsed
fn normalize(header: &str) -> Option<Vec<String>> {
    let fields = parse_fields(header)?;
    Some(
        fields
            .iter()
            .map(|f| {
                f.split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .collect(),
    )
}

/// Merges fragments into a [`MasterTable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentReconciler {
    policy: HeaderPolicy,
}

impl FragmentReconciler {
    /// Create a reconciler using the given header policy
    pub fn new(policy: HeaderPolicy) -> Self {
        Self { policy }
    }

    /// Header comparison in use
    pub fn policy(&self) -> HeaderPolicy {
        self.policy
    }

    /// Reconcile fragments into one table
    ///
    /// Returns `None` when no fragment has a usable header. Input order does
    /// not affect the result.
    pub fn reconcile(&self, fragments: &[CsvFragment]) -> Option<Reconciliation> {
        let mut candidates: Vec<&CsvFragment> = fragments
            .iter()
            .filter(|f| !f.header().trim().is_empty())
            .collect();

        let mut rejected = Vec::new();

        // Longest first; equal lengths fall back to the smaller text.
        candidates.sort_by(|a, b| match b.char_len().cmp(&a.char_len()) {
            Ordering::Equal => a.to_text().cmp(&b.to_text()),
            other => other,
        });

        let (master_header, expected) = loop {
            let master = candidates.first()?;
            let header = strip_bom(master.header()).to_string();
            match field_count(&header) {
                Some(count) => break (header, count),
                None => {
                    warn!("Master candidate has a malformed header: {:?}", header);
                    rejected.push(RejectedFragment {
                        header: header.clone(),
                        reason: FragmentError::MalformedHeader(header),
                    });
                    candidates.remove(0);
                }
            }
        };

        let mut table = MasterTable::new(master_header.clone(), expected);
        let mut fragments_used = 0;
        let mut rows_rejected = 0;

        for fragment in &candidates {
            let header = strip_bom(fragment.header());
            if !self.policy.matches(&master_header, header) {
                debug!("Fragment header {:?} does not match master", header);
                rejected.push(RejectedFragment {
                    header: header.to_string(),
                    reason: FragmentError::HeaderMismatch(header.to_string()),
                });
                continue;
            }

            fragments_used += 1;
            for row in fragment.rows() {
                match field_count(row) {
                    Some(found) if found == expected => table.push_row(row.as_str()),
                    found => {
                        debug!(
                            "Dropping row {:?}: {}",
                            row,
                            FragmentError::ColumnCountMismatch {
                                expected,
                                found: found.unwrap_or(0),
                            }
                        );
                        rows_rejected += 1;
                    }
                }
            }
        }

        debug!(
            "Reconciled {} fragments into {} rows ({} fragments rejected)",
            fragments_used,
            table.row_count(),
            rejected.len()
        );

        Some(Reconciliation {
            table,
            fragments_used,
            rejected,
            rows_rejected,
        })
    }

    /// Reconcile fragment texts that have not been through the cleaner
    pub fn reconcile_texts<S: AsRef<str>>(&self, texts: &[S]) -> Option<Reconciliation> {
        let fragments: Vec<CsvFragment> = texts
            .iter()
            .filter_map(|t| CsvFragment::from_text(t.as_ref()))
            .collect();
        self.reconcile(&fragments)
    }
}
