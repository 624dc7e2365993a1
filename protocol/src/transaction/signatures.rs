//! Append-only signature accumulator.
//!
//! Multi-signature accounts collect signatures one party at a time. Each
//! signing round must add exactly one new signature, and that signature must
//! not already be attached. The only other mutation is wholesale replacement
//! while decoding, where the input is authoritative.

use tracing::warn;

use super::error::SigningError;
use super::types::Signature;

/// Ordered signatures of one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    signatures: Vec<Signature>,
    /// How many entries were appended by signing rather than decoded.
    appended: usize,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sequence unconditionally. Decode path only.
    pub fn replace_all(&mut self, signatures: Vec<Signature>) {
        self.signatures = signatures;
        self.appended = 0;
    }

    /// Validates a signer's answer and appends its new signature.
    ///
    /// `new_signatures` is the full list the signer returned for a request
    /// that carried `prior_count` signatures. It must be longer than
    /// `prior_count`, and none of its new entries may repeat one that is
    /// already attached. The entry at `prior_count` is appended and returned.
    /// On failure nothing changes.
    pub fn append_from_signing_result(
        &mut self,
        prior_count: usize,
        new_signatures: Vec<Signature>,
    ) -> Result<Signature, SigningError> {
        if new_signatures.len() <= prior_count {
            warn!(
                prior = prior_count,
                returned = new_signatures.len(),
                "signing result carries no additional signature"
            );
            return Err(SigningError::NoAdditionalSignature {
                prior: prior_count,
                returned: new_signatures.len(),
            });
        }

        let (previous, fresh) = new_signatures.split_at(prior_count);
        for candidate in fresh {
            let existing = previous
                .iter()
                .chain(self.signatures.iter())
                .position(|s| s == candidate);
            if let Some(position) = existing {
                // Positions past `previous` index into our own list.
                let index = if position < previous.len() {
                    position
                } else {
                    position - previous.len()
                };
                warn!(index, "signing result repeats an attached signature");
                return Err(SigningError::DuplicateSignature { index });
            }
        }

        let appended = fresh[0].clone();
        self.signatures.push(appended.clone());
        self.appended += 1;
        Ok(appended)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn as_slice(&self) -> &[Signature] {
        &self.signatures
    }

    /// Signatures added through signing since the last decode.
    pub fn appended_count(&self) -> usize {
        self.appended
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Signature> {
        self.signatures.iter()
    }
}
