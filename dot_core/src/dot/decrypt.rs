//! Trial decryption of an [`Envelope`] against the keys a [`Keyring`] can offer.

use super::{
    envelope::Envelope,
    error::{DecryptError, TamperReason},
    inheritance::DisclosedLabel,
    sealed::SealedDot,
    Dot,
};
use crate::{
    abe::{OpenError, PrivateKey},
    context::{guarded, Cancellation},
    keyring::Keyring,
    partition::{global_partition, namespace_partition, PartitionLabel},
};
use std::ops::ControlFlow;
use tracing::{debug, instrument, trace, warn};

/// Where the search currently draws its candidates from. Stages run in this order and
/// never interleave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum SearchStage {
    TryingBulkKeys,
    TryingPartitionKeys,
    TryingContentKeys,
}

/// Decrypt `envelope` with whatever `keyring` holds for its destination.
///
/// Candidates come from the bulk partition keys, then the partition-label enumeration
/// (narrowed by the namespace hints), then the content-key enumeration. The first key
/// that opens the envelope wins and enumeration stops there.
///
/// Every keyring call is raced against `cancel`.
#[instrument(skip_all, fields(dst = %envelope.dst()))]
pub async fn decrypt_dot<K: Keyring, C: Cancellation>(
    envelope: &Envelope,
    cancel: &C,
    keyring: &K,
) -> Result<Dot, DecryptError<K>> {
    let dst = envelope.dst();
    let mut search = Search::new(envelope);

    search.enter(SearchStage::TryingBulkKeys);
    let bulk = guarded(cancel, keyring.oaque_partition_keys_for(&dst))
        .await
        .ok_or(DecryptError::Cancelled)?
        .map_err(DecryptError::Keyring)?;
    for key in bulk.iter() {
        if search.try_key(key).is_break() {
            break;
        }
    }
    if let Some(outcome) = search.take_outcome() {
        return finish(envelope, outcome);
    }

    search.enter(SearchStage::TryingPartitionKeys);
    let hints = keyring.namespace_hints();
    let queries: Vec<PartitionLabel> = if hints.is_empty() {
        vec![global_partition()]
    } else {
        hints.iter().map(|ns| namespace_partition(ns)).collect()
    };
    for query in queries.iter() {
        let mut visit = |key: &PrivateKey| search.try_key(key);
        guarded(
            cancel,
            keyring.oaque_keys_for_partition_label(&dst, query, &mut visit),
        )
        .await
        .ok_or(DecryptError::Cancelled)?
        .map_err(DecryptError::Keyring)?;

        if let Some(outcome) = search.take_outcome() {
            return finish(envelope, outcome);
        }
    }

    search.enter(SearchStage::TryingContentKeys);
    let query = search
        .partial
        .as_ref()
        .map(DisclosedLabel::partition_label)
        .unwrap_or_else(global_partition);
    let mut visit = |key: &PrivateKey| search.try_key(key);
    guarded(
        cancel,
        keyring.oaque_keys_for_content(&dst, &query, &mut visit),
    )
    .await
    .ok_or(DecryptError::Cancelled)?
    .map_err(DecryptError::Keyring)?;

    if let Some(outcome) = search.take_outcome() {
        return finish(envelope, outcome);
    }

    debug!(tried = search.tried, "no usable key");
    Err(DecryptError::NoUsableKey)
}

type Outcome = Result<(SealedDot, Option<DisclosedLabel>), TamperReason>;

enum Attempt {
    Opened(SealedDot, Option<DisclosedLabel>),
    Partial(DisclosedLabel),
    Tampered(TamperReason),
    Miss,
}

struct Search<'a> {
    envelope: &'a Envelope,
    stage: SearchStage,
    outcome: Option<Outcome>,

    /// The incomplete disclosure revealing the most slots, used to narrow the content-key query.
    partial: Option<DisclosedLabel>,
    tried: usize,
}

impl<'a> Search<'a> {
    fn new(envelope: &'a Envelope) -> Self {
        Search {
            envelope,
            stage: SearchStage::TryingBulkKeys,
            outcome: None,
            partial: None,
            tried: 0,
        }
    }

    fn enter(&mut self, stage: SearchStage) {
        trace!(?stage, tried = self.tried, "entering search stage");
        self.stage = stage;
    }

    fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    fn try_key(&mut self, key: &PrivateKey) -> ControlFlow<()> {
        if self.outcome.is_some() {
            return ControlFlow::Break(());
        }
        self.tried += 1;

        match self.attempt(key) {
            Attempt::Opened(sealed, disclosed) => {
                debug!(stage = ?self.stage, tried = self.tried, "envelope opened");
                self.outcome = Some(Ok((sealed, disclosed)));
                ControlFlow::Break(())
            }
            Attempt::Tampered(reason) => {
                self.outcome = Some(Err(reason));
                ControlFlow::Break(())
            }
            Attempt::Partial(disclosed) => {
                trace!("prefix key only reveals part of the label");
                let narrower = self
                    .partial
                    .as_ref()
                    .map_or(true, |held| disclosed.revealed_count() > held.revealed_count());
                if narrower {
                    self.partial = Some(disclosed);
                }
                ControlFlow::Continue(())
            }
            Attempt::Miss => ControlFlow::Continue(()),
        }
    }

    fn attempt(&self, key: &PrivateKey) -> Attempt {
        match self.envelope.content.try_open(key) {
            Ok(sealed) => return Attempt::Opened(sealed, None),
            Err(OpenError::Malformed(err)) => {
                warn!(%err, "content authenticated but does not decode");
                return Attempt::Tampered(TamperReason::MalformedPayload);
            }
            Err(OpenError::Mismatch) => {}
        }

        let depth = key.attributes().depth();
        let Some(disclosure) = self.envelope.disclosures.get(&depth) else {
            return Attempt::Miss;
        };
        let disclosed = match disclosure.try_open(key) {
            Ok(disclosed) => disclosed,
            Err(OpenError::Mismatch) => return Attempt::Miss,
            Err(OpenError::Malformed(err)) => {
                warn!(%err, depth, "label disclosure authenticated but does not decode");
                return Attempt::Tampered(TamperReason::MalformedPayload);
            }
        };

        if disclosed.len() != self.envelope.slot_count {
            return Attempt::Tampered(TamperReason::DisclosureMismatch);
        }
        if !disclosed.is_complete() {
            return Attempt::Partial(disclosed);
        }

        // Qualifying can only fail because of what this key lacks
        let qualified = match key.qualify(&disclosed.partition_label().attributes()) {
            Ok(qualified) => qualified,
            Err(err) => {
                debug!(%err, depth, "key cannot be qualified to the disclosed label");
                return Attempt::Miss;
            }
        };

        // A disclosure that leads a qualified key nowhere is lying
        match self.envelope.content.try_open(&qualified) {
            Ok(sealed) => Attempt::Opened(sealed, Some(disclosed)),
            Err(OpenError::Mismatch) => Attempt::Tampered(TamperReason::DisclosureMismatch),
            Err(OpenError::Malformed(err)) => {
                warn!(%err, "content authenticated but does not decode");
                Attempt::Tampered(TamperReason::MalformedPayload)
            }
        }
    }
}

fn finish<K: Keyring>(envelope: &Envelope, outcome: Outcome) -> Result<Dot, DecryptError<K>> {
    let checked = outcome.and_then(|(sealed, disclosed)| check(envelope, sealed, disclosed));
    checked.map_err(|reason| {
        warn!(%reason, "tampered envelope");
        DecryptError::TamperedEnvelope(reason)
    })
}

fn check(
    envelope: &Envelope,
    sealed: SealedDot,
    disclosed: Option<DisclosedLabel>,
) -> Result<Dot, TamperReason> {
    sealed
        .content
        .try_verify()
        .map_err(|_| TamperReason::BadSignature)?;

    if sealed.content.id() != sealed.content.payload().src {
        return Err(TamperReason::SourceMismatch);
    }

    if envelope.header.dst != sealed.content.payload().dst {
        return Err(TamperReason::DestinationMismatch);
    }

    if sealed.partition_label.len() != envelope.slot_count {
        return Err(TamperReason::SlotCountMismatch {
            envelope: envelope.slot_count,
            label: sealed.partition_label.len(),
        });
    }

    if sealed.inheritance != envelope.inheritance {
        return Err(TamperReason::InheritanceMismatch);
    }

    if let Some(disclosed) = disclosed {
        if !disclosed.agrees_with(&sealed.partition_label) {
            return Err(TamperReason::DisclosureMismatch);
        }
    }

    Ok(Dot {
        content: sealed.content.into_payload(),
        header: envelope.header,
        partition_label: sealed.partition_label,
        inheritance: sealed.inheritance,
    })
}
