use super::{
    envelope::Envelope,
    error::EncryptError,
    inheritance::DisclosedLabel,
    sealed::SealedDot,
    Dot,
};
use crate::{
    abe::Ciphertext,
    config::DotConfig,
    crypto::{hash_scheme::UnsupportedScheme, signed::Signed},
    entity::EntityId,
    keyring::Keyring,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Encrypt `dot` into an [`Envelope`] readable by holders of a key for its partition label,
/// or for a prefix of it.
///
/// The content is signed with the keyring's source key, so `dot.content.src` must be that
/// identity. An empty inheritance map is replaced with the configured default.
#[instrument(skip_all, fields(dst = %dot.header.dst))]
pub async fn encrypt_dot<K: Keyring, R: rand::CryptoRng + rand::RngCore>(
    dot: &Dot,
    keyring: &K,
    config: &DotConfig,
    csprng: &mut R,
) -> Result<Envelope, EncryptError<K>> {
    let hash_scheme = config.hash_scheme.id().ok_or(UnsupportedScheme)?;

    let params = keyring
        .destination_oaque_params(&dot.header.dst)
        .await
        .map_err(EncryptError::ParameterFetchFailed)?;

    let label = &dot.partition_label;
    if label.len() != params.slot_count() {
        return Err(EncryptError::MalformedPartitionLabel {
            expected: params.slot_count(),
            actual: label.len(),
        });
    }

    let source_key = keyring.source_keys();
    if EntityId::from(source_key) != dot.content.src {
        return Err(EncryptError::SourceMismatch);
    }

    let inheritance = if dot.inheritance.is_empty() {
        config.default_inheritance.clone()
    } else {
        dot.inheritance.clone()
    };

    let sealed = SealedDot {
        content: Signed::try_sign(source_key, dot.content.clone())?,
        partition_label: label.clone(),
        inheritance: inheritance.clone(),
    };
    let content = Ciphertext::seal(csprng, &params, &label.attributes(), &sealed)?;

    let mut disclosures = BTreeMap::new();
    for depth in 1..label.depth() {
        if label.slot(depth - 1).is_none() {
            continue;
        }
        let disclosed = DisclosedLabel::at_depth(label, &inheritance, depth);
        let ciphertext = Ciphertext::seal(csprng, &params, &label.prefix(depth), &disclosed)?;
        disclosures.insert(depth, ciphertext);
    }
    debug!(disclosures = disclosures.len(), "sealed DOT");

    Ok(Envelope {
        header: dot.header,
        hash_scheme,
        slot_count: params.slot_count(),
        content,
        disclosures,
        inheritance,
        extensions: Vec::new(),
    })
}
