use dot_core::{
    abe::{MasterKey, Params, PrivateKey, DEFAULT_SLOT_COUNT},
    config::DotConfig,
    context::{CancelToken, NeverCancel},
    dot::{decrypt_dot, encrypt_dot, DecryptError, Dot, DotContent, Envelope, TamperReason},
    entity::EntityId,
    keyring::{KeyVisitor, Keyring},
    partition::{namespace_partition, PartitionLabel},
    test_utils::{MemoryKeyring, MemoryKeyringError},
};
use pretty_assertions::assert_eq;
use testresult::TestResult;
use thiserror::Error;

/// Wraps a [`MemoryKeyring`] with a misbehaving backend.
#[derive(Debug)]
struct FlakyKeyring {
    inner: MemoryKeyring,
    stall_bulk: bool,
    stall_labels: bool,
    fail_labels: bool,
}

impl FlakyKeyring {
    fn over(inner: MemoryKeyring) -> Self {
        FlakyKeyring {
            inner,
            stall_bulk: false,
            stall_labels: false,
            fail_labels: false,
        }
    }
}

#[derive(Debug, Error)]
enum FlakyError {
    #[error("backend offline")]
    Offline,

    #[error(transparent)]
    Inner(#[from] MemoryKeyringError),
}

impl Keyring for FlakyKeyring {
    type Error = FlakyError;

    fn source_keys(&self) -> &ed25519_dalek::SigningKey {
        self.inner.source_keys()
    }

    async fn destination_oaque_params(&self, destination: &EntityId) -> Result<Params, FlakyError> {
        Ok(self.inner.destination_oaque_params(destination).await?)
    }

    async fn source_oaque_params(&self) -> Result<(Params, MasterKey), FlakyError> {
        Ok(self.inner.source_oaque_params().await?)
    }

    async fn oaque_keys_for_partition_label(
        &self,
        destination: &EntityId,
        label: &PartitionLabel,
        visit: &mut KeyVisitor<'_>,
    ) -> Result<(), FlakyError> {
        if self.fail_labels {
            return Err(FlakyError::Offline);
        }
        if self.stall_labels {
            futures::future::pending::<()>().await;
        }
        Ok(self
            .inner
            .oaque_keys_for_partition_label(destination, label, visit)
            .await?)
    }

    async fn oaque_keys_for_content(
        &self,
        destination: &EntityId,
        label: &PartitionLabel,
        visit: &mut KeyVisitor<'_>,
    ) -> Result<(), FlakyError> {
        Ok(self
            .inner
            .oaque_keys_for_content(destination, label, visit)
            .await?)
    }

    async fn oaque_partition_keys_for(
        &self,
        destination: &EntityId,
    ) -> Result<Vec<PrivateKey>, FlakyError> {
        if self.stall_bulk {
            futures::future::pending::<()>().await;
        }
        Ok(self.inner.oaque_partition_keys_for(destination).await?)
    }

    async fn oaque_delegation_key_for(
        &self,
        destination: &EntityId,
        prefix: &PartitionLabel,
    ) -> Result<PrivateKey, FlakyError> {
        Ok(self.inner.oaque_delegation_key_for(destination, prefix).await?)
    }

    fn namespace_hints(&self) -> Vec<Vec<u8>> {
        self.inner.namespace_hints()
    }
}

async fn minted() -> TestResult<(MemoryKeyring, Dot, Envelope)> {
    let csprng = &mut rand::thread_rng();
    let mut alice = MemoryKeyring::generate(csprng, DEFAULT_SLOT_COUNT)?;
    let mut bob = MemoryKeyring::generate(csprng, DEFAULT_SLOT_COUNT)?;
    bob.publish_to(&mut alice);

    let label = namespace_partition(b"ns")
        .padded(DEFAULT_SLOT_COUNT)
        .with_slot(2, "leaf");
    let content = DotContent::new(alice.id(), bob.id(), "foo/bar", ["publish", "subscribe"]);
    let dot = Dot::new(content, label);
    let envelope = encrypt_dot(&dot, &alice, &DotConfig::default(), csprng).await?;

    let key = bob.grant_key(csprng, &namespace_partition(b"ns"))?;
    bob.add_partition_key(bob.id(), key);

    Ok((bob, dot, envelope))
}

#[tokio::test]
async fn test_rewritten_header_is_tampering() -> TestResult {
    test_utils::init_logging();
    let csprng = &mut rand::thread_rng();
    let (mut bob, _, mut envelope) = minted().await?;

    // Keys for Bob's domain, filed under whoever the header now names
    let impostor = EntityId::generate(csprng);
    let key = bob.grant_key(csprng, &namespace_partition(b"ns"))?;
    bob.add_partition_key(impostor, key);
    envelope.header_mut().dst = impostor;

    let err = decrypt_dot(&envelope, &NeverCancel, &bob)
        .await
        .expect_err("header no longer matches the content");
    assert!(err.is_tampered());
    assert!(!err.is_access_denied());
    assert!(matches!(
        err,
        DecryptError::TamperedEnvelope(TamperReason::DestinationMismatch)
    ));
    Ok(())
}

#[tokio::test]
async fn test_rewritten_header_survives_reencoding_as_tampering() -> TestResult {
    let csprng = &mut rand::thread_rng();
    let (mut bob, _, mut envelope) = minted().await?;

    let impostor = EntityId::generate(csprng);
    let key = bob.grant_key(csprng, &namespace_partition(b"ns"))?;
    bob.add_partition_key(impostor, key);
    envelope.header_mut().dst = impostor;
    let reparsed = Envelope::from_bytes(&envelope.to_bytes()?)?;

    let err = decrypt_dot(&reparsed, &NeverCancel, &bob)
        .await
        .expect_err("tampering is not lost in transit");
    assert!(err.is_tampered());
    Ok(())
}

#[tokio::test]
async fn test_cancelled_before_start() -> TestResult {
    let (bob, _, envelope) = minted().await?;
    let (token, handle) = CancelToken::new();
    handle.cancel();

    let result = decrypt_dot(&envelope, &token, &bob).await;
    assert!(matches!(result, Err(DecryptError::Cancelled)));
    Ok(())
}

#[tokio::test]
async fn test_cancel_interrupts_a_stalled_keyring() -> TestResult {
    test_utils::init_logging();
    let (bob, _, envelope) = minted().await?;
    let flaky = FlakyKeyring {
        stall_bulk: true,
        ..FlakyKeyring::over(bob)
    };
    let (token, handle) = CancelToken::new();

    let (result, ()) = tokio::join!(decrypt_dot(&envelope, &token, &flaky), async move {
        tokio::task::yield_now().await;
        handle.cancel();
    });

    let err = result.expect_err("the bulk fetch never completes");
    assert!(matches!(err, DecryptError::Cancelled));
    assert!(!err.is_access_denied());
    Ok(())
}

#[tokio::test]
async fn test_cancel_interrupts_a_stalled_label_enumeration() -> TestResult {
    let csprng = &mut rand::thread_rng();
    let (bob, _, envelope) = minted().await?;

    // Nothing in bulk, so the search reaches the partition-label enumeration and hangs there
    let mut fresh = MemoryKeyring::generate(csprng, DEFAULT_SLOT_COUNT)?;
    bob.publish_to(&mut fresh);
    let flaky = FlakyKeyring {
        stall_labels: true,
        ..FlakyKeyring::over(fresh)
    };
    let (token, handle) = CancelToken::new();

    let (result, ()) = tokio::join!(decrypt_dot(&envelope, &token, &flaky), async move {
        tokio::task::yield_now().await;
        handle.cancel();
    });

    let err = result.expect_err("the label enumeration never completes");
    assert!(matches!(err, DecryptError::Cancelled));
    assert_eq!(flaky.inner.visited(), 0);
    Ok(())
}

#[tokio::test]
async fn test_keyring_errors_propagate_verbatim() -> TestResult {
    let csprng = &mut rand::thread_rng();
    let (bob, _, envelope) = minted().await?;

    // Nothing in bulk, so the search has to reach the failing enumeration
    let mut fresh = MemoryKeyring::generate(csprng, DEFAULT_SLOT_COUNT)?;
    bob.publish_to(&mut fresh);
    let flaky = FlakyKeyring {
        fail_labels: true,
        ..FlakyKeyring::over(fresh)
    };

    let err = decrypt_dot(&envelope, &NeverCancel, &flaky)
        .await
        .expect_err("label enumeration fails");
    assert!(matches!(err, DecryptError::Keyring(FlakyError::Offline)));
    assert!(!err.is_access_denied());
    Ok(())
}

#[tokio::test]
async fn test_bulk_hit_never_touches_the_failing_enumeration() -> TestResult {
    let (bob, dot, envelope) = minted().await?;
    let flaky = FlakyKeyring {
        fail_labels: true,
        ..FlakyKeyring::over(bob)
    };

    assert_eq!(decrypt_dot(&envelope, &NeverCancel, &flaky).await?, dot);
    Ok(())
}
