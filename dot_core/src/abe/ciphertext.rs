//! Hybrid ciphertexts: an attribute-based encapsulation plus an AEAD body.

use super::{
    attributes::Attributes,
    encapsulation::Encapsulation,
    error::{AbeError, OpenError},
    params::Params,
    private_key::PrivateKey,
};
use crate::crypto::siv::Siv;
use derive_where::derive_where;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::instrument;

/// A `T` encrypted so that only keys for the sealing attribute vector (or a
/// prefix of it) can open it.
///
/// The ciphertext does not record the attribute vector it was sealed under.
#[derive(Serialize, Deserialize)]
#[derive_where(Debug, Clone, PartialEq, Eq)]
#[serde(bound = "")]
pub struct Ciphertext<T> {
    encapsulation: Encapsulation,
    nonce: Siv,
    #[serde(with = "serde_bytes")]
    ciphertext: Vec<u8>,
    #[derive_where(skip)]
    #[serde(skip)]
    _plaintext: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> Ciphertext<T> {
    #[instrument(skip_all, fields(attributes = ?attributes))]
    pub fn seal<R: rand::CryptoRng + rand::RngCore>(
        csprng: &mut R,
        params: &Params,
        attributes: &Attributes,
        payload: &T,
    ) -> Result<Self, AbeError> {
        let (encapsulation, key) = Encapsulation::encapsulate(csprng, params, attributes)?;

        let mut ciphertext = bincode::serialize(payload)?;
        let nonce = Siv::new(&key, &ciphertext, &bincode::serialize(attributes)?)?;
        key.try_encrypt(nonce, &mut ciphertext)
            .map_err(AbeError::Encryption)?;

        Ok(Ciphertext {
            encapsulation,
            nonce,
            ciphertext,
            _plaintext: PhantomData,
        })
    }

    /// Try to open with `key` exactly as given. No qualification is attempted.
    pub fn try_open(&self, key: &PrivateKey) -> Result<T, OpenError> {
        let symmetric_key = key.decapsulate(&self.encapsulation);

        let mut buf = self.ciphertext.clone();
        symmetric_key
            .try_decrypt(self.nonce, &mut buf)
            .map_err(|_| OpenError::Mismatch)?;

        Ok(bincode::deserialize(&buf)?)
    }

    pub fn encapsulation(&self) -> &Encapsulation {
        &self.encapsulation
    }

    pub fn nonce(&self) -> Siv {
        self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    #[cfg(test)]
    pub(crate) fn ciphertext_mut(&mut self) -> &mut Vec<u8> {
        &mut self.ciphertext
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abe::params::MasterKey;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn attrs(pairs: &[(usize, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(index, value)| (*index, value.as_bytes().to_vec()))
            .collect()
    }

    fn domain() -> (Params, MasterKey) {
        Params::setup(&mut rand::thread_rng(), 4).unwrap()
    }

    #[test]
    fn test_exact_key_opens() -> TestResult {
        let csprng = &mut rand::thread_rng();
        let (params, msk) = domain();
        let target = attrs(&[(0, "meta"), (1, "ns")]);

        let sealed = Ciphertext::seal(csprng, &params, &target, &"hello".to_string())?;
        let key = PrivateKey::generate(csprng, &params, &msk, &target)?;

        assert_eq!(sealed.try_open(&key)?, "hello");
        Ok(())
    }

    #[test]
    fn test_mismatched_key_is_rejected() -> TestResult {
        let csprng = &mut rand::thread_rng();
        let (params, msk) = domain();

        let sealed = Ciphertext::seal(
            csprng,
            &params,
            &attrs(&[(0, "meta"), (1, "hello")]),
            &42u64,
        )?;
        let key = PrivateKey::generate(csprng, &params, &msk, &attrs(&[(0, "meta"), (1, "other")]))?;

        assert!(matches!(sealed.try_open(&key), Err(OpenError::Mismatch)));
        Ok(())
    }

    #[test]
    fn test_prefix_key_opens_after_qualifying() -> TestResult {
        let csprng = &mut rand::thread_rng();
        let (params, msk) = domain();
        let target = attrs(&[(0, "meta"), (1, "ns"), (2, "leaf")]);

        let sealed = Ciphertext::seal(csprng, &params, &target, &7u64)?;
        let prefix_key = PrivateKey::generate(csprng, &params, &msk, &attrs(&[(0, "meta")]))?;

        assert!(matches!(sealed.try_open(&prefix_key), Err(OpenError::Mismatch)));
        assert_eq!(sealed.try_open(&prefix_key.qualify(&target)?)?, 7);
        Ok(())
    }

    #[test]
    fn test_delegated_key_opens() -> TestResult {
        let csprng = &mut rand::thread_rng();
        let (params, msk) = domain();
        let target = attrs(&[(0, "meta"), (1, "ns"), (3, "x")]);

        let sealed = Ciphertext::seal(csprng, &params, &target, &vec![1u8, 2, 3])?;
        let root = PrivateKey::generate(csprng, &params, &msk, &attrs(&[(0, "meta")]))?;
        let middle = root.delegate(csprng, &params, &attrs(&[(0, "meta"), (1, "ns")]))?;
        let leaf = middle.delegate(csprng, &params, &target)?;

        assert_eq!(leaf.attributes(), &target);
        assert_eq!(sealed.try_open(&leaf)?, vec![1u8, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_cannot_delegate_sideways() -> TestResult {
        let csprng = &mut rand::thread_rng();
        let (params, msk) = domain();
        let key = PrivateKey::generate(csprng, &params, &msk, &attrs(&[(0, "meta"), (1, "a")]))?;

        let result = key.delegate(csprng, &params, &attrs(&[(0, "meta"), (1, "b")]));
        assert!(matches!(result, Err(AbeError::IncompatibleAttributes)));
        Ok(())
    }

    #[test]
    fn test_out_of_range_slot() {
        let csprng = &mut rand::thread_rng();
        let (params, _) = domain();

        let result = Ciphertext::seal(csprng, &params, &attrs(&[(4, "x")]), &0u8);
        assert!(matches!(
            result,
            Err(AbeError::SlotOutOfRange {
                index: 4,
                slot_count: 4
            })
        ));
    }

    #[test]
    fn test_tampered_body_is_rejected() -> TestResult {
        let csprng = &mut rand::thread_rng();
        let (params, msk) = domain();
        let target = attrs(&[(0, "meta")]);

        let mut sealed = Ciphertext::seal(csprng, &params, &target, &"payload".to_string())?;
        sealed.ciphertext_mut()[0] ^= 1;
        let key = PrivateKey::generate(csprng, &params, &msk, &target)?;

        assert!(matches!(sealed.try_open(&key), Err(OpenError::Mismatch)));
        Ok(())
    }
}
