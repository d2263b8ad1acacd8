//! Flow request/callback signature protocol.
//!
//! Flow authenticates both directions with the same scheme: concatenate all
//! parameters sorted by key, HMAC-SHA256 the result with the shared secret,
//! and carry the lowercase hex digest in the reserved `s` parameter.
//! Verification of inbound callbacks uses constant-time comparison.

use std::collections::BTreeMap;
use std::fmt::Display;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Reserved parameter name carrying the signature itself.
///
/// Never included in the signing computation.
pub const SIGNATURE_KEY: &str = "s";

/// A flat set of parameters covered by a signature.
///
/// Keys are kept in byte-wise lexicographic order, so the canonical
/// serialization is independent of insertion order by construction. Values
/// are stored as their plain text rendering; numbers go through `Display`,
/// which yields the plain decimal form with no locale formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedParams {
    params: BTreeMap<String, String>,
}

impl SignedParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter. Scalar values only; the caller renders nothing
    /// nested because the wire format is a flat concatenation.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Builds a set from key/value pairs, e.g. a decoded form body.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Removes and returns the reserved signature parameter, if present.
    pub fn take_signature(&mut self) -> Option<String> {
        self.params.remove(SIGNATURE_KEY)
    }

    /// Looks up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Canonical serialization: each key immediately followed by its value,
    /// keys ascending byte-wise, no separators. The reserved `s` key is
    /// always excluded.
    ///
    /// Adjacent key/value boundaries are ambiguous in this format (key `a`
    /// value `b1` serializes like key `ab` value `1`). That is a property of
    /// the gateway's wire protocol and is preserved as-is for
    /// interoperability.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.params {
            if key == SIGNATURE_KEY {
                continue;
            }
            out.push_str(key);
            out.push_str(value);
        }
        out
    }

    /// Key/value pairs in canonical order, signature included if set.
    /// Used to form-encode the outbound request.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Signs parameter sets and verifies claimed signatures with the shared
/// Flow secret.
#[derive(Clone)]
pub struct SignatureCodec {
    secret: SecretString,
}

impl SignatureCodec {
    /// Creates a codec around the shared secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Computes the signature for a parameter set: HMAC-SHA256 over the
    /// canonical serialization, lowercase hex encoded.
    pub fn sign(&self, params: &SignedParams) -> String {
        hex::encode(self.digest(params))
    }

    /// Verifies a claimed signature against the recomputed one.
    ///
    /// The comparison is constant-time; a mismatch must not leak how many
    /// leading bytes matched. Malformed hex fails verification outright.
    pub fn verify(&self, params: &SignedParams, claimed: &str) -> bool {
        let claimed_bytes = match hex::decode(claimed) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let expected = self.digest(params);
        constant_time_compare(&expected, &claimed_bytes)
    }

    fn digest(&self, params: &SignedParams) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key size");
        mac.update(params.serialize().as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
