/// BIP-39 / BIP-44 key handling for Ethereum addresses
///
/// The mnemonic checksum, seed stretching and BIP-32 child derivation are all
/// delegated to `bip39` and `bitcoin::bip32`; this module only turns derived
/// public keys into Ethereum addresses.

use alloy_primitives::{keccak256, Address};
use bip39::Mnemonic;
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::Network;
use std::str::FromStr;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::scanner::{AddressDeriver, AddressRecord};
use crate::Result;

/// Addresses printed by `derive-addresses`
pub const DERIVE_COUNT: u32 = 20;

/// Addresses printed per base path by `derive-all-paths`
pub const EXPLORE_COUNT: u32 = 5;

/// Default account node; `derive-addresses` derives relative to it
pub const DEFAULT_ACCOUNT_PATH: &str = "m/44'/60'/0'/0/0";

/// Relative child path under [`DEFAULT_ACCOUNT_PATH`]
pub const RELATIVE_TEMPLATE: &str = "0/{index}";

/// Candidate base paths tried by `derive-all-paths`
pub const BASE_PATHS: [&str; 3] = ["m/44'/60'/0'/0", "m/44'/60'/0'", "m/44'/60'/1'/0"];

/// Root key material for one mnemonic
pub struct HdWallet {
    master: Xpriv,
    secp: Secp256k1<All>,
}

impl HdWallet {
    /// Validate a phrase and build the master key (empty BIP-39 passphrase)
    pub fn from_phrase(words: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse(words.trim())
            .map_err(|e| ScanError::InvalidMnemonic(e.to_string()))?;

        Self::from_mnemonic(&mnemonic)
    }

    pub fn from_mnemonic(mnemonic: &Mnemonic) -> Result<Self> {
        let seed = mnemonic.to_seed("");

        // Network only affects xpriv serialization, never the derived keys
        let master = Xpriv::new_master(Network::Bitcoin, &seed)
            .map_err(|e| ScanError::Derivation(e.to_string()))?;

        Ok(Self {
            master,
            secp: Secp256k1::new(),
        })
    }

    /// Derive the address at a full path such as `m/44'/60'/0'/0/3`
    pub fn derive_at(&self, path: &str) -> Result<Address> {
        let derivation_path = DerivationPath::from_str(path)
            .map_err(|e| ScanError::Derivation(format!("{}: {}", path, e)))?;

        let child = self
            .master
            .derive_priv(&self.secp, &derivation_path)
            .map_err(|e| ScanError::Derivation(format!("{}: {}", path, e)))?;

        let public_key = child.private_key.public_key(&self.secp);
        let uncompressed = public_key.serialize_uncompressed();

        // Drop the 0x04 prefix, hash the 64-byte body, keep the last 20 bytes
        let digest = keccak256(&uncompressed[1..]);
        Ok(Address::from_slice(&digest[12..]))
    }

    pub fn record_at(&self, index: u32, path: String) -> Result<AddressRecord> {
        let address = self.derive_at(&path)?;
        Ok(AddressRecord {
            index,
            path,
            address,
        })
    }

    /// Derive `count` addresses at `{anchor}/0/{i}`
    pub fn derive_relative(&self, anchor: &str, count: u32) -> Result<Vec<AddressRecord>> {
        let anchor = anchor.trim_end_matches('/');
        (0..count)
            .map(|index| {
                let relative = RELATIVE_TEMPLATE.replace("{index}", &index.to_string());
                self.record_at(index, format!("{}/{}", anchor, relative))
            })
            .collect()
    }

    /// Derive `count` addresses under each base path, grouped per base
    pub fn derive_base_paths(
        &self,
        bases: &[&str],
        count: u32,
    ) -> Result<Vec<(String, Vec<AddressRecord>)>> {
        let mut groups = Vec::with_capacity(bases.len());

        for base in bases {
            let base = base.trim_end_matches('/');
            let records = (0..count)
                .map(|index| self.record_at(index, format!("{}/{}", base, index)))
                .collect::<Result<Vec<_>>>()?;
            groups.push((base.to_string(), records));
        }

        Ok(groups)
    }
}

/// Derives scan addresses by substituting the index into a path template
pub struct TemplateDeriver<'a> {
    wallet: &'a HdWallet,
    config: &'a ScanConfig,
}

impl<'a> TemplateDeriver<'a> {
    pub fn new(wallet: &'a HdWallet, config: &'a ScanConfig) -> Self {
        Self { wallet, config }
    }
}

impl AddressDeriver for TemplateDeriver<'_> {
    fn derive(&self, index: u32) -> Result<AddressRecord> {
        self.wallet.record_at(index, self.config.path_for(index))
    }
}

/// EIP-55 mixed-case rendering
pub fn checksum_address(address: &Address) -> String {
    address.to_checksum(None)
}

/// Lowercase `0x` hex, the form price APIs and JSON keys expect
pub fn lowercase_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}
