// Copyright (C) 2024-2026 The dao-rs contributors.
//
// dao_creator.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The organization orchestrator.
//!
//! Creating an organization is a two-step protocol against the
//! DaoCreator contract: `forge_org` creates the avatar, native token,
//! reputation system, and controller in one transaction, and
//! `set_schemes` registers the initial scheme set exactly once.
//! Between the two steps the organization is locked to the account
//! that forged it; this facade mirrors that lock so violations are
//! rejected before any transaction is submitted. The contract enforces
//! the same rules independently, and a contract-side rejection is
//! surfaced as a revert, never masked.

use crate::binding::{extract_address, ContractBinding};
use crate::codec::{normalize_field, require_nonzero};
use crate::error::{WrapperError, WrapperResult};
use crate::registry::{ContractKind, ContractRegistry};
use dao_abi::{
    AbiDescriptor, AbiKind, AbiValue, Amount, EventParam, EventSchema, FunctionSchema,
};
use dao_primitives::{Address, Bytes32, Permissions};
use dao_rpc_client::{ChainProvider, ClientSettings, TransactionResult};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

static ABI: Lazy<AbiDescriptor> = Lazy::new(|| {
    AbiDescriptor::new(
        vec![
            EventSchema::new(
                "NewOrg",
                vec![EventParam::new("_avatar", AbiKind::Address, true)],
            ),
            EventSchema::new(
                "InitialSchemesSet",
                vec![EventParam::new("_avatar", AbiKind::Address, true)],
            ),
        ],
        vec![
            FunctionSchema::new(
                "forgeOrg",
                vec![
                    AbiKind::Str,
                    AbiKind::Str,
                    AbiKind::Str,
                    AbiKind::AddressArray,
                    AbiKind::UintArray,
                    AbiKind::UintArray,
                    AbiKind::Uint,
                ],
            ),
            FunctionSchema::new(
                "setSchemes",
                vec![
                    AbiKind::Address,
                    AbiKind::AddressArray,
                    AbiKind::UintArray,
                    AbiKind::UintArray,
                ],
            ),
        ],
    )
});

/// The SDK-facing ABI of the creator contract.
#[must_use]
pub fn abi() -> &'static AbiDescriptor {
    &ABI
}

/// One founding member: initial token and reputation allocations, in
/// the smallest unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FounderSpec {
    /// The founder's account.
    pub address: Address,
    /// Initial native token allocation.
    pub tokens: Amount,
    /// Initial reputation allocation.
    pub reputation: Amount,
}

/// Inputs for forging an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgeOrgOptions {
    /// Organization name.
    pub name: String,
    /// Native token name.
    pub token_name: String,
    /// Native token symbol.
    pub token_symbol: String,
    /// Founding members; at least one is required.
    pub founders: Vec<FounderSpec>,
    /// Native token supply cap; zero means uncapped.
    pub token_cap: Amount,
}

/// A freshly forged organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgedOrg {
    /// The organization's avatar address, correlated from `NewOrg`.
    pub avatar: Address,
    /// The underlying transaction result.
    pub tx: TransactionResult,
}

/// One scheme to register during `set_schemes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeRegistration {
    /// The scheme's contract kind, determining its parameter table.
    pub kind: ContractKind,
    /// Deployed address of the scheme.
    pub address: Address,
    /// Named configuration for the scheme, validated against its table.
    pub params: crate::codec::ParamInput,
    /// Controller permissions granted to the scheme.
    pub permissions: Permissions,
}

impl SchemeRegistration {
    /// A registration with the kind's conventional permissions.
    #[must_use]
    pub fn new(kind: ContractKind, address: Address, params: crate::codec::ParamInput) -> Self {
        Self {
            kind,
            address,
            params,
            permissions: kind.default_permissions(),
        }
    }
}

/// Outcome of the one-shot scheme registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemesSet {
    /// Parameter hash of each registered scheme, in registration order.
    pub param_hashes: Vec<Bytes32>,
    /// The underlying transaction result.
    pub tx: TransactionResult,
}

struct OrgRecord {
    forger: Address,
    configured: bool,
}

/// Typed facade over one deployed DaoCreator instance.
pub struct DaoCreator {
    binding: ContractBinding,
    orgs: RwLock<HashMap<Address, OrgRecord>>,
}

impl DaoCreator {
    /// Binds to the creator at a known address.
    #[must_use]
    pub fn at(
        address: Address,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            binding: ContractBinding::at(ContractKind::DaoCreator, address, provider, settings),
            orgs: RwLock::new(HashMap::new()),
        }
    }

    /// Binds to the registered deployment.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::NotDeployed`] when no address is
    /// registered.
    pub fn deployed(
        registry: &ContractRegistry,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> WrapperResult<Self> {
        Ok(Self {
            binding: ContractBinding::deployed(
                ContractKind::DaoCreator,
                registry,
                provider,
                settings,
            )?,
            orgs: RwLock::new(HashMap::new()),
        })
    }

    /// Deploys a fresh creator from the registry's bytecode.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::MissingBytecode`] or chain-interaction
    /// failures.
    pub async fn deploy(
        registry: &ContractRegistry,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> WrapperResult<Self> {
        Ok(Self {
            binding: ContractBinding::deploy(
                ContractKind::DaoCreator,
                registry,
                provider,
                settings,
            )
            .await?,
            orgs: RwLock::new(HashMap::new()),
        })
    }

    /// The bound contract address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.binding.address()
    }

    /// The underlying binding, for event queries and subscriptions.
    #[must_use]
    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    /// Forges an organization: avatar, native token, reputation system,
    /// and controller in one transaction. The resulting organization is
    /// locked to the calling account until `set_schemes` completes.
    ///
    /// All inputs are validated before anything is submitted; the first
    /// failure aborts the whole operation with nothing sent.
    ///
    /// # Errors
    ///
    /// - [`WrapperError::MissingParameter`] /
    ///   [`WrapperError::InvalidParameter`] for absent names, an empty
    ///   founder list, zero founder addresses, or negative allocations.
    /// - [`WrapperError::EventNotFound`] when the avatar cannot be
    ///   correlated from the `NewOrg` event of a successful
    ///   transaction.
    /// - Chain-interaction failures after submission.
    pub async fn forge_org(&self, options: &ForgeOrgOptions) -> WrapperResult<ForgedOrg> {
        require_text("name", &options.name)?;
        require_text("token_name", &options.token_name)?;
        require_text("token_symbol", &options.token_symbol)?;
        if options.founders.is_empty() {
            return Err(WrapperError::MissingParameter {
                field: "founders".to_string(),
            });
        }

        let mut addresses = Vec::with_capacity(options.founders.len());
        let mut tokens: Vec<BigUint> = Vec::with_capacity(options.founders.len());
        let mut reputation: Vec<BigUint> = Vec::with_capacity(options.founders.len());
        for (i, founder) in options.founders.iter().enumerate() {
            addresses.push(require_nonzero(
                &format!("founders[{i}].address"),
                founder.address,
            )?);
            tokens.push(normalize_field(
                &format!("founders[{i}].tokens"),
                &founder.tokens,
            )?);
            reputation.push(normalize_field(
                &format!("founders[{i}].reputation"),
                &founder.reputation,
            )?);
        }
        let cap = normalize_field("token_cap", &options.token_cap)?;

        let forger = self.binding.caller().await?;
        let tx = self
            .binding
            .invoke(
                "forgeOrg",
                &[
                    AbiValue::Str(options.name.clone()),
                    AbiValue::Str(options.token_name.clone()),
                    AbiValue::Str(options.token_symbol.clone()),
                    AbiValue::AddressArray(addresses),
                    AbiValue::UintArray(tokens),
                    AbiValue::UintArray(reputation),
                    AbiValue::Uint(cap),
                ],
            )
            .await?;
        let avatar = extract_address(&tx, "NewOrg", "_avatar")?;

        self.orgs.write().insert(
            avatar,
            OrgRecord {
                forger,
                configured: false,
            },
        );
        info!(%avatar, %forger, name = %options.name, "organization forged");
        Ok(ForgedOrg { avatar, tx })
    }

    /// Registers the organization's initial scheme set. One-shot: a
    /// second call for the same avatar fails with
    /// [`WrapperError::AlreadyConfigured`], and only the forging
    /// account may call it.
    ///
    /// Every registration is validated against its scheme's parameter
    /// table before the batched transaction is submitted; one invalid
    /// registration aborts the whole batch with nothing sent.
    ///
    /// # Errors
    ///
    /// - [`WrapperError::UnknownOrganization`] for an avatar this
    ///   creator did not forge.
    /// - [`WrapperError::AlreadyConfigured`] on a repeated call.
    /// - [`WrapperError::Unauthorized`] when the caller is not the
    ///   forger.
    /// - Parameter validation failures before submission,
    ///   chain-interaction failures after.
    pub async fn set_schemes(
        &self,
        avatar: Address,
        registrations: &[SchemeRegistration],
    ) -> WrapperResult<SchemesSet> {
        if registrations.is_empty() {
            return Err(WrapperError::MissingParameter {
                field: "schemes".to_string(),
            });
        }

        let caller = self.binding.caller().await?;
        {
            let orgs = self.orgs.read();
            let record = orgs
                .get(&avatar)
                .ok_or(WrapperError::UnknownOrganization { avatar })?;
            if record.configured {
                return Err(WrapperError::AlreadyConfigured { avatar });
            }
            if record.forger != caller {
                return Err(WrapperError::Unauthorized {
                    avatar,
                    forger: record.forger,
                    actual: caller,
                });
            }
        }

        let mut addresses = Vec::with_capacity(registrations.len());
        let mut param_hashes = Vec::with_capacity(registrations.len());
        let mut permissions: Vec<BigUint> = Vec::with_capacity(registrations.len());
        for (i, registration) in registrations.iter().enumerate() {
            let address = require_nonzero(
                &format!("schemes[{i}].address"),
                registration.address,
            )?;
            let table = registration.kind.param_table().ok_or_else(|| {
                WrapperError::InvalidParameter {
                    field: format!("schemes[{i}].kind"),
                    constraint: format!(
                        "{} is not a registrable scheme",
                        registration.kind.name()
                    ),
                }
            })?;
            let set = table.encode(&registration.params)?;
            addresses.push(address);
            param_hashes.push(set.hash());
            permissions.push(BigUint::from(registration.permissions.bits()));
        }

        let hash_words: Vec<BigUint> = param_hashes
            .iter()
            .map(|h| BigUint::from_bytes_be(h.as_bytes()))
            .collect();
        let tx = self
            .binding
            .invoke(
                "setSchemes",
                &[
                    AbiValue::Address(avatar),
                    AbiValue::AddressArray(addresses),
                    AbiValue::UintArray(hash_words),
                    AbiValue::UintArray(permissions),
                ],
            )
            .await?;

        if let Some(record) = self.orgs.write().get_mut(&avatar) {
            record.configured = true;
        }
        info!(%avatar, schemes = registrations.len(), "initial schemes set");
        Ok(SchemesSet { param_hashes, tx })
    }
}

fn require_text(field: &str, value: &str) -> WrapperResult<()> {
    if value.trim().is_empty() {
        return Err(WrapperError::MissingParameter {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis_protocol::{self, GenesisProtocolParams};
    use dao_rpc_client::testing::MockProvider;

    fn creator(provider: &Arc<MockProvider>) -> DaoCreator {
        DaoCreator::at(
            Address::from([0xcc; 20]),
            provider.clone(),
            ClientSettings::default(),
        )
    }

    fn forge_options() -> ForgeOrgOptions {
        ForgeOrgOptions {
            name: "Genesis".to_string(),
            token_name: "Genesis Token".to_string(),
            token_symbol: "GEN".to_string(),
            founders: vec![FounderSpec {
                address: Address::from([1u8; 20]),
                tokens: Amount::from(1_000u64),
                reputation: Amount::from(1_000u64),
            }],
            token_cap: Amount::zero(),
        }
    }

    fn new_org_log(contract: Address, avatar: Address) -> dao_abi::RawLog {
        abi()
            .event("NewOrg")
            .unwrap()
            .encode(contract, 0, &[AbiValue::Address(avatar)])
            .unwrap()
    }

    fn schemes_set_log(contract: Address, avatar: Address) -> dao_abi::RawLog {
        abi()
            .event("InitialSchemesSet")
            .unwrap()
            .encode(contract, 0, &[AbiValue::Address(avatar)])
            .unwrap()
    }

    fn voting_scheme() -> SchemeRegistration {
        SchemeRegistration::new(
            ContractKind::GenesisProtocol,
            Address::from([0xee; 20]),
            GenesisProtocolParams::default().input(),
        )
    }

    async fn forged(creator: &DaoCreator, provider: &Arc<MockProvider>) -> Address {
        let avatar = Address::from([0xab; 20]);
        provider.enqueue_success(vec![new_org_log(creator.address(), avatar)]);
        let forged = creator.forge_org(&forge_options()).await.unwrap();
        assert_eq!(forged.avatar, avatar);
        avatar
    }

    #[tokio::test]
    async fn test_forge_then_set_schemes() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);
        let avatar = forged(&creator, &provider).await;

        provider.enqueue_success(vec![schemes_set_log(creator.address(), avatar)]);
        let outcome = creator
            .set_schemes(avatar, &[voting_scheme()])
            .await
            .unwrap();

        assert_eq!(outcome.param_hashes.len(), 1);
        let expected = genesis_protocol::PARAMS
            .encode(&GenesisProtocolParams::default().input())
            .unwrap()
            .hash();
        assert_eq!(outcome.param_hashes[0], expected);
        assert_eq!(provider.submissions().len(), 2);
    }

    #[tokio::test]
    async fn test_set_schemes_is_one_shot() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);
        let avatar = forged(&creator, &provider).await;

        provider.enqueue_success(vec![schemes_set_log(creator.address(), avatar)]);
        creator
            .set_schemes(avatar, &[voting_scheme()])
            .await
            .unwrap();

        let err = creator
            .set_schemes(avatar, &[voting_scheme()])
            .await
            .unwrap_err();
        assert_eq!(err, WrapperError::AlreadyConfigured { avatar });
        // the rejected second call submitted nothing
        assert_eq!(provider.submissions().len(), 2);
    }

    #[tokio::test]
    async fn test_set_schemes_rejects_non_forger() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);
        let avatar = forged(&creator, &provider).await;

        let intruder = Address::from([0x99; 20]);
        provider.set_default_account(intruder);
        let err = creator
            .set_schemes(avatar, &[voting_scheme()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::Unauthorized { actual, .. } if actual == intruder
        ));
        assert_eq!(provider.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_set_schemes_rejects_unknown_avatar() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);
        let avatar = Address::from([0x77; 20]);

        let err = creator
            .set_schemes(avatar, &[voting_scheme()])
            .await
            .unwrap_err();
        assert_eq!(err, WrapperError::UnknownOrganization { avatar });
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_forge_rejects_negative_founder_allocation() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);

        let mut options = forge_options();
        options.founders[0].tokens = Amount::from(-1i64);
        let err = creator.forge_org(&options).await.unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "founders[0].tokens"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_forge_requires_founders_and_names() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);

        let mut options = forge_options();
        options.founders.clear();
        assert!(matches!(
            creator.forge_org(&options).await.unwrap_err(),
            WrapperError::MissingParameter { field } if field == "founders"
        ));

        let mut options = forge_options();
        options.token_symbol = "  ".to_string();
        assert!(matches!(
            creator.forge_org(&options).await.unwrap_err(),
            WrapperError::MissingParameter { field } if field == "token_symbol"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_forge_without_new_org_event_fails_correlation() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);
        provider.enqueue_success(vec![]);

        let err = creator.forge_org(&forge_options()).await.unwrap_err();
        assert!(matches!(
            err,
            WrapperError::EventNotFound { event, .. } if event == "NewOrg"
        ));
    }

    #[tokio::test]
    async fn test_invalid_scheme_params_abort_batch_before_submission() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);
        let avatar = forged(&creator, &provider).await;

        let bad = SchemeRegistration::new(
            ContractKind::GenesisProtocol,
            Address::from([0xee; 20]),
            GenesisProtocolParams {
                voters_reputation_loss_ratio: Amount::from(250u64),
                ..GenesisProtocolParams::default()
            }
            .input(),
        );
        let err = creator
            .set_schemes(avatar, &[voting_scheme(), bad])
            .await
            .unwrap_err();
        assert!(matches!(err, WrapperError::InvalidParameter { .. }));
        // only the forge transaction went out
        assert_eq!(provider.submissions().len(), 1);

        // the failed attempt did not consume the one-shot
        provider.enqueue_success(vec![schemes_set_log(creator.address(), avatar)]);
        assert!(creator.set_schemes(avatar, &[voting_scheme()]).await.is_ok());
    }

    #[tokio::test]
    async fn test_contract_revert_not_masked() {
        let provider = Arc::new(MockProvider::new());
        let creator = creator(&provider);
        let avatar = forged(&creator, &provider).await;

        provider.enqueue_revert(Some("sender is not the org lock owner"));
        let err = creator
            .set_schemes(avatar, &[voting_scheme()])
            .await
            .unwrap_err();
        assert!(matches!(err, WrapperError::Reverted { .. }));

        // a reverted attempt leaves the organization configurable
        provider.enqueue_success(vec![schemes_set_log(creator.address(), avatar)]);
        assert!(creator.set_schemes(avatar, &[voting_scheme()]).await.is_ok());
    }
}
