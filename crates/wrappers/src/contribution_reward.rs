// Copyright (C) 2024-2026 The dao-rs contributors.
//
// contribution_reward.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Typed facade over the ContributionReward scheme.
//!
//! Proposes periodic rewards (reputation, native token, ether, or an
//! external token) to a beneficiary, to be granted when the
//! organization's voting machine approves the proposal.

use crate::binding::{extract_bytes32, ContractBinding, SetParametersResult};
use crate::codec::{
    normalize_field, normalize_positive, require_nonzero, Constraint, ParamInput, ParamSpec,
    ParamTable,
};
use crate::error::{WrapperError, WrapperResult};
use crate::registry::{ContractKind, ContractRegistry};
use dao_abi::{
    AbiDescriptor, AbiKind, AbiValue, Amount, EventParam, EventSchema, FunctionSchema,
};
use dao_primitives::{Address, Bytes32};
use dao_rpc_client::{ChainProvider, ClientSettings, ProposalResult, TransactionResult};
use num_traits::Zero;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::info;

/// The ordered parameter table of the scheme.
pub static PARAMS: ParamTable = ParamTable {
    contract: "ContributionReward",
    specs: &[
        ParamSpec::uint("orgNativeTokenFee", Constraint::Free),
        ParamSpec::bytes32("voteApproveParams"),
        ParamSpec::address("votingMachine"),
    ],
};

static ABI: Lazy<AbiDescriptor> = Lazy::new(|| {
    AbiDescriptor::new(
        vec![
            EventSchema::new(
                "NewContributionProposal",
                vec![
                    EventParam::new("_avatar", AbiKind::Address, true),
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_descriptionHash", AbiKind::Bytes32, false),
                    EventParam::new("_beneficiary", AbiKind::Address, false),
                ],
            ),
            EventSchema::new(
                "RedeemReputation",
                vec![
                    EventParam::new("_avatar", AbiKind::Address, true),
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_beneficiary", AbiKind::Address, false),
                    EventParam::new("_amount", AbiKind::Uint, false),
                ],
            ),
            EventSchema::new(
                "RedeemNativeToken",
                vec![
                    EventParam::new("_avatar", AbiKind::Address, true),
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_beneficiary", AbiKind::Address, false),
                    EventParam::new("_amount", AbiKind::Uint, false),
                ],
            ),
            EventSchema::new(
                "RedeemEther",
                vec![
                    EventParam::new("_avatar", AbiKind::Address, true),
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_beneficiary", AbiKind::Address, false),
                    EventParam::new("_amount", AbiKind::Uint, false),
                ],
            ),
            EventSchema::new(
                "RedeemExternalToken",
                vec![
                    EventParam::new("_avatar", AbiKind::Address, true),
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_beneficiary", AbiKind::Address, false),
                    EventParam::new("_amount", AbiKind::Uint, false),
                ],
            ),
        ],
        vec![
            FunctionSchema::new(
                "setParameters",
                vec![AbiKind::Uint, AbiKind::Bytes32, AbiKind::Address],
            ),
            FunctionSchema::new(
                "proposeContributionReward",
                vec![
                    AbiKind::Address,
                    AbiKind::Bytes32,
                    AbiKind::Uint,
                    AbiKind::UintArray,
                    AbiKind::Address,
                    AbiKind::Address,
                ],
            ),
            FunctionSchema::new(
                "redeem",
                vec![
                    AbiKind::Bytes32,
                    AbiKind::Address,
                    AbiKind::Bool,
                    AbiKind::Bool,
                    AbiKind::Bool,
                    AbiKind::Bool,
                ],
            ),
        ],
    )
});

/// The SDK-facing ABI of the scheme.
#[must_use]
pub fn abi() -> &'static AbiDescriptor {
    &ABI
}

/// Configuration of the scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRewardParams {
    /// Fee in the organization's native token charged per proposal.
    pub org_native_token_fee: Amount,
    /// Voting machine configuration hash proposals run under.
    pub vote_approve_params: Bytes32,
    /// Address of the voting machine.
    pub voting_machine: Address,
}

impl ContributionRewardParams {
    /// The named-input form consumed by the parameter codec.
    #[must_use]
    pub fn input(&self) -> ParamInput {
        ParamInput::new()
            .amount("orgNativeTokenFee", self.org_native_token_fee.clone())
            .bytes32("voteApproveParams", self.vote_approve_params)
            .address("votingMachine", self.voting_machine)
    }
}

/// Inputs for proposing a periodic contribution reward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeRewardOptions {
    /// The organization granting the reward.
    pub avatar: Address,
    /// Hash of the off-chain contribution description.
    pub description_hash: Bytes32,
    /// Reputation granted (per period).
    pub reputation_change: Amount,
    /// Native token reward per period.
    pub native_token_reward: Amount,
    /// Ether reward per period, in wei.
    pub eth_reward: Amount,
    /// External token reward per period.
    pub external_token_reward: Amount,
    /// The external token contract; required when
    /// `external_token_reward` is positive.
    pub external_token: Option<Address>,
    /// Reward recipient.
    pub beneficiary: Address,
    /// Duration of one reward period, in seconds; must be positive.
    pub period_length: Amount,
    /// Number of periods; must be positive.
    pub number_of_periods: Amount,
}

/// Which reward components to redeem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeemRewardOptions {
    /// The approved proposal.
    pub proposal_id: Bytes32,
    /// The organization that granted the reward.
    pub avatar: Address,
    /// Redeem the reputation component.
    pub reputation: bool,
    /// Redeem the native token component.
    pub native_tokens: bool,
    /// Redeem the ether component.
    pub eth: bool,
    /// Redeem the external token component.
    pub external_tokens: bool,
}

impl RedeemRewardOptions {
    /// Redeems every component of the reward.
    #[must_use]
    pub fn all(proposal_id: Bytes32, avatar: Address) -> Self {
        Self {
            proposal_id,
            avatar,
            reputation: true,
            native_tokens: true,
            eth: true,
            external_tokens: true,
        }
    }
}

/// Typed facade over one deployed ContributionReward instance.
#[derive(Clone)]
pub struct ContributionReward {
    binding: ContractBinding,
}

impl ContributionReward {
    /// Binds to the scheme at a known address.
    #[must_use]
    pub fn at(
        address: Address,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            binding: ContractBinding::at(
                ContractKind::ContributionReward,
                address,
                provider,
                settings,
            ),
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
                ContractKind::ContributionReward,
                registry,
                provider,
                settings,
            )?,
        })
    }

    /// Deploys a fresh instance from the registry's bytecode.
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
                ContractKind::ContributionReward,
                registry,
                provider,
                settings,
            )
            .await?,
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

    /// Registers a configuration and returns its parameter hash.
    ///
    /// # Errors
    ///
    /// Parameter validation failures before submission,
    /// chain-interaction failures after.
    pub async fn set_parameters(
        &self,
        params: &ContributionRewardParams,
    ) -> WrapperResult<SetParametersResult> {
        require_nonzero("votingMachine", params.voting_machine)?;
        let set = PARAMS.encode(&params.input())?;
        let tx = self.binding.invoke("setParameters", &set.values()).await?;
        info!(params_hash = %set.hash(), "contribution reward configured");
        Ok(SetParametersResult {
            params_hash: set.hash(),
            tx,
        })
    }

    /// Proposes a periodic reward and correlates the proposal id from
    /// `NewContributionProposal`.
    ///
    /// # Errors
    ///
    /// - [`WrapperError::InvalidParameter`] for a zero beneficiary, a
    ///   non-positive period shape, or when every reward component is
    ///   zero, before submission.
    /// - [`WrapperError::MissingParameter`] when an external token
    ///   reward names no token contract.
    /// - [`WrapperError::EventNotFound`] when the id cannot be
    ///   correlated.
    pub async fn propose_contribution_reward(
        &self,
        options: &ProposeRewardOptions,
    ) -> WrapperResult<ProposalResult> {
        let avatar = require_nonzero("avatar", options.avatar)?;
        let beneficiary = require_nonzero("beneficiary", options.beneficiary)?;

        let reputation = normalize_field("reputation_change", &options.reputation_change)?;
        let native = normalize_field("native_token_reward", &options.native_token_reward)?;
        let eth = normalize_field("eth_reward", &options.eth_reward)?;
        let external = normalize_field("external_token_reward", &options.external_token_reward)?;
        let period_length = normalize_positive("period_length", &options.period_length)?;
        let periods = normalize_positive("number_of_periods", &options.number_of_periods)?;

        if reputation.is_zero() && native.is_zero() && eth.is_zero() && external.is_zero() {
            return Err(WrapperError::InvalidParameter {
                field: "rewards".to_string(),
                constraint: "at least one reward component must be non-zero".to_string(),
            });
        }
        let external_token = if external.is_zero() {
            options.external_token.unwrap_or_else(Address::zero)
        } else {
            options
                .external_token
                .ok_or_else(|| WrapperError::MissingParameter {
                    field: "external_token".to_string(),
                })?
        };

        let tx = self
            .binding
            .invoke(
                "proposeContributionReward",
                &[
                    AbiValue::Address(avatar),
                    AbiValue::Bytes32(options.description_hash),
                    AbiValue::Uint(reputation),
                    AbiValue::UintArray(vec![native, eth, external, period_length, periods]),
                    AbiValue::Address(external_token),
                    AbiValue::Address(beneficiary),
                ],
            )
            .await?;
        let proposal_id = extract_bytes32(&tx, "NewContributionProposal", "_proposalId")?;
        info!(%proposal_id, %avatar, "contribution reward proposed");
        Ok(ProposalResult { proposal_id, tx })
    }

    /// Redeems the selected components of an approved reward.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::InvalidParameter`] when no component is
    /// selected, before submission.
    pub async fn redeem_reward(
        &self,
        options: &RedeemRewardOptions,
    ) -> WrapperResult<TransactionResult> {
        let avatar = require_nonzero("avatar", options.avatar)?;
        if !(options.reputation || options.native_tokens || options.eth || options.external_tokens)
        {
            return Err(WrapperError::InvalidParameter {
                field: "redeem".to_string(),
                constraint: "at least one component must be selected".to_string(),
            });
        }
        self.binding
            .invoke(
                "redeem",
                &[
                    AbiValue::Bytes32(options.proposal_id),
                    AbiValue::Address(avatar),
                    AbiValue::Bool(options.reputation),
                    AbiValue::Bool(options.native_tokens),
                    AbiValue::Bool(options.eth),
                    AbiValue::Bool(options.external_tokens),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_abi::keccak256;
    use dao_rpc_client::testing::MockProvider;

    fn scheme(provider: &Arc<MockProvider>) -> ContributionReward {
        ContributionReward::at(
            Address::from([0xbb; 20]),
            provider.clone(),
            ClientSettings::default(),
        )
    }

    fn propose_options() -> ProposeRewardOptions {
        ProposeRewardOptions {
            avatar: Address::from([1u8; 20]),
            description_hash: keccak256(b"ipfs description"),
            reputation_change: Amount::from(10u64),
            native_token_reward: Amount::zero(),
            eth_reward: Amount::zero(),
            external_token_reward: Amount::zero(),
            external_token: None,
            beneficiary: Address::from([2u8; 20]),
            period_length: Amount::from(86_400u64),
            number_of_periods: Amount::from(4u64),
        }
    }

    fn proposal_log(contract: Address, proposal_id: Bytes32) -> dao_abi::RawLog {
        abi()
            .event("NewContributionProposal")
            .unwrap()
            .encode(
                contract,
                0,
                &[
                    AbiValue::Address(Address::from([1u8; 20])),
                    AbiValue::Bytes32(proposal_id),
                    AbiValue::Bytes32(keccak256(b"ipfs description")),
                    AbiValue::Address(Address::from([2u8; 20])),
                ],
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_parameters_hash_matches_table() {
        let provider = Arc::new(MockProvider::new());
        provider.enqueue_success(vec![]);
        let scheme = scheme(&provider);

        let params = ContributionRewardParams {
            org_native_token_fee: Amount::zero(),
            vote_approve_params: keccak256(b"vote params"),
            voting_machine: Address::from([3u8; 20]),
        };
        let result = scheme.set_parameters(&params).await.unwrap();
        assert_eq!(
            result.params_hash,
            PARAMS.encode(&params.input()).unwrap().hash()
        );
    }

    #[tokio::test]
    async fn test_propose_correlates_proposal_id() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);
        let proposal_id = keccak256(b"reward-1");
        provider.enqueue_success(vec![proposal_log(scheme.address(), proposal_id)]);

        let result = scheme
            .propose_contribution_reward(&propose_options())
            .await
            .unwrap();
        assert_eq!(result.proposal_id, proposal_id);
    }

    #[tokio::test]
    async fn test_propose_rejects_all_zero_rewards() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);

        let mut options = propose_options();
        options.reputation_change = Amount::zero();
        let err = scheme
            .propose_contribution_reward(&options)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "rewards"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_propose_requires_token_for_external_reward() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);

        let mut options = propose_options();
        options.external_token_reward = Amount::from(5u64);
        let err = scheme
            .propose_contribution_reward(&options)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::MissingParameter { field } if field == "external_token"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_propose_rejects_zero_period_length() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);

        let mut options = propose_options();
        options.period_length = Amount::zero();
        let err = scheme
            .propose_contribution_reward(&options)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "period_length"
        ));
    }

    #[tokio::test]
    async fn test_redeem_requires_a_component() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);

        let mut options =
            RedeemRewardOptions::all(keccak256(b"reward-1"), Address::from([1u8; 20]));
        options.reputation = false;
        options.native_tokens = false;
        options.eth = false;
        options.external_tokens = false;
        let err = scheme.redeem_reward(&options).await.unwrap_err();
        assert!(matches!(err, WrapperError::InvalidParameter { .. }));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_redeem_submits_selected_components() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);
        provider.enqueue_success(vec![]);

        scheme
            .redeem_reward(&RedeemRewardOptions::all(
                keccak256(b"reward-1"),
                Address::from([1u8; 20]),
            ))
            .await
            .unwrap();
        let data = &provider.submissions()[0].data;
        assert_eq!(
            &data[..4],
            &dao_abi::selector("redeem(bytes32,address,bool,bool,bool,bool)")
        );
    }
}
