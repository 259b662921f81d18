// Copyright (C) 2024-2026 The dao-rs contributors.
//
// genesis_protocol.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Typed facade over the GenesisProtocol voting machine.
//!
//! GenesisProtocol is a binary voting machine: choice 1 is yes, choice
//! 2 is no. Proposals are identified by the 32-byte id correlated from
//! the `NewProposal` event, and a configuration is referenced by the
//! parameter hash of its twelve-field table.

use crate::binding::{extract_bytes32, ContractBinding, SetParametersResult};
use crate::codec::{normalize_positive, require_nonzero, Constraint, ParamSpec, ParamTable};
use crate::error::{WrapperError, WrapperResult};
use crate::registry::{ContractKind, ContractRegistry};
use dao_abi::{
    AbiDescriptor, AbiError, AbiKind, AbiValue, Amount, EventParam, EventSchema, FunctionSchema,
};
use dao_primitives::{Address, Bytes32};
use dao_rpc_client::{ChainProvider, ClientSettings, ProposalResult, TransactionResult};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::info;

/// Vote choice for "yes".
pub const VOTE_YES: u32 = 1;
/// Vote choice for "no".
pub const VOTE_NO: u32 = 2;

/// The ordered parameter table of the voting machine.
pub static PARAMS: ParamTable = ParamTable {
    contract: "GenesisProtocol",
    specs: &[
        ParamSpec::uint(
            "preBoostedVoteRequiredPercentage",
            Constraint::Range { min: 1, max: 100 },
        ),
        ParamSpec::uint("preBoostedVotePeriodLimit", Constraint::Positive),
        ParamSpec::uint("boostedVotePeriodLimit", Constraint::Positive),
        ParamSpec::uint("thresholdConstA", Constraint::Free),
        ParamSpec::uint("thresholdConstB", Constraint::Positive),
        ParamSpec::uint("minimumStakingFee", Constraint::Free),
        ParamSpec::uint("quietEndingPeriod", Constraint::Free),
        ParamSpec::uint("proposingRepRewardConstA", Constraint::Free),
        ParamSpec::uint("proposingRepRewardConstB", Constraint::Free),
        ParamSpec::uint("stakerFeeRatioForVoters", Constraint::Percentage),
        ParamSpec::uint("votersReputationLossRatio", Constraint::Percentage),
        ParamSpec::uint("votersGainRepRatioFromLostRep", Constraint::Percentage),
    ],
};

static ABI: Lazy<AbiDescriptor> = Lazy::new(|| {
    AbiDescriptor::new(
        vec![
            EventSchema::new(
                "NewProposal",
                vec![
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_proposer", AbiKind::Address, true),
                    EventParam::new("_numOfChoices", AbiKind::Uint, false),
                    EventParam::new("_paramsHash", AbiKind::Bytes32, false),
                ],
            ),
            EventSchema::new(
                "VoteProposal",
                vec![
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_voter", AbiKind::Address, true),
                    EventParam::new("_vote", AbiKind::Uint, false),
                    EventParam::new("_reputation", AbiKind::Uint, false),
                ],
            ),
            EventSchema::new(
                "Stake",
                vec![
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_staker", AbiKind::Address, true),
                    EventParam::new("_vote", AbiKind::Uint, false),
                    EventParam::new("_amount", AbiKind::Uint, false),
                ],
            ),
            EventSchema::new(
                "Redeem",
                vec![
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_beneficiary", AbiKind::Address, true),
                    EventParam::new("_amount", AbiKind::Uint, false),
                ],
            ),
            EventSchema::new(
                "ExecuteProposal",
                vec![
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_decision", AbiKind::Uint, false),
                ],
            ),
        ],
        vec![
            FunctionSchema::new("setParameters", vec![AbiKind::UintArray]),
            FunctionSchema::new(
                "propose",
                vec![
                    AbiKind::Uint,
                    AbiKind::Bytes32,
                    AbiKind::Address,
                    AbiKind::Address,
                ],
            ),
            FunctionSchema::new("vote", vec![AbiKind::Bytes32, AbiKind::Uint]),
            FunctionSchema::new(
                "stake",
                vec![AbiKind::Bytes32, AbiKind::Uint, AbiKind::Uint],
            ),
            FunctionSchema::new("redeem", vec![AbiKind::Bytes32, AbiKind::Address]),
        ],
    )
});

/// The SDK-facing ABI of the voting machine.
#[must_use]
pub fn abi() -> &'static AbiDescriptor {
    &ABI
}

/// The twelve-field voting machine configuration.
///
/// Defaults mirror the conventional deployment values; durations are in
/// seconds, ratios in whole percentage points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisProtocolParams {
    /// Percentage of total reputation required to pass in the
    /// pre-boosted phase.
    pub pre_boosted_vote_required_percentage: Amount,
    /// Maximum duration of the pre-boosted phase.
    pub pre_boosted_vote_period_limit: Amount,
    /// Duration of the boosted phase.
    pub boosted_vote_period_limit: Amount,
    /// Boost threshold curve constant A.
    pub threshold_const_a: Amount,
    /// Boost threshold curve constant B.
    pub threshold_const_b: Amount,
    /// Minimum fee a staker must attach.
    pub minimum_staking_fee: Amount,
    /// Window at the end of voting in which a flipped outcome extends
    /// the vote.
    pub quiet_ending_period: Amount,
    /// Proposer reputation reward constant A.
    pub proposing_rep_reward_const_a: Amount,
    /// Proposer reputation reward constant B.
    pub proposing_rep_reward_const_b: Amount,
    /// Share of staking fees distributed to voters.
    pub staker_fee_ratio_for_voters: Amount,
    /// Share of reputation a losing voter forfeits.
    pub voters_reputation_loss_ratio: Amount,
    /// Share of forfeited reputation redistributed to winning voters.
    pub voters_gain_rep_ratio_from_lost_rep: Amount,
}

impl Default for GenesisProtocolParams {
    fn default() -> Self {
        Self {
            pre_boosted_vote_required_percentage: Amount::from(50u64),
            pre_boosted_vote_period_limit: Amount::from(5_184_000u64),
            boosted_vote_period_limit: Amount::from(604_800u64),
            threshold_const_a: Amount::from(7u64),
            threshold_const_b: Amount::from(3u64),
            minimum_staking_fee: Amount::zero(),
            quiet_ending_period: Amount::from(7_200u64),
            proposing_rep_reward_const_a: Amount::from(5u64),
            proposing_rep_reward_const_b: Amount::from(5u64),
            staker_fee_ratio_for_voters: Amount::from(50u64),
            voters_reputation_loss_ratio: Amount::from(1u64),
            voters_gain_rep_ratio_from_lost_rep: Amount::from(80u64),
        }
    }
}

impl GenesisProtocolParams {
    /// The named-input form consumed by the parameter codec.
    #[must_use]
    pub fn input(&self) -> crate::codec::ParamInput {
        crate::codec::ParamInput::new()
            .amount(
                "preBoostedVoteRequiredPercentage",
                self.pre_boosted_vote_required_percentage.clone(),
            )
            .amount(
                "preBoostedVotePeriodLimit",
                self.pre_boosted_vote_period_limit.clone(),
            )
            .amount(
                "boostedVotePeriodLimit",
                self.boosted_vote_period_limit.clone(),
            )
            .amount("thresholdConstA", self.threshold_const_a.clone())
            .amount("thresholdConstB", self.threshold_const_b.clone())
            .amount("minimumStakingFee", self.minimum_staking_fee.clone())
            .amount("quietEndingPeriod", self.quiet_ending_period.clone())
            .amount(
                "proposingRepRewardConstA",
                self.proposing_rep_reward_const_a.clone(),
            )
            .amount(
                "proposingRepRewardConstB",
                self.proposing_rep_reward_const_b.clone(),
            )
            .amount(
                "stakerFeeRatioForVoters",
                self.staker_fee_ratio_for_voters.clone(),
            )
            .amount(
                "votersReputationLossRatio",
                self.voters_reputation_loss_ratio.clone(),
            )
            .amount(
                "votersGainRepRatioFromLostRep",
                self.voters_gain_rep_ratio_from_lost_rep.clone(),
            )
    }
}

/// Inputs for creating a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeOptions {
    /// The organization the proposal belongs to.
    pub avatar: Address,
    /// Number of voting choices; binary (2) for this machine.
    pub num_choices: u32,
    /// Hash of the configuration the proposal runs under.
    pub params_hash: Bytes32,
    /// Contract executed when the proposal passes.
    pub executable: Address,
}

impl ProposeOptions {
    /// A binary proposal under the given configuration.
    #[must_use]
    pub fn new(avatar: Address, params_hash: Bytes32, executable: Address) -> Self {
        Self {
            avatar,
            num_choices: 2,
            params_hash,
            executable,
        }
    }
}

/// Inputs for casting a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOptions {
    /// The proposal voted on.
    pub proposal_id: Bytes32,
    /// [`VOTE_YES`] or [`VOTE_NO`].
    pub vote: u32,
}

/// Inputs for staking on a predicted outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeOptions {
    /// The proposal staked on.
    pub proposal_id: Bytes32,
    /// The predicted outcome, [`VOTE_YES`] or [`VOTE_NO`].
    pub vote: u32,
    /// Stake amount in the smallest token unit; must be positive.
    pub amount: Amount,
}

/// Inputs for redeeming accrued rewards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemOptions {
    /// The settled proposal.
    pub proposal_id: Bytes32,
    /// Account whose rewards are redeemed.
    pub beneficiary: Address,
}

/// Typed facade over one deployed GenesisProtocol instance.
#[derive(Clone)]
pub struct GenesisProtocol {
    binding: ContractBinding,
}

impl GenesisProtocol {
    /// Binds to the voting machine at a known address.
    #[must_use]
    pub fn at(
        address: Address,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            binding: ContractBinding::at(
                ContractKind::GenesisProtocol,
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
                ContractKind::GenesisProtocol,
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
                ContractKind::GenesisProtocol,
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

    /// Registers a configuration and returns the hash under which it is
    /// addressable. The hash is derived locally from the canonical
    /// encoding; the contract derives the identical value.
    ///
    /// # Errors
    ///
    /// Parameter validation failures before submission,
    /// chain-interaction failures after.
    pub async fn set_parameters(
        &self,
        params: &GenesisProtocolParams,
    ) -> WrapperResult<SetParametersResult> {
        let set = PARAMS.encode(&params.input())?;
        let ordered = uint_words(set.values())?;
        let tx = self
            .binding
            .invoke("setParameters", &[AbiValue::UintArray(ordered)])
            .await?;
        info!(params_hash = %set.hash(), "voting machine configured");
        Ok(SetParametersResult {
            params_hash: set.hash(),
            tx,
        })
    }

    /// Creates a proposal and correlates its id from the `NewProposal`
    /// event.
    ///
    /// # Errors
    ///
    /// - [`WrapperError::InvalidParameter`] for a zero avatar or a
    ///   choice count outside 1..=10, before submission.
    /// - [`WrapperError::EventNotFound`] when the id cannot be
    ///   correlated from a successful transaction.
    pub async fn propose(&self, options: ProposeOptions) -> WrapperResult<ProposalResult> {
        let avatar = require_nonzero("avatar", options.avatar)?;
        if options.num_choices == 0 || options.num_choices > 10 {
            return Err(WrapperError::InvalidParameter {
                field: "num_choices".to_string(),
                constraint: "must be between 1 and 10".to_string(),
            });
        }
        let tx = self
            .binding
            .invoke(
                "propose",
                &[
                    AbiValue::from(u64::from(options.num_choices)),
                    AbiValue::Bytes32(options.params_hash),
                    AbiValue::Address(avatar),
                    AbiValue::Address(options.executable),
                ],
            )
            .await?;
        let proposal_id = extract_bytes32(&tx, "NewProposal", "_proposalId")?;
        info!(%proposal_id, %avatar, "proposal created");
        Ok(ProposalResult { proposal_id, tx })
    }

    /// Casts a vote with the caller's full reputation.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::InvalidParameter`] for a vote other than
    /// 1 or 2, before submission.
    pub async fn vote(&self, options: VoteOptions) -> WrapperResult<TransactionResult> {
        check_vote(options.vote)?;
        check_proposal_id(options.proposal_id)?;
        self.binding
            .invoke(
                "vote",
                &[
                    AbiValue::Bytes32(options.proposal_id),
                    AbiValue::from(u64::from(options.vote)),
                ],
            )
            .await
    }

    /// Stakes tokens on a predicted outcome.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::InvalidParameter`] for a vote other than
    /// 1 or 2, or a zero or negative amount, before submission.
    pub async fn stake(&self, options: StakeOptions) -> WrapperResult<TransactionResult> {
        check_vote(options.vote)?;
        check_proposal_id(options.proposal_id)?;
        let amount = normalize_positive("amount", &options.amount)?;
        self.binding
            .invoke(
                "stake",
                &[
                    AbiValue::Bytes32(options.proposal_id),
                    AbiValue::from(u64::from(options.vote)),
                    AbiValue::Uint(amount),
                ],
            )
            .await
    }

    /// Redeems accrued staking and voting rewards for a settled
    /// proposal.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::InvalidParameter`] for a zero
    /// beneficiary, before submission.
    pub async fn redeem(&self, options: RedeemOptions) -> WrapperResult<TransactionResult> {
        check_proposal_id(options.proposal_id)?;
        let beneficiary = require_nonzero("beneficiary", options.beneficiary)?;
        self.binding
            .invoke(
                "redeem",
                &[
                    AbiValue::Bytes32(options.proposal_id),
                    AbiValue::Address(beneficiary),
                ],
            )
            .await
    }
}

/// Flattens an encoded parameter tuple into the `uint256[]` that
/// `setParameters` takes. Every field of [`PARAMS`] is a uint; any
/// other kind is a table/calldata mismatch.
fn uint_words(values: Vec<AbiValue>) -> WrapperResult<Vec<BigUint>> {
    values
        .into_iter()
        .map(|value| match value {
            AbiValue::Uint(word) => Ok(word),
            other => Err(WrapperError::Encoding(AbiError::TypeMismatch {
                expected: AbiKind::Uint,
                actual: other.kind(),
            })),
        })
        .collect()
}

fn check_vote(vote: u32) -> WrapperResult<()> {
    if vote != VOTE_YES && vote != VOTE_NO {
        return Err(WrapperError::InvalidParameter {
            field: "vote".to_string(),
            constraint: "must be 1 (yes) or 2 (no)".to_string(),
        });
    }
    Ok(())
}

fn check_proposal_id(proposal_id: Bytes32) -> WrapperResult<()> {
    if proposal_id.is_zero() {
        return Err(WrapperError::InvalidParameter {
            field: "proposal_id".to_string(),
            constraint: "must not be zero".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_abi::keccak256;
    use dao_rpc_client::testing::MockProvider;

    fn machine(provider: &Arc<MockProvider>) -> GenesisProtocol {
        GenesisProtocol::at(
            Address::from([0xaa; 20]),
            provider.clone(),
            ClientSettings::default(),
        )
    }

    fn proposal_log(contract: Address, proposal_id: Bytes32) -> dao_abi::RawLog {
        abi()
            .event("NewProposal")
            .unwrap()
            .encode(
                contract,
                0,
                &[
                    AbiValue::Bytes32(proposal_id),
                    AbiValue::Address(Address::from([0x11; 20])),
                    AbiValue::from(2u64),
                    AbiValue::Bytes32(keccak256(b"params")),
                ],
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_parameters_returns_canonical_hash() {
        let provider = Arc::new(MockProvider::new());
        provider.enqueue_success(vec![]);
        provider.enqueue_success(vec![]);
        let machine = machine(&provider);

        let params = GenesisProtocolParams::default();
        let first = machine.set_parameters(&params).await.unwrap();
        let second = machine.set_parameters(&params).await.unwrap();
        assert_eq!(first.params_hash, second.params_hash);
        assert!(!first.params_hash.is_zero());

        let expected = PARAMS.encode(&params.input()).unwrap().hash();
        assert_eq!(first.params_hash, expected);
    }

    #[test]
    fn test_uint_words_rejects_non_uint_value() {
        let words = uint_words(vec![AbiValue::from(7u64), AbiValue::from(3u64)]).unwrap();
        assert_eq!(words, vec![BigUint::from(7u64), BigUint::from(3u64)]);

        let err = uint_words(vec![AbiValue::from(7u64), AbiValue::Bool(true)]).unwrap_err();
        assert!(matches!(
            err,
            WrapperError::Encoding(AbiError::TypeMismatch {
                expected: AbiKind::Uint,
                actual: AbiKind::Bool,
            })
        ));
    }

    #[tokio::test]
    async fn test_set_parameters_rejects_bad_percentage_before_submission() {
        let provider = Arc::new(MockProvider::new());
        let machine = machine(&provider);

        let params = GenesisProtocolParams {
            staker_fee_ratio_for_voters: Amount::from(101u64),
            ..GenesisProtocolParams::default()
        };
        let err = machine.set_parameters(&params).await.unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "stakerFeeRatioForVoters"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_propose_correlates_proposal_id() {
        let provider = Arc::new(MockProvider::new());
        let machine = machine(&provider);
        let proposal_id = keccak256(b"proposal-1");
        provider.enqueue_success(vec![proposal_log(machine.address(), proposal_id)]);

        let result = machine
            .propose(ProposeOptions::new(
                Address::from([1u8; 20]),
                keccak256(b"params"),
                Address::from([2u8; 20]),
            ))
            .await
            .unwrap();
        assert_eq!(result.proposal_id, proposal_id);
    }

    #[tokio::test]
    async fn test_propose_without_event_fails_correlation() {
        let provider = Arc::new(MockProvider::new());
        let machine = machine(&provider);
        provider.enqueue_success(vec![]);

        let err = machine
            .propose(ProposeOptions::new(
                Address::from([1u8; 20]),
                keccak256(b"params"),
                Address::from([2u8; 20]),
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::EventNotFound { event, .. } if event == "NewProposal"
        ));
    }

    #[tokio::test]
    async fn test_vote_rejects_out_of_range_choice() {
        let provider = Arc::new(MockProvider::new());
        let machine = machine(&provider);

        let err = machine
            .vote(VoteOptions {
                proposal_id: keccak256(b"p"),
                vote: 3,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "vote"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_stake_rejects_zero_amount() {
        let provider = Arc::new(MockProvider::new());
        let machine = machine(&provider);

        let err = machine
            .stake(StakeOptions {
                proposal_id: keccak256(b"p"),
                vote: VOTE_YES,
                amount: Amount::zero(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "amount"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_stake_submits_for_valid_input() {
        let provider = Arc::new(MockProvider::new());
        let machine = machine(&provider);
        provider.enqueue_success(vec![]);

        machine
            .stake(StakeOptions {
                proposal_id: keccak256(b"p"),
                vote: VOTE_NO,
                amount: Amount::from("1000000"),
            })
            .await
            .unwrap();
        assert_eq!(provider.submissions().len(), 1);
        let data = &provider.submissions()[0].data;
        assert_eq!(
            &data[..4],
            &dao_abi::selector("stake(bytes32,uint256,uint256)")
        );
    }

    #[tokio::test]
    async fn test_redeem_surfaces_revert() {
        let provider = Arc::new(MockProvider::new());
        let machine = machine(&provider);
        provider.enqueue_revert(Some("proposal not executed"));

        let err = machine
            .redeem(RedeemOptions {
                proposal_id: keccak256(b"p"),
                beneficiary: Address::from([4u8; 20]),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WrapperError::Reverted {
                reason: Some("proposal not executed".to_string())
            }
        );
    }
}
