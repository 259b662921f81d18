// Copyright (C) 2024-2026 The dao-rs contributors.
//
// vesting.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Typed facade over the token vesting scheme.
//!
//! Vesting agreements release tokens to a beneficiary in fixed periods
//! after a cliff, and can be cancelled before the cliff by a quorum of
//! designated signers. Agreements are identified by the numeric id
//! correlated from the `NewVestedAgreement` event.

use crate::binding::{ContractBinding, SetParametersResult};
use crate::codec::{
    normalize_field, normalize_positive, require_nonzero, ParamInput, ParamSpec, ParamTable,
};
use crate::error::{WrapperError, WrapperResult};
use crate::registry::{ContractKind, ContractRegistry};
use dao_abi::{
    AbiDescriptor, AbiKind, AbiValue, Amount, EventParam, EventSchema, FunctionSchema,
};
use dao_primitives::{Address, Bytes32};
use dao_rpc_client::{extract, ChainProvider, ClientSettings, TransactionResult};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::info;

/// The ordered parameter table of the scheme.
pub static PARAMS: ParamTable = ParamTable {
    contract: "VestingScheme",
    specs: &[
        ParamSpec::bytes32("voteParams"),
        ParamSpec::address("votingMachine"),
    ],
};

static ABI: Lazy<AbiDescriptor> = Lazy::new(|| {
    AbiDescriptor::new(
        vec![
            EventSchema::new(
                "NewVestedAgreement",
                vec![EventParam::new("_agreementId", AbiKind::Uint, true)],
            ),
            EventSchema::new(
                "SignToCancelAgreement",
                vec![
                    EventParam::new("_agreementId", AbiKind::Uint, true),
                    EventParam::new("_signer", AbiKind::Address, true),
                ],
            ),
            EventSchema::new(
                "AgreementCancel",
                vec![EventParam::new("_agreementId", AbiKind::Uint, true)],
            ),
            EventSchema::new(
                "Collect",
                vec![EventParam::new("_agreementId", AbiKind::Uint, true)],
            ),
        ],
        vec![
            FunctionSchema::new(
                "setParameters",
                vec![AbiKind::Bytes32, AbiKind::Address],
            ),
            FunctionSchema::new(
                "createVestedAgreement",
                vec![
                    AbiKind::Address,
                    AbiKind::Address,
                    AbiKind::Address,
                    AbiKind::Uint,
                    AbiKind::Uint,
                    AbiKind::Uint,
                    AbiKind::Uint,
                    AbiKind::Uint,
                    AbiKind::Uint,
                    AbiKind::AddressArray,
                ],
            ),
            FunctionSchema::new("signToCancelAgreement", vec![AbiKind::Uint]),
            FunctionSchema::new("collect", vec![AbiKind::Uint]),
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
pub struct VestingParams {
    /// Voting machine configuration hash proposals run under.
    pub vote_params: Bytes32,
    /// Address of the voting machine.
    pub voting_machine: Address,
}

impl VestingParams {
    /// The named-input form consumed by the parameter codec.
    #[must_use]
    pub fn input(&self) -> ParamInput {
        ParamInput::new()
            .bytes32("voteParams", self.vote_params)
            .address("votingMachine", self.voting_machine)
    }
}

/// Inputs for creating a vesting agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVestingOptions {
    /// Token under vesting.
    pub token: Address,
    /// Recipient of the vested tokens.
    pub beneficiary: Address,
    /// Where tokens return if the agreement is cancelled.
    pub return_on_cancel: Address,
    /// Block at which vesting starts.
    pub starting_block: Amount,
    /// Tokens released per period; must be positive.
    pub amount_per_period: Amount,
    /// Blocks per period; must be positive.
    pub period_length: Amount,
    /// Number of agreed periods; must be positive.
    pub number_of_periods: Amount,
    /// Periods before the first release.
    pub cliff_in_periods: Amount,
    /// Signatures required to cancel; at most the signer count.
    pub signatures_to_cancel: Amount,
    /// Accounts allowed to sign a cancellation.
    pub signers: Vec<Address>,
}

/// A created vesting agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VestedAgreement {
    /// Numeric agreement id, correlated from `NewVestedAgreement`.
    pub agreement_id: BigUint,
    /// The underlying transaction result.
    pub tx: TransactionResult,
}

/// Typed facade over one deployed vesting scheme instance.
#[derive(Clone)]
pub struct VestingScheme {
    binding: ContractBinding,
}

impl VestingScheme {
    /// Binds to the scheme at a known address.
    #[must_use]
    pub fn at(
        address: Address,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            binding: ContractBinding::at(
                ContractKind::VestingScheme,
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
                ContractKind::VestingScheme,
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
                ContractKind::VestingScheme,
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
        params: &VestingParams,
    ) -> WrapperResult<SetParametersResult> {
        require_nonzero("votingMachine", params.voting_machine)?;
        let set = PARAMS.encode(&params.input())?;
        let tx = self.binding.invoke("setParameters", &set.values()).await?;
        info!(params_hash = %set.hash(), "vesting scheme configured");
        Ok(SetParametersResult {
            params_hash: set.hash(),
            tx,
        })
    }

    /// Creates a vesting agreement and correlates its numeric id from
    /// `NewVestedAgreement`.
    ///
    /// # Errors
    ///
    /// - [`WrapperError::InvalidParameter`] for zero addresses, a
    ///   non-positive vesting shape, or a cancellation quorum larger
    ///   than the signer list, before submission.
    /// - [`WrapperError::EventNotFound`] when the id cannot be
    ///   correlated.
    pub async fn create_vesting_agreement(
        &self,
        options: &CreateVestingOptions,
    ) -> WrapperResult<VestedAgreement> {
        let token = require_nonzero("token", options.token)?;
        let beneficiary = require_nonzero("beneficiary", options.beneficiary)?;
        let return_on_cancel = require_nonzero("return_on_cancel", options.return_on_cancel)?;
        let starting_block = normalize_field("starting_block", &options.starting_block)?;
        let amount_per_period =
            normalize_positive("amount_per_period", &options.amount_per_period)?;
        let period_length = normalize_positive("period_length", &options.period_length)?;
        let periods = normalize_positive("number_of_periods", &options.number_of_periods)?;
        let cliff = normalize_field("cliff_in_periods", &options.cliff_in_periods)?;
        let signatures = normalize_field("signatures_to_cancel", &options.signatures_to_cancel)?;

        if signatures > BigUint::from(options.signers.len()) {
            return Err(WrapperError::InvalidParameter {
                field: "signatures_to_cancel".to_string(),
                constraint: "must not exceed the number of signers".to_string(),
            });
        }
        for (i, signer) in options.signers.iter().enumerate() {
            require_nonzero(&format!("signers[{i}]"), *signer)?;
        }

        let tx = self
            .binding
            .invoke(
                "createVestedAgreement",
                &[
                    AbiValue::Address(token),
                    AbiValue::Address(beneficiary),
                    AbiValue::Address(return_on_cancel),
                    AbiValue::Uint(starting_block),
                    AbiValue::Uint(amount_per_period),
                    AbiValue::Uint(period_length),
                    AbiValue::Uint(periods),
                    AbiValue::Uint(cliff),
                    AbiValue::Uint(signatures),
                    AbiValue::AddressArray(options.signers.clone()),
                ],
            )
            .await?;
        let agreement_id = extract_agreement_id(&tx)?;
        info!(%agreement_id, %beneficiary, "vesting agreement created");
        Ok(VestedAgreement { agreement_id, tx })
    }

    /// Signs towards cancelling an agreement before its cliff.
    ///
    /// # Errors
    ///
    /// Chain-interaction failures, classified per [`WrapperError`].
    pub async fn sign_to_cancel(
        &self,
        agreement_id: &BigUint,
    ) -> WrapperResult<TransactionResult> {
        self.binding
            .invoke(
                "signToCancelAgreement",
                &[AbiValue::Uint(agreement_id.clone())],
            )
            .await
    }

    /// Collects every period vested so far.
    ///
    /// # Errors
    ///
    /// Chain-interaction failures, classified per [`WrapperError`].
    pub async fn collect(&self, agreement_id: &BigUint) -> WrapperResult<TransactionResult> {
        self.binding
            .invoke("collect", &[AbiValue::Uint(agreement_id.clone())])
            .await
    }
}

fn extract_agreement_id(tx: &TransactionResult) -> WrapperResult<BigUint> {
    let value = extract(tx, "NewVestedAgreement", "_agreementId", None)?;
    value
        .as_uint()
        .cloned()
        .ok_or_else(|| WrapperError::EventNotFound {
            event: "NewVestedAgreement".to_string(),
            reason: "argument '_agreementId' is not an unsigned integer".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_rpc_client::testing::MockProvider;

    fn scheme(provider: &Arc<MockProvider>) -> VestingScheme {
        VestingScheme::at(
            Address::from([0xfe; 20]),
            provider.clone(),
            ClientSettings::default(),
        )
    }

    fn create_options() -> CreateVestingOptions {
        CreateVestingOptions {
            token: Address::from([1u8; 20]),
            beneficiary: Address::from([2u8; 20]),
            return_on_cancel: Address::from([3u8; 20]),
            starting_block: Amount::from(100u64),
            amount_per_period: Amount::from(1_000u64),
            period_length: Amount::from(10u64),
            number_of_periods: Amount::from(12u64),
            cliff_in_periods: Amount::from(3u64),
            signatures_to_cancel: Amount::from(2u64),
            signers: vec![Address::from([4u8; 20]), Address::from([5u8; 20])],
        }
    }

    fn agreement_log(contract: Address, id: u64) -> dao_abi::RawLog {
        abi()
            .event("NewVestedAgreement")
            .unwrap()
            .encode(contract, 0, &[AbiValue::from(id)])
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_correlates_agreement_id() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);
        provider.enqueue_success(vec![agreement_log(scheme.address(), 7)]);

        let agreement = scheme
            .create_vesting_agreement(&create_options())
            .await
            .unwrap();
        assert_eq!(agreement.agreement_id, BigUint::from(7u64));
    }

    #[tokio::test]
    async fn test_create_takes_last_agreement_when_several_emitted() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);
        provider.enqueue_success(vec![
            agreement_log(scheme.address(), 7),
            agreement_log(scheme.address(), 8),
        ]);

        let agreement = scheme
            .create_vesting_agreement(&create_options())
            .await
            .unwrap();
        assert_eq!(agreement.agreement_id, BigUint::from(8u64));
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_cancellation_quorum() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);

        let mut options = create_options();
        options.signatures_to_cancel = Amount::from(3u64);
        let err = scheme
            .create_vesting_agreement(&options)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "signatures_to_cancel"
        ));
        assert!(provider.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_zero_amount_per_period() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);

        let mut options = create_options();
        options.amount_per_period = Amount::zero();
        let err = scheme
            .create_vesting_agreement(&options)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "amount_per_period"
        ));
    }

    #[tokio::test]
    async fn test_collect_submits_agreement_id() {
        let provider = Arc::new(MockProvider::new());
        let scheme = scheme(&provider);
        provider.enqueue_success(vec![]);

        scheme.collect(&BigUint::from(7u64)).await.unwrap();
        let data = &provider.submissions()[0].data;
        assert_eq!(&data[..4], &dao_abi::selector("collect(uint256)"));
        assert_eq!(data[4 + 31], 7);
    }
}
