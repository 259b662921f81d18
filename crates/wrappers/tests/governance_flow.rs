// Copyright (C) 2024-2026 The dao-rs contributors.
//
// governance_flow.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! End-to-end governance flow over the in-memory provider: forge an
//! organization, register its initial schemes, run a proposal through
//! the voting machine, and redeem.

use dao_abi::{keccak256, AbiValue, Amount};
use dao_primitives::Address;
use dao_rpc_client::testing::MockProvider;
use dao_rpc_client::ClientSettings;
use dao_wrappers::{
    dao_creator, genesis_protocol, ContractKind, ContractRegistry, DaoCreator, ForgeOrgOptions,
    FounderSpec, GenesisProtocol, GenesisProtocolParams, ProposeOptions, RedeemOptions,
    SchemeRegistration, StakeOptions, VoteOptions, VOTE_YES,
};
use std::sync::Arc;

fn registry() -> ContractRegistry {
    let mut registry = ContractRegistry::new();
    registry.register_address(ContractKind::DaoCreator, Address::from([0xc0; 20]));
    registry.register_address(ContractKind::GenesisProtocol, Address::from([0xc1; 20]));
    registry
}

#[tokio::test]
async fn test_forge_configure_and_run_a_proposal() {
    let provider = Arc::new(MockProvider::new());
    let registry = registry();
    let settings = ClientSettings::default();

    let creator = DaoCreator::deployed(&registry, provider.clone(), settings.clone()).unwrap();
    let machine =
        GenesisProtocol::deployed(&registry, provider.clone(), settings.clone()).unwrap();

    // Forge the organization.
    let avatar = Address::from([0xab; 20]);
    provider.enqueue_success(vec![dao_creator::abi()
        .event("NewOrg")
        .unwrap()
        .encode(creator.address(), 0, &[AbiValue::Address(avatar)])
        .unwrap()]);
    let forged = creator
        .forge_org(&ForgeOrgOptions {
            name: "Genesis".to_string(),
            token_name: "Genesis Token".to_string(),
            token_symbol: "GEN".to_string(),
            founders: vec![
                FounderSpec {
                    address: Address::from([1u8; 20]),
                    tokens: Amount::from(1_000u64),
                    reputation: Amount::from(1_000u64),
                },
                FounderSpec {
                    address: Address::from([2u8; 20]),
                    tokens: Amount::from("500"),
                    reputation: Amount::from(500u64),
                },
            ],
            token_cap: Amount::zero(),
        })
        .await
        .unwrap();
    assert_eq!(forged.avatar, avatar);

    // Configure the voting machine and register it as the initial
    // scheme set.
    provider.enqueue_success(vec![]);
    let configured = machine
        .set_parameters(&GenesisProtocolParams::default())
        .await
        .unwrap();

    provider.enqueue_success(vec![dao_creator::abi()
        .event("InitialSchemesSet")
        .unwrap()
        .encode(creator.address(), 0, &[AbiValue::Address(avatar)])
        .unwrap()]);
    let schemes = creator
        .set_schemes(
            avatar,
            &[SchemeRegistration::new(
                ContractKind::GenesisProtocol,
                machine.address(),
                GenesisProtocolParams::default().input(),
            )],
        )
        .await
        .unwrap();
    // the hash registered with the creator is the one the machine
    // derived for the same configuration
    assert_eq!(schemes.param_hashes, vec![configured.params_hash]);

    // Run a proposal through the machine.
    let proposal_id = keccak256(b"proposal-1");
    provider.enqueue_success(vec![genesis_protocol::abi()
        .event("NewProposal")
        .unwrap()
        .encode(
            machine.address(),
            0,
            &[
                AbiValue::Bytes32(proposal_id),
                AbiValue::Address(Address::from([0x11; 20])),
                AbiValue::from(2u64),
                AbiValue::Bytes32(configured.params_hash),
            ],
        )
        .unwrap()]);
    let proposal = machine
        .propose(ProposeOptions::new(
            avatar,
            configured.params_hash,
            Address::from([0xee; 20]),
        ))
        .await
        .unwrap();
    assert_eq!(proposal.proposal_id, proposal_id);

    provider.enqueue_success(vec![]);
    machine
        .stake(StakeOptions {
            proposal_id,
            vote: VOTE_YES,
            amount: Amount::from(100u64),
        })
        .await
        .unwrap();

    provider.enqueue_success(vec![]);
    machine
        .vote(VoteOptions {
            proposal_id,
            vote: VOTE_YES,
        })
        .await
        .unwrap();

    provider.enqueue_success(vec![]);
    machine
        .redeem(RedeemOptions {
            proposal_id,
            beneficiary: Address::from([1u8; 20]),
        })
        .await
        .unwrap();

    // forge + set_parameters + set_schemes + propose + stake + vote +
    // redeem
    assert_eq!(provider.submissions().len(), 7);
}
