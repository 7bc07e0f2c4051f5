//! Deployment of the RiggedRoll contract against the dice game

use alloy::{
    network::TransactionBuilder, primitives::Address, rpc::types::TransactionRequest,
    sol_types::SolValue,
};
use tracing::{info, warn};

use crate::{
    cli::DeployRiggedRollArgs,
    client::ChainClient,
    constants::{DICE_GAME_CONTRACT, RIGGED_ROLL_CONTRACT},
    deployer::{DeployOptions, Deployer},
    errors::ScriptError,
    solidity::IOwnable,
    utils::{parse_address, parse_ether_amount},
};

/// Deploy RiggedRoll pointed at the deployed DiceGame, then fund it so that it can
/// place bets. Returns the address of RiggedRoll.
pub async fn deploy_rigged_roll<C: ChainClient>(
    args: DeployRiggedRollArgs,
    deployer: &mut Deployer<'_, C>,
) -> Result<Address, ScriptError> {
    // Validate the inputs before sending anything
    let funding = parse_ether_amount(&args.funding)?;
    let new_owner = args.new_owner.as_deref().map(parse_address).transpose()?;

    let dice_game = deployer.address_of(DICE_GAME_CONTRACT)?;
    let rigged_roll = deployer
        .deploy(
            RIGGED_ROLL_CONTRACT,
            DeployOptions::with_args((dice_game,).abi_encode_params()),
        )
        .await?
        .address;

    info!("Funding RiggedRoll with {} ETH...", args.funding);
    let client = deployer.client();
    let tx = TransactionRequest::default()
        .with_from(client.deployer())
        .with_to(rigged_roll)
        .with_value(funding);
    client.send_and_confirm("funding", tx).await?;

    if let Some(new_owner) = new_owner {
        info!("Transferring ownership of RiggedRoll to {:#x}...", new_owner);
        let tx = TransactionRequest::default()
            .with_from(client.deployer())
            .with_to(rigged_roll)
            .with_call(&IOwnable::transferOwnershipCall { newOwner: new_owner });

        // RiggedRoll stays usable by the deployer if the transfer fails
        if let Err(e) = client.send_and_confirm("transferOwnership", tx).await {
            warn!("ownership transfer failed: {}", e);
        }
    }

    Ok(rigged_roll)
}
